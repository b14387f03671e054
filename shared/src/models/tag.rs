//! Tag Model
//!
//! A tag is a free-form `(name, value)` label on a monitored object.
//! The remote platform enforces at most one tag per name on an object
//! and limits both name and value to 255 characters.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Remote limit for tag names and values.
pub const MAX_TAG_LEN: usize = 255;

/// Tag as read from the remote platform.
///
/// `automatic` is set by the platform on tags created by discovery.
/// It is read-only: update calls reject payloads that carry it, so the
/// write form is [`TagWrite`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub tag: String,
    #[serde(default)]
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub automatic: Option<String>,
}

impl Tag {
    pub fn new(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            value: value.into(),
            automatic: None,
        }
    }
}

/// Tag as sent in update payloads: name and value only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagWrite {
    pub tag: String,
    pub value: String,
}

impl From<&Tag> for TagWrite {
    fn from(tag: &Tag) -> Self {
        Self {
            tag: tag.tag.clone(),
            value: tag.value.clone(),
        }
    }
}

/// Tag input validation error
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Tag name is required")]
    EmptyName,

    #[error("Tag name or value too long (max {MAX_TAG_LEN} characters)")]
    TooLong,
}

/// Validate a tag name: non-empty after trimming, at most 255 characters.
pub fn validate_tag_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if name.chars().count() > MAX_TAG_LEN {
        return Err(ValidationError::TooLong);
    }
    Ok(())
}

/// Validate a tag value: at most 255 characters (empty is allowed).
pub fn validate_tag_value(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() > MAX_TAG_LEN {
        return Err(ValidationError::TooLong);
    }
    Ok(())
}
