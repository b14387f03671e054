//! Monitored object kinds and wire records
//!
//! The three taggable kinds share near-identical remote semantics; the
//! differences (id field, get/update method, name field, sort field) live
//! in a small strategy table so the tag mutation path is written once.
//!
//! The remote platform serializes every id and flag as a decimal string,
//! so the wire records keep `String` fields; callers work with `u64` ids
//! and format at the boundary.

use serde::{Deserialize, Serialize};

use crate::models::tag::Tag;

/// Flags value marking an object created by the platform's discovery
/// mechanism. Discovered objects usually reject tag updates.
pub const DISCOVERED_FLAGS: &str = "4";

/// Kind of monitored object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Host,
    Trigger,
    Item,
}

/// Per-kind remote API configuration
#[derive(Debug, Clone, Copy)]
pub struct KindSpec {
    /// Field name carrying the object id, e.g. `hostid`
    pub id_field: &'static str,
    /// Remote fetch method, e.g. `host.get`
    pub get_method: &'static str,
    /// Remote update method, e.g. `host.update`
    pub update_method: &'static str,
    /// Human-readable name field, for diagnostics
    pub name_field: &'static str,
    /// Sort field for stable ascending pagination
    pub sort_field: &'static str,
}

impl ObjectKind {
    pub fn spec(self) -> KindSpec {
        match self {
            ObjectKind::Host => KindSpec {
                id_field: "hostid",
                get_method: "host.get",
                update_method: "host.update",
                name_field: "name",
                sort_field: "name",
            },
            ObjectKind::Trigger => KindSpec {
                id_field: "triggerid",
                get_method: "trigger.get",
                update_method: "trigger.update",
                name_field: "description",
                sort_field: "description",
            },
            ObjectKind::Item => KindSpec {
                id_field: "itemid",
                get_method: "item.get",
                update_method: "item.update",
                name_field: "name",
                sort_field: "name",
            },
        }
    }

    /// Singular noun for diagnostics ("Host 7 not found")
    pub fn noun(self) -> &'static str {
        match self {
            ObjectKind::Host => "host",
            ObjectKind::Trigger => "trigger",
            ObjectKind::Item => "item",
        }
    }

    /// Plural noun for user-facing messages ("Tag added to 3 hosts")
    pub fn plural(self) -> &'static str {
        match self {
            ObjectKind::Host => "hosts",
            ObjectKind::Trigger => "triggers",
            ObjectKind::Item => "items",
        }
    }
}

/// Host reference embedded in trigger and item records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRef {
    pub hostid: String,
    pub name: String,
}

/// Host record with tags
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Host {
    pub hostid: String,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub flags: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// Trigger record with tags and owning hosts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trigger {
    pub triggerid: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub expression: String,
    #[serde(default)]
    pub flags: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub hosts: Vec<HostRef>,
}

/// Item record with tags and owning hosts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub itemid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub key_: String,
    #[serde(default, rename = "type")]
    pub item_type: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub value_type: String,
    #[serde(default)]
    pub delay: String,
    #[serde(default)]
    pub units: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub flags: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub hosts: Vec<HostRef>,
}

/// Whether a `flags` value marks a discovered (auto-generated) object
pub fn is_discovered(flags: &str) -> bool {
    flags == DISCOVERED_FLAGS
}
