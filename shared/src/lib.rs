//! Shared types for the monitoring tag administration service
//!
//! Domain models used by both the API client and the admin server:
//! tags, object kinds, monitored-object records and bulk reports.
//! Pure data and validation only, no I/O.

pub mod models;

// Re-exports
pub use models::bulk::BulkReport;
pub use models::object::{Host, HostRef, Item, KindSpec, ObjectKind, Trigger, is_discovered};
pub use models::tag::{Tag, TagWrite, ValidationError, validate_tag_name, validate_tag_value};
