//! Data models
//!
//! Shared between monitor-client and admin-server. All records are
//! ephemeral per request: fetched fresh from the remote platform,
//! mutated, discarded.

pub mod bulk;
pub mod object;
pub mod tag;

// Re-exports
pub use bulk::*;
pub use object::*;
pub use tag::*;
