//! API client for the remote monitoring platform
//!
//! Speaks JSON-RPC 2.0 over HTTP POST: authentication (static API token
//! or username/password login), request dispatch with a single automatic
//! re-authentication retry, typed fetches for hosts/triggers/items and
//! the generic tag mutation and bulk mutation primitives.

mod client;
mod config;
mod error;
mod rpc;
mod tags;

pub use client::MonitorClient;
pub use config::{ClientConfig, Credentials};
pub use error::{ClientError, ClientResult};
pub use tags::TagOp;
