//! Admin server for bulk-tagging monitored objects
//!
//! A thin HTTP front-end over the remote monitoring platform's JSON-RPC
//! API: validates untrusted tag/id input, drives the API client, and
//! shapes results (including partial bulk failures) into a uniform
//! response envelope.

pub mod common;
pub mod core;
pub mod handler;
pub mod routes;

pub use crate::core::{Config, Server, ServerState};

/// Set up environment (.env, logging) for the binary.
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    common::logger::init("info")?;
    Ok(())
}
