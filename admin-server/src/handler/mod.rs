//! Request handlers

pub mod hosts;
pub mod items;
pub mod tags;
pub mod triggers;

use serde::{Deserialize, Serialize};

/// Optional pagination query parameters
#[derive(Debug, Default, Deserialize)]
pub struct Paging {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Count endpoint payload
#[derive(Debug, Serialize)]
pub struct CountView {
    pub count: u64,
}
