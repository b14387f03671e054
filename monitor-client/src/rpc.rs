//! JSON-RPC 2.0 wire types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Login method name; the only method that goes out without a bearer token.
pub const LOGIN_METHOD: &str = "user.login";

/// JSON-RPC request envelope
#[derive(Debug, Serialize)]
pub struct RpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub method: &'a str,
    pub params: Value,
    pub id: u32,
}

impl<'a> RpcRequest<'a> {
    pub fn new(method: &'a str, params: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            method,
            params,
            id: 1,
        }
    }
}

/// JSON-RPC response envelope: exactly one of `result` / `error` is set.
#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    pub result: Option<Value>,
    pub error: Option<RpcError>,
}

/// JSON-RPC error object
#[derive(Debug, Deserialize)]
pub struct RpcError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<String>,
}

impl RpcError {
    /// Most specific error text available (`data` over `message`).
    pub fn detail(&self) -> &str {
        match &self.data {
            Some(data) if !data.is_empty() => data,
            _ => &self.message,
        }
    }
}

/// Whether an error text suggests an expired or invalid session.
///
/// The remote platform phrases these inconsistently across versions, so
/// this matches on the two words that appear in all of them.
pub fn looks_like_auth_error(detail: &str) -> bool {
    let lower = detail.to_lowercase();
    lower.contains("authentication") || lower.contains("session")
}
