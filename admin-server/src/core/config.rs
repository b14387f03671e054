//! Server configuration
//!
//! # Environment variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | HTTP_PORT | 5001 | HTTP listen port |
//! | MONITOR_URL | (required) | Remote JSON-RPC endpoint |
//! | MONITOR_API_TOKEN | (none) | Static API token (takes priority) |
//! | MONITOR_USER | (none) | Username for login auth |
//! | MONITOR_PASSWORD | (none) | Password for login auth |
//! | MAX_BULK_SIZE | 1000 | Bulk operation ceiling |
//! | RUST_LOG | info | Log filter |
//! | LOG_FORMAT | text | `json` for JSON log output |

use monitor_client::ClientConfig;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP listen port
    pub http_port: u16,
    /// Remote platform connection (endpoint, credentials, bulk ceiling)
    pub monitor: ClientConfig,
}

impl Config {
    pub fn from_env() -> Self {
        let http_port = std::env::var("HTTP_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5001);

        Self {
            http_port,
            monitor: ClientConfig::from_env(),
        }
    }
}
