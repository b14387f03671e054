//! Client configuration
//!
//! Credentials and endpoint are passed in explicitly; nothing in the
//! client reads the process environment. `from_env` exists for the
//! binary boundary only.
//!
//! # Environment variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | MONITOR_URL | (required) | Remote JSON-RPC endpoint URL |
//! | MONITOR_API_TOKEN | (none) | Static API token, takes priority |
//! | MONITOR_USER | (none) | Username for login auth |
//! | MONITOR_PASSWORD | (none) | Password for login auth |
//! | MAX_BULK_SIZE | 1000 | Ceiling on ids per bulk operation |

/// Default ceiling on the number of ids a bulk operation will process.
pub const DEFAULT_BULK_LIMIT: usize = 1000;

/// Credential source for the remote platform.
///
/// A static token is used as the bearer credential directly; a
/// username/password pair goes through the login method and may be
/// re-tried once when the session expires.
#[derive(Debug, Clone)]
pub enum Credentials {
    ApiToken(String),
    Password { username: String, password: String },
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Remote JSON-RPC endpoint URL
    pub url: String,
    /// Credential source; `None` fails closed at authentication time
    pub credentials: Option<Credentials>,
    /// Ceiling on ids per bulk operation
    pub bulk_limit: usize,
}

impl ClientConfig {
    pub fn new(url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            url: url.into(),
            credentials: Some(credentials),
            bulk_limit: DEFAULT_BULK_LIMIT,
        }
    }

    pub fn with_bulk_limit(mut self, limit: usize) -> Self {
        self.bulk_limit = limit;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// A static token takes priority over username/password when both
    /// are set. Missing credentials are not an error here; the client
    /// fails closed when it first needs to authenticate.
    pub fn from_env() -> Self {
        let url = std::env::var("MONITOR_URL").unwrap_or_default();

        let credentials = match std::env::var("MONITOR_API_TOKEN") {
            Ok(token) if !token.is_empty() => Some(Credentials::ApiToken(token)),
            _ => {
                let username = std::env::var("MONITOR_USER").unwrap_or_default();
                let password = std::env::var("MONITOR_PASSWORD").unwrap_or_default();
                if username.is_empty() || password.is_empty() {
                    None
                } else {
                    Some(Credentials::Password { username, password })
                }
            }
        };

        let bulk_limit = std::env::var("MAX_BULK_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_BULK_LIMIT);

        Self {
            url,
            credentials,
            bulk_limit,
        }
    }
}
