//! Shared server state

use std::sync::Arc;

use monitor_client::MonitorClient;

use super::Config;

/// Shared state handed to every request handler
#[derive(Clone)]
pub struct ServerState {
    config: Arc<Config>,
}

impl ServerState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fresh client per request; sessions are established lazily on
    /// first authenticated call.
    pub fn client(&self) -> MonitorClient {
        MonitorClient::new(self.config.monitor.clone())
    }
}
