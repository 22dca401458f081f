use std::time::Duration;

use multik8s_sdk::ClientConfig;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

/// Console configuration
#[derive(Clone, Debug)]
pub struct ConsoleConfig {
    pub api_url: String,
    /// How often the cluster list re-fetches while it is on screen.
    pub poll_interval: Duration,
    pub request_timeout: Option<Duration>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            request_timeout: None,
        }
    }
}

impl ConsoleConfig {
    pub fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::new(self.api_url.clone());
        match self.request_timeout {
            Some(timeout) => config.with_timeout(timeout),
            None => config,
        }
    }
}
