// Shared transport configuration for building reqwest::Client instances.
//
// The collection service is a plain HTTP collaborator, so the only
// tunable is the request timeout; everything else is reqwest defaults.

use std::time::Duration;

/// Transport settings shared by every request the client sends.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("ladle/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(crate::error::Error::Transport)
    }
}
