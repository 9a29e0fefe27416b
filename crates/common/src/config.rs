//! Client configuration types.

use serde::{Deserialize, Serialize};

/// Top-level client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the signal service — either the upstream itself or a
    /// server-side relay in front of it.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key sent as `X-Api-Key` on search/signal/lucky requests.
    /// Leave empty when talking to a relay that injects its own key.
    #[serde(default)]
    pub api_key: String,

    /// Timing parameters (seconds).
    #[serde(default)]
    pub timing: TimingConfig,
}

/// Timeouts (all values in seconds).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Per-request timeout for search/signal/lucky.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Overall budget for the startup health check.
    #[serde(default = "default_health_timeout")]
    pub health_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".into()
}

fn default_request_timeout() -> u64 {
    15
}

fn default_health_timeout() -> u64 {
    10
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout(),
            health_timeout_secs: default_health_timeout(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            timing: TimingConfig::default(),
        }
    }
}
