//! Client configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{feed::FeedConfig, realtime::Advice};

/// default Yammer site
pub static DEFAULT_BASE_URL: &str = "https://www.yammer.com";

/// Configuration of one realtime session:
/// `{type, topic?, group?, interval?, timeout?, baseUrl?}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// which feed to follow
    #[serde(flatten)]
    pub feed: FeedConfig,
    /// initial connect interval in milliseconds, until the server advises otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<u64>,
    /// initial long-poll timeout in milliseconds, until the server advises otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    /// site root for the discovery request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Config {
    /// parse configuration from a json document
    pub fn from_json<S: AsRef<str> + ?Sized>(s: &S) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s.as_ref())
    }

    /// site root, [DEFAULT_BASE_URL] if not configured
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// advice used before the first server advice arrives
    pub fn initial_advice(&self) -> Advice {
        let mut advice = Advice::default();
        if let Some(interval) = self.interval {
            advice.interval = Duration::from_millis(interval);
        }
        if let Some(timeout) = self.timeout {
            advice.timeout = Duration::from_millis(timeout);
        }
        advice
    }
}
