//! Feed resolver, maps a feed descriptor to the read endpoint used for discovery.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

static ALL_MESSAGES_PATH: &str = "/api/v1/messages.json";

fn default_kind() -> String {
    "all".to_string()
}

/// Feed descriptor as it appears in configuration: `{type, topic?, group?}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// one of `all`, `topic` or `group`
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    /// topic id, used when kind is `topic`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    /// group id, used when kind is `group`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            kind: default_kind(),
            topic: None,
            group: None,
        }
    }
}

/// A resolved feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feed {
    /// all messages visible to the user
    All,
    /// messages about a topic
    Topic(String),
    /// messages in a group
    Group(String),
}

impl Feed {
    /// read endpoint path of this feed
    pub fn path(&self) -> String {
        match self {
            Feed::All => ALL_MESSAGES_PATH.to_string(),
            Feed::Topic(topic) => format!("/api/v1/messages/about_topic/{}.json", topic),
            Feed::Group(group) => format!("/api/v1/messages/in_group/{}.json", group),
        }
    }
}

impl Display for Feed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Feed::All => write!(f, "all"),
            Feed::Topic(topic) => write!(f, "topic {}", topic),
            Feed::Group(group) => write!(f, "group {}", group),
        }
    }
}

impl FeedConfig {
    /// resolve the descriptor, never fails: anything unusable falls back to [Feed::All]
    /// with a warning
    pub fn feed(&self) -> Feed {
        let with_id = |kind: &str, id: &Option<String>| match id.as_deref() {
            Some(id) if !id.is_empty() => Some(id.to_string()),
            _ => {
                log::warn!("Feed type '{}' has no {} id, using 'all' as default", kind, kind);
                None
            }
        };

        match self.kind.as_str() {
            "all" => Feed::All,
            "topic" => with_id("topic", &self.topic).map_or(Feed::All, Feed::Topic),
            "group" => with_id("group", &self.group).map_or(Feed::All, Feed::Group),
            other => {
                log::warn!("Invalid feed type '{}', using 'all' as default", other);
                Feed::All
            }
        }
    }

    /// read endpoint path for this descriptor
    pub fn endpoint_path(&self) -> String {
        self.feed().path()
    }
}
