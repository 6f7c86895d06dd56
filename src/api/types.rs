//! Yammer read API response types, only the parts needed to find the realtime gateway

use serde::Deserialize;

/// Body of any regular read endpoint, e.g. `/api/v1/messages.json`
#[derive(Debug, Deserialize)]
pub struct ReadResponse {
    /// response meta data
    pub meta: Meta,
}

/// `meta` field of a read response
#[derive(Debug, Deserialize)]
pub struct Meta {
    /// realtime gateway information
    pub realtime: RealtimeMeta,
}

/// `meta.realtime` field of a read response
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RealtimeMeta {
    /// realtime gateway uri, handshake/subscribe/connect are all POSTed here
    pub uri: String,
    /// feed channel id
    pub channel_id: String,
    /// token for the realtime tier, it is not the oauth token
    pub authentication_token: String,
}
