use snafu::prelude::*;
use url::Url;

use super::message::{ConnectFrame, HandshakeFrame, SubscribeFrame, SUBSCRIBE_CHANNEL};
use crate::api::types::RealtimeMeta;

/// realtime gateway uri from discovery is not a valid url
#[derive(Debug, Snafu)]
#[snafu(
    display("invalid realtime uri {uri}: {source}"),
    visibility(pub(crate)),
    module(error),
    context(suffix(false))
)]
pub struct InvalidRealtimeURIError {
    /// received uri
    pub uri: String,
    /// source error
    pub source: url::ParseError,
}

/// Parameters of one realtime session.
///
/// Request ids start from 0 and are incremented before each protocol message,
/// so the first frame sent carries id 1.
#[derive(Debug, Clone)]
pub(crate) struct Session {
    pub uri: Url,
    pub channel_id: String,
    pub token: String,
    request_id: u64,
}

impl Session {
    pub fn new(meta: RealtimeMeta) -> Result<Self, InvalidRealtimeURIError> {
        let uri = Url::parse(&meta.uri)
            .with_context(|_| error::InvalidRealtimeURI { uri: &meta.uri })?;

        Ok(Self {
            uri,
            channel_id: meta.channel_id,
            token: meta.authentication_token,
            request_id: 0,
        })
    }

    pub fn next_request_id(&mut self) -> u64 {
        self.request_id += 1;
        self.request_id
    }

    pub fn handshake_message(&mut self) -> [HandshakeFrame; 1] {
        [HandshakeFrame::new(self.token.clone(), self.next_request_id())]
    }

    /// one batch subscribing both feed channels, sharing one request id
    pub fn subscribe_message(&mut self, client_id: &str) -> [SubscribeFrame; 2] {
        let id = self.next_request_id();
        let frame = |feed: &str| SubscribeFrame {
            channel: SUBSCRIBE_CHANNEL,
            subscription: format!("/feeds/{}/{}", self.channel_id, feed),
            id,
            client_id: client_id.to_string(),
        };

        [frame("primary"), frame("secondary")]
    }

    pub fn connect_message(&mut self, client_id: &str) -> [ConnectFrame; 1] {
        [ConnectFrame::new(client_id.to_string(), self.next_request_id())]
    }
}
