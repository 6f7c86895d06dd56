use snafu::prelude::*;
use url::Url;

use super::{discovered::ClientStateDiscovered, ClientInner};
use crate::{
    api::{self, types::ReadResponse, Transport},
    realtime::{
        session::{InvalidRealtimeURIError, Session},
        Advice,
    },
};

/// Error when discovering the realtime gateway
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)), module(error), context(suffix(false)))]
pub enum DiscoveryError {
    /// configured base url and feed path do not form a valid url
    #[snafu(display("invalid discovery endpoint {url}: {source}"))]
    InvalidEndpoint {
        /// the url
        url: String,
        /// source error
        source: url::ParseError,
    },

    /// discovery request failed, usually invalid credentials
    #[snafu(display("request discovery endpoint {path} failed: {source}"))]
    Transport {
        /// endpoint path
        path: String,
        /// source error
        source: api::Error,
    },

    /// response has no `meta.realtime` structure
    #[snafu(display("discovery response has no realtime meta: {source}"))]
    NoRealtimeMeta {
        /// source error
        source: serde_json::Error,
    },

    /// `meta.realtime.uri` is not a valid url
    #[snafu(display("{source}"))]
    InvalidRealtimeURI {
        /// source error
        source: InvalidRealtimeURIError,
    },
}

#[derive(Debug)]
pub(crate) struct ClientStateInit<T> {
    pub transport: T,
    pub base_url: String,
    pub path: String,
    pub token: String,
    pub advice: Advice,
}

impl<T> ClientStateInit<T> {
    fn endpoint(&self) -> Result<Url, DiscoveryError> {
        let raw = format!("{}{}", self.base_url.trim_end_matches('/'), self.path);
        let mut url = Url::parse(&raw).with_context(|_| error::InvalidEndpoint { url: &raw })?;
        url.query_pairs_mut().append_pair("access_token", &self.token);
        Ok(url)
    }
}

impl<T: Transport> ClientInner<ClientStateInit<T>> {
    pub async fn discover(self) -> Result<ClientInner<ClientStateDiscovered<T>>, DiscoveryError> {
        let endpoint = self.state.endpoint()?;

        log::info!("Retrieving realtime meta information from {}", endpoint.path());

        let body = self
            .state
            .transport
            .get_json(&endpoint)
            .await
            .with_context(|_| error::Transport {
                path: endpoint.path(),
            })?;

        let response: ReadResponse =
            serde_json::from_value(body).context(error::NoRealtimeMeta)?;
        let meta = response.meta.realtime;

        log::debug!("Realtime URI: {}", meta.uri);
        log::debug!("Channel id: {}", meta.channel_id);

        let session = Session::new(meta).context(error::InvalidRealtimeURI)?;

        log::debug!("Move to discovered state");

        Ok(ClientInner {
            state: ClientStateDiscovered {
                transport: self.state.transport,
                session,
                advice: self.state.advice,
            },
        })
    }
}
