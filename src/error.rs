//! session error types

use snafu::prelude::*;

use super::api::Error as TransportError;
use super::realtime::{DiscoveryError, HandshakeError, SubscribeError};

/// session result type
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal session error, the session is dead once one of these happens
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)), context(suffix(false)))]
pub enum Error {
    /// create http transport failed
    #[snafu(display("create http transport failed: {source}"))]
    CreateTransport {
        /// source error
        source: TransportError,
    },

    /// discover realtime gateway failed
    #[snafu(display("discover realtime gateway failed: {source}"))]
    Discovery {
        /// source error
        source: DiscoveryError,
    },

    /// handshake failed
    #[snafu(display("realtime handshake failed: {source}"))]
    Handshake {
        /// source error
        source: HandshakeError,
    },

    /// subscribe failed
    #[snafu(display("realtime subscribe failed: {source}"))]
    Subscribe {
        /// source error
        source: SubscribeError,
    },

    /// a connect request failed at transport level, polling stopped
    #[snafu(display("realtime connect request failed: {source}"))]
    ConnectTransport {
        /// source error
        source: TransportError,
    },
}
