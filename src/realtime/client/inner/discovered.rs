use snafu::prelude::*;

use super::{handshaken::ClientStateHandshaken, ClientInner};
use crate::{
    api::{self, Transport},
    realtime::{
        message::{Envelope, MalformedResponseError},
        session::Session,
        Advice,
    },
};

/// Error when handshaking with the realtime gateway
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)), module(error), context(suffix(false)))]
pub enum HandshakeError {
    /// handshake request failed
    #[snafu(display("handshake request failed: {source}"))]
    Transport {
        /// source error
        source: api::Error,
    },

    /// handshake response is not an envelope
    #[snafu(display("malformed handshake response: {source}"))]
    Malformed {
        /// source error
        source: MalformedResponseError,
    },

    /// gateway refused the handshake
    #[snafu(display("handshake refused: {}", message.as_deref().unwrap_or("no reason")))]
    Refused {
        /// bayeux error string, if any
        message: Option<String>,
    },

    /// handshake response has no client id
    #[snafu(display("handshake response has no client id: {}", envelope.as_value()))]
    NoClientId {
        /// received response
        envelope: Envelope,
    },
}

#[derive(Debug)]
pub(crate) struct ClientStateDiscovered<T> {
    pub transport: T,
    pub session: Session,
    pub advice: Advice,
}

impl<T: Transport> ClientInner<ClientStateDiscovered<T>> {
    pub async fn handshake(
        mut self,
    ) -> Result<ClientInner<ClientStateHandshaken<T>>, HandshakeError> {
        log::info!("Performing handshake");

        let message = self.state.session.handshake_message();
        let body = api::encode_body(&message).context(error::Transport)?;

        log::trace!("Handshake request: {}", body);

        let response = self
            .state
            .transport
            .post_json(&self.state.session.uri, &body)
            .await
            .context(error::Transport)?;

        let envelope = Envelope::from_response(response).context(error::Malformed)?;

        ensure!(
            envelope.is_successful(),
            error::Refused {
                message: envelope.error_message().map(ToString::to_string),
            }
        );

        let client_id = match envelope.client_id().map(ToString::to_string) {
            Some(id) => id,
            None => return error::NoClientId { envelope }.fail(),
        };

        log::info!("Handshake successful, client id = {}", client_id);

        log::debug!("Move to handshaken state");

        Ok(ClientInner {
            state: ClientStateHandshaken {
                transport: self.state.transport,
                session: self.state.session,
                client_id,
                advice: self.state.advice,
            },
        })
    }
}
