use snafu::prelude::*;

use super::{polling::ClientStatePolling, ClientInner};
use crate::{
    api::{self, Transport},
    realtime::{
        message::{Envelope, MalformedResponseError},
        session::Session,
        Advice,
    },
};

/// Error when subscribing the feed channels
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)), module(error), context(suffix(false)))]
pub enum SubscribeError {
    /// subscribe request failed
    #[snafu(display("subscribe request failed: {source}"))]
    Transport {
        /// source error
        source: api::Error,
    },

    /// subscribe response is not an envelope
    #[snafu(display("malformed subscribe response: {source}"))]
    Malformed {
        /// source error
        source: MalformedResponseError,
    },

    /// gateway refused the subscription
    #[snafu(display("subscription refused: {}", message.as_deref().unwrap_or("no reason")))]
    Refused {
        /// bayeux error string, if any
        message: Option<String>,
    },
}

#[derive(Debug)]
pub(crate) struct ClientStateHandshaken<T> {
    pub transport: T,
    pub session: Session,
    pub client_id: String,
    pub advice: Advice,
}

impl<T: Transport> ClientInner<ClientStateHandshaken<T>> {
    pub async fn subscribe(mut self) -> Result<ClientInner<ClientStatePolling<T>>, SubscribeError> {
        let message = self.state.session.subscribe_message(&self.state.client_id);
        let body = api::encode_body(&message).context(error::Transport)?;

        log::info!("Subscribing feed channels of {}", self.state.session.channel_id);
        log::debug!("Subscription request: {}", body);

        let response = self
            .state
            .transport
            .post_json(&self.state.session.uri, &body)
            .await
            .context(error::Transport)?;

        let envelope = Envelope::from_response(response).context(error::Malformed)?;

        log::debug!("Subscription response: {}", envelope.as_value());

        ensure!(
            envelope.is_successful(),
            error::Refused {
                message: envelope.error_message().map(ToString::to_string),
            }
        );

        log::debug!("Move to polling state");

        Ok(ClientInner {
            state: ClientStatePolling {
                transport: self.state.transport,
                session: self.state.session,
                client_id: self.state.client_id,
                advice: self.state.advice,
            },
        })
    }
}
