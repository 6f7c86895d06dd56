use std::time::Duration;

use super::{ClientInner, CONNECT_TIMEOUT_GRACE};
use crate::{
    api::{self, Transport},
    realtime::{
        event::EventSender,
        message::{Envelope, MalformedResponseError},
        session::Session,
        Advice,
    },
    Error,
};

#[derive(Debug)]
pub(crate) struct ClientStatePolling<T> {
    pub transport: T,
    pub session: Session,
    pub client_id: String,
    pub advice: Advice,
}

/// Result of one connect exchange
#[derive(Debug)]
enum Outcome {
    /// successful push
    Data(Envelope),
    /// `successful: false`, recoverable
    Error(Envelope),
    /// body can not be understood, recoverable
    Malformed(MalformedResponseError),
    /// no response before the deadline, recoverable
    TimedOut(Duration),
    /// transport failed, fatal
    Failed(api::Error),
}

impl<T: Transport> ClientInner<ClientStatePolling<T>> {
    async fn connect(&mut self) -> Outcome {
        let message = self.state.session.connect_message(&self.state.client_id);
        let id = message[0].id;

        let body = match api::encode_body(&message) {
            Ok(body) => body,
            Err(err) => return Outcome::Failed(err),
        };

        let deadline = self.state.advice.timeout + CONNECT_TIMEOUT_GRACE;

        log::debug!("Opening connect request {}, deadline {:?}", id, deadline);

        let result = tokio::select! {
            _ = tokio::time::sleep(deadline) => return Outcome::TimedOut(deadline),
            result = self.state.transport.post_json(&self.state.session.uri, &body) => result,
        };

        match result {
            Ok(response) => match Envelope::from_response(response) {
                Ok(envelope) if envelope.is_successful() => Outcome::Data(envelope),
                Ok(envelope) => Outcome::Error(envelope),
                Err(err) => Outcome::Malformed(err),
            },
            Err(err) if err.is_malformed_body() => {
                Outcome::Malformed(MalformedResponseError::Body { source: err })
            }
            Err(err) => Outcome::Failed(err),
        }
    }

    fn apply_advice(&mut self, envelope: &Envelope) {
        for patch in envelope.advice() {
            if self.state.advice.update(&patch) {
                log::info!(
                    "Server advice applied, interval = {:?}, timeout = {:?}",
                    self.state.advice.interval,
                    self.state.advice.timeout
                );
            }
        }
    }

    /// Connect loop: one request in flight at most, the next one is opened `interval`
    /// after the previous one is fully processed. Ends on transport failure or when
    /// the event stream is gone.
    pub async fn polling(mut self, sender: EventSender) {
        log::info!("Starting long polling connection cycle");

        loop {
            let outcome = tokio::select! {
                biased;

                _ = sender.closed() => {
                    log::debug!("Event stream closed, stop polling");
                    return;
                }

                outcome = self.connect() => outcome,
            };

            match outcome {
                Outcome::Data(envelope) => {
                    log::trace!("Received connect response: {}", envelope.as_value());

                    self.apply_advice(&envelope);

                    if !sender.data(envelope).await {
                        log::debug!("Send event to event stream failed, receive side dropped, stop");
                        return;
                    }
                }
                Outcome::Error(envelope) => {
                    log::warn!(
                        "Connect response not successful: {}",
                        envelope.error_message().unwrap_or("no reason")
                    );

                    self.apply_advice(&envelope);

                    if !sender.error(envelope).await {
                        log::debug!("Send event to event stream failed, receive side dropped, stop");
                        return;
                    }
                }
                Outcome::Malformed(err) => {
                    log::warn!("Ignore malformed connect response: {}", err);
                }
                Outcome::TimedOut(deadline) => {
                    log::warn!("Connect request got no response in {:?}", deadline);
                }
                Outcome::Failed(source) => {
                    log::error!("Connect request failed: {}, stop polling", source);
                    sender.fatal(Error::ConnectTransport { source }).await;
                    return;
                }
            }

            let interval = self.state.advice.interval;
            if interval.is_zero() {
                continue;
            }

            log::debug!("Next connect request in {:?}", interval);

            tokio::select! {
                biased;

                _ = sender.closed() => {
                    log::debug!("Event stream closed, stop polling");
                    return;
                }

                _ = tokio::time::sleep(interval) => {}
            }
        }
    }
}
