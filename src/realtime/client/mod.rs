mod inner;

pub use inner::{DiscoveryError, HandshakeError, SubscribeError};

use snafu::prelude::*;

use super::event::{EventSender, EventStream};
use crate::{api, api::Transport, error, Config, PushSource, Result};
use inner::{ClientInner, ClientStateInit, ClientStatePolling};

/// Yammer realtime client, it follows the bayeux long-polling flow:
/// discovery, handshake, subscribe, then connect forever.
///
/// See <https://developer.yammer.com/docs/realtime-api>.
#[derive(Debug)]
pub struct Client<T = api::Client> {
    token: String,
    config: Config,
    transport: T,
}

impl Client<api::Client> {
    /// Create a client for `config` using oauth `token` over https
    pub fn new<S: AsRef<str> + ?Sized>(token: &S, config: Config) -> Result<Self> {
        let transport = api::Client::new().context(error::CreateTransport)?;

        log::info!("Create realtime client for feed {}", config.feed.feed());

        Ok(Self::with_transport(token, config, transport))
    }
}

impl<T: Transport + 'static> Client<T> {
    /// Create a client using a custom transport
    pub fn with_transport<S: AsRef<str> + ?Sized>(
        token: &S,
        config: Config,
        transport: T,
    ) -> Self {
        Self {
            token: token.as_ref().to_string(),
            config,
            transport,
        }
    }

    async fn establish(self) -> Result<ClientInner<ClientStatePolling<T>>> {
        ClientInner {
            state: ClientStateInit {
                path: self.config.feed.endpoint_path(),
                base_url: self.config.base_url().to_string(),
                advice: self.config.initial_advice(),
                token: self.token,
                transport: self.transport,
            },
        }
        .discover()
        .await
        .context(error::Discovery)?
        .handshake()
        .await
        .context(error::Handshake)?
        .subscribe()
        .await
        .context(error::Subscribe)
    }

    /// Start the session in background, returning the stream of its events.
    ///
    /// Must be called within a tokio runtime.
    pub fn start(self) -> EventStream {
        let (sender, stream) = EventSender::new();

        tokio::spawn(async move {
            let established = tokio::select! {
                biased;

                _ = sender.closed() => None,
                result = self.establish() => Some(result),
            };

            match established {
                None => log::debug!("Event stream closed before session established, stop"),
                Some(Ok(inner)) => inner.polling(sender).await,
                Some(Err(err)) => {
                    log::error!("Establish realtime session failed: {}", err);
                    sender.fatal(err).await;
                }
            }
        });

        stream
    }
}

impl<T: Transport + 'static> PushSource for Client<T> {
    fn start(self) -> EventStream {
        Client::start(self)
    }
}
