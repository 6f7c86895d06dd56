mod discovered;
mod handshaken;
mod init;
mod polling;

use std::time::Duration;

pub(super) use init::ClientStateInit;
pub(super) use polling::ClientStatePolling;

pub use discovered::HandshakeError;
pub use handshaken::SubscribeError;
pub use init::DiscoveryError;

/// extra time given to a connect request over the advised server timeout
/// before the client gives up on it
pub(crate) const CONNECT_TIMEOUT_GRACE: Duration = Duration::from_secs(5);

#[derive(Debug)]
pub(crate) struct ClientInner<S> {
    pub state: S,
}
