//! Yammer realtime protocol client implement

mod client;
mod event;
pub mod message;
mod session;

pub use client::{Client, DiscoveryError, HandshakeError, SubscribeError};
pub use event::{Event, EventStream};
pub use message::{Advice, Envelope, MalformedResponseError};
pub use session::InvalidRealtimeURIError;

pub(crate) use event::EventSender;
