//! # yammer-push
//!
//! A client for the Yammer realtime API, a Bayeux (CometD) push protocol over
//! https long-polling.
//!
//! ```no_run
//! use futures_util::StreamExt;
//! use yammer_push::{realtime::{Client, Event}, Config};
//!
//! # async fn run() -> yammer_push::Result<()> {
//! let config = Config::from_json(r#"{"type": "group", "group": "42"}"#).unwrap();
//! let mut events = Client::new("oauth-token", config)?.start();
//!
//! while let Some(event) = events.next().await {
//!     match event {
//!         Event::Data(envelope) => println!("data: {}", envelope.as_value()),
//!         Event::Error(envelope) => println!("error: {}", envelope.as_value()),
//!         Event::Fatal(err) => println!("fatal: {}", err),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

#![deny(warnings)]
#![deny(clippy::all)]
#![deny(missing_debug_implementations, missing_docs)]
#![forbid(unsafe_code)]

pub mod api;
pub mod config;
pub mod feed;
pub mod listener;
pub mod mock;
pub mod realtime;

mod error;
pub use config::Config;
pub use error::{Error, Result};
pub use listener::Listener;
pub use mock::MockSource;

/// A source of push events. The application picks one implementation at construction
/// time, both deliver through the same [EventStream](realtime::EventStream) contract.
pub trait PushSource {
    /// start producing events in background
    fn start(self) -> realtime::EventStream;
}
