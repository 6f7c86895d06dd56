//! json over http(s) transport

use snafu::prelude::*;

mod client;
mod error;
mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use client::Client;
pub use error::Error;
pub use transport::Transport;

/// Result type for api module
pub type Result<T> = std::result::Result<T, Error>;

/// Encode a protocol message as a json request body
pub(crate) fn encode_body<M: serde::Serialize + ?Sized>(message: &M) -> Result<serde_json::Value> {
    serde_json::to_value(message).context(error::variant::EncodeBodyFailed)
}
