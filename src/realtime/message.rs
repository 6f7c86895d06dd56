//! Bayeux wire messages: outgoing frames, the response envelope and server advice.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use snafu::prelude::*;

/// handshake meta channel
pub const HANDSHAKE_CHANNEL: &str = "/meta/handshake";
/// subscribe meta channel
pub const SUBSCRIBE_CHANNEL: &str = "/meta/subscribe";
/// connect meta channel
pub const CONNECT_CHANNEL: &str = "/meta/connect";

/// the only connection type this client speaks
pub const LONG_POLLING: &str = "long-polling";

static PROTOCOL_VERSION: &str = "1.0";
static PROTOCOL_MINIMUM_VERSION: &str = "0.9";

/// default milliseconds to wait before reopening a connect request
pub const DEFAULT_INTERVAL: u64 = 0;
/// default milliseconds the server holds a long-poll open
pub const DEFAULT_TIMEOUT: u64 = 30000;

/// `ext` field of handshake frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandshakeExt {
    /// realtime authentication token
    pub token: String,
}

/// Handshake frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandshakeFrame {
    /// carries the realtime token
    pub ext: HandshakeExt,
    /// protocol version
    pub version: &'static str,
    /// minimum acceptable protocol version
    pub minimum_version: &'static str,
    /// always [HANDSHAKE_CHANNEL]
    pub channel: &'static str,
    /// always `["long-polling"]`
    pub supported_connection_types: [&'static str; 1],
    /// request id
    pub id: u64,
}

impl HandshakeFrame {
    /// handshake frame carrying realtime `token`
    pub fn new(token: String, id: u64) -> Self {
        Self {
            ext: HandshakeExt { token },
            version: PROTOCOL_VERSION,
            minimum_version: PROTOCOL_MINIMUM_VERSION,
            channel: HANDSHAKE_CHANNEL,
            supported_connection_types: [LONG_POLLING],
            id,
        }
    }
}

/// Subscribe frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeFrame {
    /// always [SUBSCRIBE_CHANNEL]
    pub channel: &'static str,
    /// subscribed feed channel
    pub subscription: String,
    /// request id, shared by all frames in one subscribe batch
    pub id: u64,
    /// client id from handshake
    pub client_id: String,
}

/// Connect frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectFrame {
    /// always [CONNECT_CHANNEL]
    pub channel: &'static str,
    /// always [LONG_POLLING]
    pub connection_type: &'static str,
    /// request id
    pub id: u64,
    /// client id from handshake
    pub client_id: String,
}

impl ConnectFrame {
    /// connect frame for `client_id`
    pub fn new(client_id: String, id: u64) -> Self {
        Self {
            channel: CONNECT_CHANNEL,
            connection_type: LONG_POLLING,
            id,
            client_id,
        }
    }
}

/// Polling cadence, steered by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advice {
    /// wait before reopening a connect request, zero means immediately
    pub interval: Duration,
    /// how long the server is expected to hold a connect request open
    pub timeout: Duration,
}

impl Default for Advice {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(DEFAULT_INTERVAL),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT),
        }
    }
}

/// `advice` field of a response, every part optional
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct AdvicePatch {
    /// milliseconds
    pub interval: Option<u64>,
    /// milliseconds
    pub timeout: Option<u64>,
}

impl Advice {
    /// apply a patch, absent parts keep the current value. Returns true if anything changed.
    pub fn update(&mut self, patch: &AdvicePatch) -> bool {
        let old = *self;

        if let Some(interval) = patch.interval {
            self.interval = Duration::from_millis(interval);
        }
        if let Some(timeout) = patch.timeout {
            self.timeout = Duration::from_millis(timeout);
        }

        old != *self
    }
}

/// Response body can not be understood as an envelope
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)), module(error), context(suffix(false)))]
pub enum MalformedResponseError {
    /// body is not a json array
    #[snafu(display("response is not an array: {json}"))]
    NotArray {
        /// json string
        json: String,
    },

    /// body is an empty array
    #[snafu(display("response is an empty array"))]
    Empty,

    /// body is cut off or not valid json at all
    #[snafu(display("response body is incomplete or not valid json: {source}"))]
    Body {
        /// source error
        source: crate::api::Error,
    },
}

/// Decoded response of the realtime gateway. Payload fields are kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Envelope(serde_json::Value);

impl Envelope {
    /// wrap any json value without checking its shape
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// check that a gateway response is a non-empty array of messages
    pub fn from_response(value: serde_json::Value) -> Result<Self, MalformedResponseError> {
        match value.as_array() {
            None => error::NotArray {
                json: value.to_string(),
            }
            .fail(),
            Some(messages) if messages.is_empty() => error::Empty.fail(),
            Some(_) => Ok(Self(value)),
        }
    }

    /// messages in this envelope, a non-array payload counts as one message
    pub fn messages(&self) -> &[serde_json::Value] {
        match &self.0 {
            serde_json::Value::Array(messages) => messages,
            other => std::slice::from_ref(other),
        }
    }

    /// element 0
    pub fn first(&self) -> Option<&serde_json::Value> {
        self.messages().first()
    }

    /// false only if element 0 says `successful: false`
    pub fn is_successful(&self) -> bool {
        self.first()
            .and_then(|m| m.get("successful"))
            .and_then(serde_json::Value::as_bool)
            != Some(false)
    }

    /// `clientId` of element 0
    pub fn client_id(&self) -> Option<&str> {
        self.first()
            .and_then(|m| m.get("clientId"))
            .and_then(serde_json::Value::as_str)
    }

    /// bayeux `error` string of element 0
    pub fn error_message(&self) -> Option<&str> {
        self.first()
            .and_then(|m| m.get("error"))
            .and_then(serde_json::Value::as_str)
    }

    /// every well formed `advice` object carried by any message, in order
    pub fn advice(&self) -> impl Iterator<Item = AdvicePatch> + '_ {
        self.messages()
            .iter()
            .filter_map(|m| m.get("advice"))
            .filter_map(|advice| match AdvicePatch::deserialize(advice) {
                Ok(patch) => Some(patch),
                Err(err) => {
                    log::warn!("Ignore invalid advice {}: {}", advice, err);
                    None
                }
            })
    }

    /// borrow the raw json
    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    /// take the raw json
    pub fn into_value(self) -> serde_json::Value {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    mod frame {
        use super::*;

        #[test]
        fn test_handshake_frame_shape() {
            let frame = HandshakeFrame::new("rt-token".to_string(), 1);

            assert_eq!(
                serde_json::to_value([frame]).unwrap(),
                json!([{
                    "ext": { "token": "rt-token" },
                    "version": "1.0",
                    "minimumVersion": "0.9",
                    "channel": "/meta/handshake",
                    "supportedConnectionTypes": ["long-polling"],
                    "id": 1,
                }])
            );
        }

        #[test]
        fn test_connect_frame_shape() {
            let frame = ConnectFrame::new("c1".to_string(), 7);

            assert_eq!(
                serde_json::to_value(frame).unwrap(),
                json!({
                    "channel": "/meta/connect",
                    "connectionType": "long-polling",
                    "id": 7,
                    "clientId": "c1",
                })
            );
        }
    }

    mod envelope {
        use super::*;

        #[test]
        fn test_successful_flag() {
            let env = |v| Envelope::from_response(v).unwrap();

            assert!(env(json!([{}])).is_successful());
            assert!(env(json!([{ "successful": true }])).is_successful());
            assert!(!env(json!([{ "successful": false }])).is_successful());
            // only element 0 decides
            assert!(env(json!([{}, { "successful": false }])).is_successful());
        }

        #[test]
        fn test_malformed() {
            assert!(matches!(
                Envelope::from_response(json!({ "successful": true })),
                Err(MalformedResponseError::NotArray { .. })
            ));
            assert!(matches!(
                Envelope::from_response(json!([])),
                Err(MalformedResponseError::Empty)
            ));
        }

        #[test]
        fn test_fields() {
            let env = Envelope::from_response(json!([{
                "clientId": "c1",
                "successful": false,
                "error": "402::Unknown client",
            }]))
            .unwrap();

            assert_eq!(env.client_id(), Some("c1"));
            assert_eq!(env.error_message(), Some("402::Unknown client"));
        }

        #[test]
        fn test_advice_from_any_message() {
            let env = Envelope::from_response(json!([
                { "channel": "/feeds/1/primary", "data": {} },
                { "channel": "/meta/connect", "advice": { "interval": 5000 } },
                { "advice": "garbage" },
            ]))
            .unwrap();

            let advice: Vec<_> = env.advice().collect();
            assert_eq!(
                advice,
                vec![AdvicePatch {
                    interval: Some(5000),
                    timeout: None
                }]
            );
        }

        #[test]
        fn test_non_array_payload_is_one_message() {
            let env = Envelope::new(json!({ "msg": "hi" }));
            assert_eq!(env.messages().len(), 1);
            assert_eq!(env.first(), Some(&json!({ "msg": "hi" })));
        }
    }

    mod advice {
        use super::*;

        #[test]
        fn test_defaults() {
            let advice = Advice::default();
            assert_eq!(advice.interval, Duration::ZERO);
            assert_eq!(advice.timeout, Duration::from_millis(30000));
        }

        #[test]
        fn test_partial_update_keeps_other_value() {
            let mut advice = Advice {
                interval: Duration::from_millis(10),
                timeout: Duration::from_millis(45000),
            };

            assert!(advice.update(&AdvicePatch {
                interval: Some(5000),
                timeout: None,
            }));
            assert_eq!(advice.interval, Duration::from_millis(5000));
            assert_eq!(advice.timeout, Duration::from_millis(45000));

            assert!(advice.update(&AdvicePatch {
                interval: None,
                timeout: Some(20000),
            }));
            assert_eq!(advice.interval, Duration::from_millis(5000));
            assert_eq!(advice.timeout, Duration::from_millis(20000));

            assert!(!advice.update(&AdvicePatch::default()));
        }
    }
}
