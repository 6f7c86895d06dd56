use reqwest::StatusCode;
use snafu::prelude::*;

/// Transport Error
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)), module(variant), context(suffix(false)))]
pub enum Error {
    /// create HTTP client failed
    #[snafu(display("create http client failed: {source}"))]
    ClientCreateFailed {
        /// source error
        source: reqwest::Error,
    },

    /// serialize request body as json failed
    #[snafu(display("encode request body failed: {source}"))]
    EncodeBodyFailed {
        /// source error
        source: serde_json::Error,
    },

    /// build http request failed
    #[snafu(display("build request failed: {source}"))]
    BuildRequestFailed {
        /// source error
        source: reqwest::Error,
    },

    /// send http request failed
    #[snafu(display("{} url {url} failed: {source}", method.as_str()))]
    RequestFailed {
        /// http method
        method: reqwest::Method,
        /// target url
        url: String,
        /// source http error
        source: reqwest::Error,
    },

    /// http response status is not 2xx
    #[snafu(display("{} url {url} got http status code {status_code}", method.as_str()))]
    HTTPStatusNotOK {
        /// http method
        method: reqwest::Method,
        /// request url
        url: String,
        /// received http status code
        status_code: StatusCode,
    },

    /// response head received but reading the body failed, e.g. the stream was cut off
    #[snafu(display("{} url {url} read body failed: {source}", method.as_str()))]
    ReadBodyFailed {
        /// http method
        method: reqwest::Method,
        /// request url
        url: String,
        /// source http error
        source: reqwest::Error,
    },

    /// parse response body as json failed
    #[snafu(display("parse response body {body:?} failed: {source}"))]
    ParseBodyFailed {
        /// http response body
        body: bytes::Bytes,
        /// source parse error
        source: serde_json::Error,
    },
}

impl Error {
    /// HTTP status code of the failed exchange, if the server answered at all
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            Self::HTTPStatusNotOK { status_code, .. } => Some(*status_code),
            Self::RequestFailed { source, .. } => source.status(),
            _ => None,
        }
    }

    /// true if the server answered 2xx but the body is incomplete or not valid json,
    /// e.g. a truncated long-poll stream
    pub fn is_malformed_body(&self) -> bool {
        matches!(
            self,
            Self::ReadBodyFailed { .. } | Self::ParseBodyFailed { .. }
        )
    }
}
