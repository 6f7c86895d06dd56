use url::Url;

use super::Result;

/// Capability of performing a json exchange with a remote endpoint.
///
/// Any non-2xx status or connection failure must surface as an [Error](super::Error),
/// never as an empty body.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// GET `url` and decode the response body as json
    async fn get_json(&self, url: &Url) -> Result<serde_json::Value>;

    /// POST `body` as json to `url` and decode the response body as json
    async fn post_json(&self, url: &Url, body: &serde_json::Value) -> Result<serde_json::Value>;
}
