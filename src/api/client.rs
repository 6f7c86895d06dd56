use reqwest::{header::CONTENT_TYPE, Method};
use snafu::prelude::*;
use url::Url;

use super::error::variant::*;
use super::{Result, Transport};

static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

/// HTTP(s) transport backed by reqwest
#[derive(Debug, Clone)]
pub struct Client {
    client: reqwest::Client,
}

impl Client {
    /// create a new transport, credentials travel in the request urls
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .gzip(true)
            .deflate(true)
            .user_agent(APP_USER_AGENT)
            .build()
            .context(ClientCreateFailed)?;

        Ok(Self { client })
    }

    async fn request(
        &self,
        method: Method,
        url: &Url,
        body: Option<&serde_json::Value>,
    ) -> Result<serde_json::Value> {
        let mut req = self.client.request(method.clone(), url.clone());

        if let Some(body) = body {
            let payload = serde_json::to_vec(body).context(EncodeBodyFailed)?;
            log::trace!("Sending {} request body: {}", method, body);
            req = req.header(CONTENT_TYPE, "application/json").body(payload);
        }

        let req = req.build().context(BuildRequestFailed)?;

        let resp = self
            .client
            .execute(req)
            .await
            .with_context(|_| RequestFailed {
                method: method.clone(),
                url: url.as_str(),
            })?;

        ensure!(
            resp.status().is_success(),
            HTTPStatusNotOK {
                method: method.clone(),
                url: url.as_str(),
                status_code: resp.status()
            }
        );

        let body = resp.bytes().await.with_context(|_| ReadBodyFailed {
            method: method.clone(),
            url: url.as_str(),
        })?;

        log::trace!("{} {} returned {} bytes", method, url.path(), body.len());

        serde_json::from_slice(&body).with_context(|_| ParseBodyFailed { body })
    }
}

#[async_trait::async_trait]
impl Transport for Client {
    async fn get_json(&self, url: &Url) -> Result<serde_json::Value> {
        self.request(Method::GET, url, None).await
    }

    async fn post_json(&self, url: &Url, body: &serde_json::Value) -> Result<serde_json::Value> {
        self.request(Method::POST, url, Some(body)).await
    }
}
