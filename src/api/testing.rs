//! Test doubles: a scripted transport answering requests from a queue and recording
//! them, and a minimal local http server for driving the real [Client](super::Client).

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use bytes::Bytes;
use reqwest::{Method, StatusCode};
use snafu::prelude::*;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    time::Instant,
};
use url::Url;

use super::error::variant::*;
use super::{Result, Transport};

/// Canned answer for one request
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    /// 2xx with this json body
    Json(serde_json::Value),
    /// non-2xx status
    Status(u16),
    /// 2xx with a truncated json body
    Malformed,
    /// never answers
    Hang,
}

#[derive(Debug, Clone)]
pub(crate) struct Request {
    pub method: Method,
    pub url: Url,
    pub body: Option<serde_json::Value>,
    pub at: Instant,
}

#[derive(Debug, Default)]
struct Script {
    replies: VecDeque<Reply>,
    requests: Vec<Request>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
}

impl ScriptedTransport {
    pub fn new<I: IntoIterator<Item = Reply>>(replies: I) -> Self {
        Self {
            script: Arc::new(Mutex::new(Script {
                replies: replies.into_iter().collect(),
                requests: Vec::new(),
            })),
        }
    }

    pub fn requests(&self) -> Vec<Request> {
        self.script.lock().unwrap().requests.clone()
    }

    /// request bodies of every POST, in order
    pub fn posted(&self) -> Vec<serde_json::Value> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == Method::POST)
            .filter_map(|r| r.body)
            .collect()
    }

    async fn answer(
        &self,
        method: Method,
        url: &Url,
        body: Option<&serde_json::Value>,
    ) -> Result<serde_json::Value> {
        // unanswered requests hang like an idle long-poll
        let reply = {
            let mut script = self.script.lock().unwrap();
            script.requests.push(Request {
                method: method.clone(),
                url: url.clone(),
                body: body.cloned(),
                at: Instant::now(),
            });
            script.replies.pop_front().unwrap_or(Reply::Hang)
        };

        match reply {
            Reply::Json(value) => Ok(value),
            Reply::Status(code) => HTTPStatusNotOK {
                method,
                url: url.as_str(),
                status_code: StatusCode::from_u16(code).unwrap(),
            }
            .fail(),
            Reply::Malformed => {
                let body = Bytes::from_static(br#"[{"channel":"/meta/conn"#);
                serde_json::from_slice(&body).with_context(|_| ParseBodyFailed { body })
            }
            Reply::Hang => futures_util::future::pending().await,
        }
    }
}

#[async_trait::async_trait]
impl Transport for ScriptedTransport {
    async fn get_json(&self, url: &Url) -> Result<serde_json::Value> {
        self.answer(Method::GET, url, None).await
    }

    async fn post_json(&self, url: &Url, body: &serde_json::Value) -> Result<serde_json::Value> {
        self.answer(Method::POST, url, Some(body)).await
    }
}

/// Raw http/1.1 response written by [serve]
#[derive(Debug, Clone)]
pub(crate) struct HttpReply(Vec<u8>);

impl HttpReply {
    /// 200 with a complete json body
    pub fn json(body: &str) -> Self {
        Self::truncated(body, body.len())
    }

    /// 200 announcing `length` body bytes, but only `body` is sent before closing
    pub fn truncated(body: &str, length: usize) -> Self {
        Self(
            format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\n\
                 content-length: {}\r\nconnection: close\r\n\r\n{}",
                length, body
            )
            .into_bytes(),
        )
    }

    /// empty response with status `code`
    pub fn status(code: u16) -> Self {
        Self(
            format!(
                "HTTP/1.1 {} Test\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
                code
            )
            .into_bytes(),
        )
    }
}

/// Serve `replies` on a local port, one per connection in order. Connections beyond
/// the script are accepted and held open without an answer.
pub(crate) async fn serve<I: IntoIterator<Item = HttpReply>>(replies: I) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = Url::parse(&format!("http://{}/cometd", listener.local_addr().unwrap())).unwrap();
    let mut replies: VecDeque<HttpReply> = replies.into_iter().collect();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let reply = replies.pop_front();

            tokio::spawn(async move {
                read_request(&mut socket).await;

                match reply {
                    Some(HttpReply(raw)) => {
                        let _ = socket.write_all(&raw).await;
                        let _ = socket.shutdown().await;
                    }
                    None => futures_util::future::pending::<()>().await,
                }
            });
        }
    });

    url
}

/// consume request head and body
async fn read_request(socket: &mut TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    loop {
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
            let length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(0);

            if buf.len() >= end + 4 + length {
                return;
            }
        }

        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
}
