//! HTTP seam for the sender: one JSON POST out, status and raw body back.

use std::{future::Future, pin::Pin, time::Duration};

use bytes::Bytes;
use reqwest::Client as ReqwestClient;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use crate::error::{NetworkStage, SendError, SendResult};

pub const JSON_CONTENT_TYPE: &str = "application/json";

pub type TransportFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JsonPost {
    pub url: String,
    pub content_type: &'static str,
    pub body: Bytes,
    pub timeout: Option<Duration>,
}

impl JsonPost {
    pub fn new(url: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            url: url.into(),
            content_type: JSON_CONTENT_TYPE,
            body: body.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Status and body exactly as received; the status is never interpreted here.
#[derive(Clone, Debug)]
pub struct RawReply {
    pub status: u16,
    pub body: Bytes,
}

impl RawReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub trait Transport: Send + Sync {
    fn post(&self, request: JsonPost) -> TransportFuture<SendResult<RawReply>>;
}

#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport {
    client: ReqwestClient,
}

impl Transport for ReqwestTransport {
    fn post(&self, request: JsonPost) -> TransportFuture<SendResult<RawReply>> {
        let client = self.client.clone();
        Box::pin(async move {
            let mut req = client
                .post(&request.url)
                .header(CONTENT_TYPE, request.content_type)
                .body(request.body);
            if let Some(timeout) = request.timeout {
                req = req.timeout(timeout);
            }

            debug!(url = %request.url, "posting");
            let resp = req
                .send()
                .await
                .map_err(|err| SendError::from_reqwest(NetworkStage::Send, err))?;
            let status = resp.status().as_u16();
            let body = resp
                .bytes()
                .await
                .map_err(|err| SendError::from_reqwest(NetworkStage::Receive, err))?;
            debug!(status, bytes = body.len(), "reply received");

            Ok(RawReply { status, body })
        })
    }
}
