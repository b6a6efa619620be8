use std::io::Write;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::endpoint::SenderConfig;
use crate::error::{SendError, SendResult};
use crate::payload::{ShuffleRequest, ShuffleResponse};
use crate::transport::{JsonPost, ReqwestTransport, Transport};

/// Posts shuffle requests to a fixed endpoint. Holds no per-call state, so
/// clones and repeated calls are independent.
#[derive(Clone)]
pub struct ShuffleSender {
    transport: Arc<dyn Transport>,
    config: SenderConfig,
}

impl ShuffleSender {
    pub fn new(config: SenderConfig) -> Self {
        Self::with_transport(config, ReqwestTransport::default())
    }

    pub fn with_transport<T>(config: SenderConfig, transport: T) -> Self
    where
        T: Transport + 'static,
    {
        Self {
            transport: Arc::new(transport),
            config,
        }
    }

    pub fn config(&self) -> &SenderConfig {
        &self.config
    }

    pub async fn send_shuffle_request(&self, unique_nums: i64) -> SendResult<ShuffleResponse> {
        self.send(&ShuffleRequest::new(unique_nums)).await
    }

    /// The status code is not interpreted: any body is parsed as JSON.
    pub async fn send(&self, request: &ShuffleRequest) -> SendResult<ShuffleResponse> {
        let url = self.config.endpoint.url();
        let body = request.to_body()?;
        debug!(%url, unique_nums = request.unique_nums, "posting shuffle request");

        let reply = self
            .transport
            .post(JsonPost::new(url, body).with_timeout(self.config.timeout))
            .await?;

        if !reply.is_success() {
            warn!(status = reply.status, "shuffle service answered non-2xx");
        }

        ShuffleResponse::from_slice(Some(reply.status), &reply.body)
    }

    /// Sends one request and writes the reply as a single JSON line. Nothing
    /// is written when the request fails.
    pub async fn print_shuffle<W: Write>(&self, unique_nums: i64, out: &mut W) -> SendResult<()> {
        let response = self.send_shuffle_request(unique_nums).await?;
        writeln!(out, "{response}")
            .map_err(|err| SendError::internal(format!("write response: {err}")))
    }
}

impl Default for ShuffleSender {
    fn default() -> Self {
        Self::new(SenderConfig::default())
    }
}

/// One request against the default endpoint over the real HTTP transport.
pub async fn send_shuffle_request(unique_nums: i64) -> SendResult<ShuffleResponse> {
    ShuffleSender::default().send_shuffle_request(unique_nums).await
}
