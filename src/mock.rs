//! In-memory transport for deterministic sender tests. Replies and failures
//! are scripted up front, and every outbound post is recorded.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use bytes::Bytes;

use crate::error::{NetworkStage, SendError, SendResult};
use crate::transport::{JsonPost, RawReply, Transport, TransportFuture};

#[derive(Clone, Debug)]
pub struct MockFailure {
    stage: NetworkStage,
    reason: String,
}

impl MockFailure {
    pub fn connect(reason: impl Into<String>) -> Self {
        Self::at(NetworkStage::Connect, reason)
    }

    pub fn receive(reason: impl Into<String>) -> Self {
        Self::at(NetworkStage::Receive, reason)
    }

    pub fn timeout(reason: impl Into<String>) -> Self {
        Self::at(NetworkStage::Timeout, reason)
    }

    fn at(stage: NetworkStage, reason: impl Into<String>) -> Self {
        Self {
            stage,
            reason: reason.into(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct MockTransportSnapshot {
    pub request_count: usize,
    pub last_status: Option<u16>,
    pub last_error: Option<String>,
    pub failures_remaining: usize,
    pub replies_remaining: usize,
}

#[derive(Debug, Default)]
struct MockTransportState {
    request_count: usize,
    last_status: Option<u16>,
    last_error: Option<String>,
    failures: VecDeque<MockFailure>,
    replies: VecDeque<RawReply>,
    outbound: Vec<JsonPost>,
}

#[derive(Clone, Debug, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockTransportState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Failures are consumed one per post, before any queued reply.
    pub fn failing(failures: impl IntoIterator<Item = MockFailure>) -> Self {
        let transport = Self::new();
        transport
            .state
            .lock()
            .expect("mock transport mutex poisoned while seeding failures")
            .failures
            .extend(failures);
        transport
    }

    pub fn queue_reply(&self, status: u16, body: impl Into<Bytes>) {
        self.state
            .lock()
            .expect("mock transport mutex poisoned while queueing reply")
            .replies
            .push_back(RawReply {
                status,
                body: body.into(),
            });
    }

    pub fn queue_json(&self, status: u16, payload: &sonic_rs::Value) -> SendResult<()> {
        let body = sonic_rs::to_vec(payload)
            .map_err(|err| SendError::internal(format!("serialize mock body: {err}")))?;
        self.queue_reply(status, body);
        Ok(())
    }

    pub fn snapshot(&self) -> MockTransportSnapshot {
        let state = self
            .state
            .lock()
            .expect("mock transport mutex poisoned while taking snapshot");
        MockTransportSnapshot {
            request_count: state.request_count,
            last_status: state.last_status,
            last_error: state.last_error.clone(),
            failures_remaining: state.failures.len(),
            replies_remaining: state.replies.len(),
        }
    }

    /// Every post handed to the transport, in order, including failed ones.
    pub fn outbound(&self) -> Vec<JsonPost> {
        self.state
            .lock()
            .expect("mock transport mutex poisoned while reading outbound log")
            .outbound
            .clone()
    }

    fn handle(&self, request: JsonPost) -> SendResult<RawReply> {
        let mut state = self
            .state
            .lock()
            .expect("mock transport mutex poisoned while handling post");
        state.request_count += 1;
        state.outbound.push(request);

        if let Some(MockFailure { stage, reason }) = state.failures.pop_front() {
            state.last_status = None;
            state.last_error = Some(reason.clone());
            return Err(SendError::network(stage, None, reason));
        }

        // An empty queue answers 200 with an empty body.
        let reply = state.replies.pop_front().unwrap_or(RawReply {
            status: 200,
            body: Bytes::new(),
        });
        state.last_status = Some(reply.status);
        state.last_error = None;
        Ok(reply)
    }
}

impl Transport for MockTransport {
    fn post(&self, request: JsonPost) -> TransportFuture<SendResult<RawReply>> {
        let transport = self.clone();
        Box::pin(async move { transport.handle(request) })
    }
}
