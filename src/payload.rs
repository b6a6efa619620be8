//! Request and response bodies for the `/shuffle` endpoint.

use std::fmt;

use bytes::Bytes;
use serde::Serialize;
use sonic_rs::{JsonContainerTrait, JsonValueTrait, Value};

use crate::error::{SendError, SendResult};

/// Shuffle strategy understood by the service. The service falls back to
/// `basic` when the field is absent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Basic,
    Unique,
    Weighted,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ShuffleRequest {
    pub unique_nums: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_type: Option<ServiceType>,
}

impl ShuffleRequest {
    pub fn new(unique_nums: i64) -> Self {
        Self {
            unique_nums,
            service_type: None,
        }
    }

    pub fn with_service_type(mut self, service_type: ServiceType) -> Self {
        self.service_type = Some(service_type);
        self
    }

    pub fn to_body(&self) -> SendResult<Bytes> {
        sonic_rs::to_vec(self)
            .map(Bytes::from)
            .map_err(|err| SendError::internal(format!("serialize shuffle request: {err}")))
    }
}

/// Whatever JSON the service answered with. Nothing here is validated.
#[derive(Clone, Debug, PartialEq)]
pub struct ShuffleResponse(Value);

impl ShuffleResponse {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn from_slice(status: Option<u16>, body: &[u8]) -> SendResult<Self> {
        sonic_rs::from_slice(body)
            .map(Self)
            .map_err(|err| SendError::from_sonic(status, err))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// The `shuffled_sequence` array the service returns on success, if the
    /// body has one made only of integers.
    pub fn shuffled_sequence(&self) -> Option<Vec<i64>> {
        let sequence = self.0.get("shuffled_sequence")?.as_array()?;
        sequence.iter().map(|item| item.as_i64()).collect()
    }

    /// The `error` message the service returns when it rejects a request.
    pub fn error_message(&self) -> Option<&str> {
        self.0.get("error")?.as_str()
    }
}

impl From<Value> for ShuffleResponse {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl fmt::Display for ShuffleResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = sonic_rs::to_string(&self.0).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}
