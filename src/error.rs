use std::fmt;

use thiserror::Error;

pub type SendResult<T> = Result<T, SendError>;

/// Where a network failure happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NetworkStage {
    Connect,
    Send,
    Receive,
    Timeout,
}

impl fmt::Display for NetworkStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self {
            Self::Connect => "connect",
            Self::Send => "send",
            Self::Receive => "receive",
            Self::Timeout => "timeout",
        };
        f.write_str(stage)
    }
}

#[derive(Clone, Debug, Error)]
pub enum SendError {
    /// The shuffle service could not be reached, or the exchange broke off.
    #[error("network error ({stage}) status={status:?}: {message}")]
    Network {
        stage: NetworkStage,
        status: Option<u16>,
        message: String,
    },
    /// The response body was not valid JSON.
    #[error("parse error status={status:?}: {message}")]
    Parse {
        status: Option<u16>,
        message: String,
    },
    #[error("internal error: {0}")]
    Internal(String),
}

impl SendError {
    pub fn network(stage: NetworkStage, status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Network {
            stage,
            status,
            message: message.into(),
        }
    }

    pub fn parse(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Parse {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub(crate) fn from_reqwest(stage: NetworkStage, err: reqwest::Error) -> Self {
        let stage = if err.is_timeout() {
            NetworkStage::Timeout
        } else if err.is_connect() {
            NetworkStage::Connect
        } else {
            stage
        };
        let status = err.status().map(|s| s.as_u16());
        Self::network(stage, status, err.to_string())
    }

    pub(crate) fn from_sonic(status: Option<u16>, err: sonic_rs::Error) -> Self {
        Self::parse(status, err.to_string())
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    pub fn stage(&self) -> Option<NetworkStage> {
        match self {
            Self::Network { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Network { status, .. } | Self::Parse { status, .. } => *status,
            Self::Internal(_) => None,
        }
    }
}
