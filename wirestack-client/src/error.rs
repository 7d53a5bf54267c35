//! Client error type
//!
//! Cloneable so one transport failure can be delivered to every caller
//! whose call rode in the failed batch.

use std::sync::Arc;

use thiserror::Error;
use wirestack_core::RpcError;

#[derive(Error, Debug, Clone)]
pub enum ClientError {
    /// The server answered this call with an error envelope
    #[error(transparent)]
    Rpc(#[from] RpcError),

    /// The HTTP request itself failed
    #[error("request failed: {0}")]
    Transport(Arc<reqwest::Error>),

    /// The server answered with something that is not a valid envelope
    #[error("unexpected response (HTTP {status}): {reason}")]
    Protocol { status: u16, reason: String },

    #[error("failed to encode input for '{path}': {source}")]
    Encode {
        path: &'static str,
        source: Arc<serde_json::Error>,
    },

    #[error("failed to decode output of '{path}': {source}")]
    Decode {
        path: &'static str,
        source: Arc<serde_json::Error>,
    },

    /// The batch dispatcher has stopped
    #[error("batch link is closed")]
    LinkClosed,
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(Arc::new(e))
    }
}

impl ClientError {
    pub fn protocol(status: u16, reason: impl Into<String>) -> Self {
        Self::Protocol {
            status,
            reason: reason.into(),
        }
    }

    /// The server-side error, if the call reached a procedure
    pub fn as_rpc(&self) -> Option<&RpcError> {
        match self {
            Self::Rpc(e) => Some(e),
            _ => None,
        }
    }
}
