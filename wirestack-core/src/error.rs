//! Structured error codes shared by the server and the client.
//!
//! Every failed procedure call travels as a JSON-RPC style code plus a
//! symbolic name and the HTTP status the server answered with. Both sides
//! agree on this table, so a client can match on `RpcErrorCode` instead of
//! parsing messages.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Symbolic error code carried in every error envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RpcErrorCode {
    /// Request body or `input` parameter was not valid JSON
    ParseError,
    /// Input did not match the procedure's declared shape
    BadRequest,
    /// No procedure registered under the requested name
    NotFound,
    /// Query called over POST or mutation called over GET
    MethodNotSupported,
    /// Write rejected by a uniqueness constraint
    Conflict,
    /// Anything else; details are logged server-side only
    InternalServerError,
}

impl RpcErrorCode {
    /// JSON-RPC numeric code
    pub fn json_rpc_code(self) -> i32 {
        match self {
            Self::ParseError => -32700,
            Self::BadRequest => -32600,
            Self::NotFound => -32004,
            Self::MethodNotSupported => -32005,
            Self::Conflict => -32009,
            Self::InternalServerError => -32603,
        }
    }

    /// HTTP status the server answers with for a single failed call
    pub fn http_status(self) -> u16 {
        match self {
            Self::ParseError | Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::MethodNotSupported => 405,
            Self::Conflict => 409,
            Self::InternalServerError => 500,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ParseError => "PARSE_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::NotFound => "NOT_FOUND",
            Self::MethodNotSupported => "METHOD_NOT_SUPPORTED",
            Self::Conflict => "CONFLICT",
            Self::InternalServerError => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl std::fmt::Display for RpcErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed procedure call as seen on the wire
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{code} on '{}': {message}", .path.as_deref().unwrap_or("<unknown>"))]
pub struct RpcError {
    pub code: RpcErrorCode,
    pub message: String,
    /// Procedure name the error belongs to, when known
    pub path: Option<String>,
}

impl RpcError {
    pub fn new(code: RpcErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    /// Attach the procedure name
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Create a not-found error for an unregistered procedure
    pub fn not_found(path: impl Into<String>) -> Self {
        let path = path.into();
        Self::new(
            RpcErrorCode::NotFound,
            format!("no procedure found on path \"{}\"", path),
        )
        .with_path(path)
    }

    /// Create a bad-request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(RpcErrorCode::BadRequest, message)
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(RpcErrorCode::ParseError, message)
    }

    /// Create an internal error with the generic public message
    pub fn internal() -> Self {
        Self::new(
            RpcErrorCode::InternalServerError,
            "an internal error occurred",
        )
    }
}
