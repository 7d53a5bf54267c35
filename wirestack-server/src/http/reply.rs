//! Envelope responses with status mapping
//!
//! A single call answers with its envelope's status. A batch answers with
//! the status every call shares, or 207 when they differ.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use wirestack_core::wire::{batch_status, Envelope};
use wirestack_core::RpcError;

/// Body of a procedure endpoint response
#[derive(Debug)]
pub enum RpcReply {
    Single(Envelope),
    Batch(Vec<Envelope>),
}

impl RpcReply {
    /// Request-level failure (malformed input, bad batch encoding)
    pub fn failed(err: &RpcError) -> Self {
        Self::Single(Envelope::from_error(err))
    }

    pub fn status(&self) -> StatusCode {
        let code = match self {
            Self::Single(envelope) => envelope.http_status(),
            Self::Batch(envelopes) => batch_status(envelopes),
        };
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for RpcReply {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::Single(envelope) => (status, Json(envelope)).into_response(),
            Self::Batch(envelopes) => (status, Json(envelopes)).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn ok_single_is_200() {
        let reply = RpcReply::Single(Envelope::ok(json!("x")));
        assert_eq!(reply.into_response().status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn failed_single_uses_error_status() {
        let reply = RpcReply::failed(&RpcError::not_found("nope.nope"));
        assert_eq!(reply.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn mixed_batch_is_multi_status() {
        let reply = RpcReply::Batch(vec![
            Envelope::ok(json!(1)),
            Envelope::from_error(&RpcError::bad_request("bad")),
        ]);
        assert_eq!(reply.into_response().status(), StatusCode::MULTI_STATUS);
    }
}
