//! Moving batches over the network
//!
//! A [`Transport`] sends one batch of same-kind calls and returns one
//! result per call, in order. [`HttpTransport`] speaks the batch wire
//! format: queries as `GET {url}/{a,b}?batch=1&input=..`, mutations as
//! `POST {url}/{a,b}?batch=1` with the input object as body.

use async_trait::async_trait;
use serde_json::Value;
use wirestack_core::wire::{
    encode_batch_input, join_paths, Envelope, BATCH_PARAM, INPUT_PARAM,
};
use wirestack_core::{ProcedureKind, RpcError};

use crate::error::ClientError;

/// One logical procedure call
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub path: &'static str,
    pub input: Value,
}

/// Per-call outcome of a batch
pub type CallResult = Result<Value, RpcError>;

#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Send `calls` (all of `kind`) as one request.
    ///
    /// `Ok` must hold exactly one result per call, in order.
    async fn send(&self, kind: ProcedureKind, calls: &[Call]) -> Result<Vec<CallResult>, ClientError>;
}

/// Transport over HTTP with reqwest
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("wirestack-client/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url_for(&self, calls: &[Call]) -> String {
        let paths: Vec<&str> = calls.iter().map(|c| c.path).collect();
        format!("{}/{}", self.base_url, join_paths(&paths))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, kind: ProcedureKind, calls: &[Call]) -> Result<Vec<CallResult>, ClientError> {
        let url = self.url_for(calls);
        let inputs: Vec<Value> = calls.iter().map(|c| c.input.clone()).collect();
        let input = encode_batch_input(&inputs);

        tracing::debug!(%url, calls = calls.len(), %kind, "sending batch");

        let request = match kind {
            ProcedureKind::Query => self.http.get(&url).query(&[
                (BATCH_PARAM, "1".to_string()),
                (INPUT_PARAM, input.to_string()),
            ]),
            ProcedureKind::Mutation => self
                .http
                .post(&url)
                .query(&[(BATCH_PARAM, "1")])
                .json(&input),
        };

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        let value: Value = serde_json::from_slice(&body).map_err(|e| {
            ClientError::protocol(status, format!("body is not JSON: {}", e))
        })?;

        parse_batch_response(status, value, calls.len())
    }
}

/// Split a batch response into one result per call.
///
/// A single error envelope instead of an array means the whole request was
/// rejected; every call gets that error.
fn parse_batch_response(status: u16, value: Value, calls: usize) -> Result<Vec<CallResult>, ClientError> {
    match value {
        Value::Array(items) => {
            if items.len() != calls {
                return Err(ClientError::protocol(
                    status,
                    format!("expected {} results, got {}", calls, items.len()),
                ));
            }
            items
                .into_iter()
                .map(|item| {
                    serde_json::from_value::<Envelope>(item)
                        .map(Envelope::into_result)
                        .map_err(|e| ClientError::protocol(status, format!("malformed envelope: {}", e)))
                })
                .collect()
        }
        other => {
            let envelope = serde_json::from_value::<Envelope>(other)
                .map_err(|e| ClientError::protocol(status, format!("malformed envelope: {}", e)))?;
            match envelope.into_result() {
                Err(err) => Ok(vec![Err(err); calls]),
                Ok(_) => Err(ClientError::protocol(
                    status,
                    "expected a batch array, got a single result",
                )),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wirestack_core::RpcErrorCode;

    #[test]
    fn url_joins_paths() {
        let transport = HttpTransport::with_client(reqwest::Client::new(), "http://localhost:4000/trpc/");
        let calls = [
            Call { path: "hello.world", input: Value::Null },
            Call { path: "user.list", input: Value::Null },
        ];
        assert_eq!(
            transport.url_for(&calls),
            "http://localhost:4000/trpc/hello.world,user.list"
        );
    }

    #[test]
    fn array_response_maps_per_call() {
        let body = json!([
            {"result": {"data": 1}},
            {"error": {"message": "gone", "code": -32004, "data": {"code": "NOT_FOUND", "httpStatus": 404}}}
        ]);
        let results = parse_batch_response(207, body, 2).unwrap();
        assert_eq!(results[0], Ok(json!(1)));
        assert_eq!(results[1].as_ref().unwrap_err().code, RpcErrorCode::NotFound);
    }

    #[test]
    fn single_error_fans_out() {
        let body = json!({"error": {"message": "bad", "code": -32600, "data": {"code": "BAD_REQUEST", "httpStatus": 400}}});
        let results = parse_batch_response(400, body, 3).unwrap();
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.as_ref().unwrap_err().code == RpcErrorCode::BadRequest));
    }

    #[test]
    fn length_mismatch_is_protocol_error() {
        let err = parse_batch_response(200, json!([{"result": {"data": 1}}]), 2).unwrap_err();
        assert!(matches!(err, ClientError::Protocol { status: 200, .. }));
    }
}
