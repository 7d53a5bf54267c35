//! Procedure endpoint
//!
//! `GET /{path}` runs queries, `POST /{path}` runs mutations. With
//! `?batch=1` the path holds comma-separated names and the input is keyed
//! by call index; calls in a batch run concurrently and answer in request
//! order.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::Router;
use futures::future::join_all;
use serde::Deserialize;
use serde_json::Value;
use wirestack_core::wire::{decode_batch_input, split_paths, Envelope};
use wirestack_core::{ProcedureKind, RpcError};

use crate::context::create_context;
use crate::http::reply::RpcReply;
use crate::state::AppState;

/// Query-string parameters of a procedure request
#[derive(Debug, Default, Deserialize)]
pub struct RpcParams {
    pub batch: Option<String>,
    /// JSON-encoded input (GET only)
    pub input: Option<String>,
}

impl RpcParams {
    fn is_batch(&self) -> bool {
        matches!(self.batch.as_deref(), Some("1") | Some("true"))
    }
}

/// GET /{path}
async fn run_queries(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(params): Query<RpcParams>,
) -> RpcReply {
    let input = match params.input.as_deref().map(serde_json::from_str::<Value>) {
        None => None,
        Some(Ok(value)) => Some(value),
        Some(Err(e)) => {
            return RpcReply::failed(&RpcError::parse(format!("input is not valid JSON: {}", e)))
        }
    };

    dispatch(&state, &path, ProcedureKind::Query, params.is_batch(), input).await
}

/// POST /{path}
async fn run_mutations(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(params): Query<RpcParams>,
    body: Bytes,
) -> RpcReply {
    let input = if body.is_empty() {
        None
    } else {
        match serde_json::from_slice::<Value>(&body) {
            Ok(value) => Some(value),
            Err(e) => {
                return RpcReply::failed(&RpcError::parse(format!("body is not valid JSON: {}", e)))
            }
        }
    };

    dispatch(&state, &path, ProcedureKind::Mutation, params.is_batch(), input).await
}

async fn dispatch(
    state: &AppState,
    path: &str,
    kind: ProcedureKind,
    batch: bool,
    input: Option<Value>,
) -> RpcReply {
    let router = state.router();

    if !batch {
        let ctx = create_context(state);
        let outcome = router
            .call(ctx, path, kind, input.unwrap_or(Value::Null))
            .await;
        return RpcReply::Single(Envelope::from(outcome));
    }

    let names = split_paths(path);
    let inputs = match decode_batch_input(input, names.len()) {
        Ok(inputs) => inputs,
        Err(e) => return RpcReply::failed(&e),
    };

    tracing::debug!(calls = names.len(), %kind, "batched request");
    let calls = names
        .iter()
        .zip(inputs)
        .map(|(name, input)| router.call(create_context(state), name, kind, input));

    let envelopes = join_all(calls).await.into_iter().map(Envelope::from).collect();
    RpcReply::Batch(envelopes)
}

/// Procedure routes, relative to the endpoint prefix
pub fn router() -> Router<AppState> {
    Router::new().route("/{path}", get(run_queries).post(run_mutations))
}
