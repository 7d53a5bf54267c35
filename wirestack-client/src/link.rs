//! Request batching
//!
//! Calls issued in the same scheduler tick are collected by a single
//! dispatcher task, split by kind (queries and mutations never share a
//! request) and by `max_batch_size`, and each group is sent as one
//! transport request. Results are routed back to callers by position.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use wirestack_core::ProcedureKind;

use crate::error::ClientError;
use crate::transport::{Call, Transport};

type Reply = oneshot::Sender<Result<Value, ClientError>>;

struct Pending {
    kind: ProcedureKind,
    call: Call,
    reply: Reply,
}

/// Handle to the batch dispatcher. Cheap to clone.
#[derive(Clone)]
pub struct BatchLink {
    tx: mpsc::UnboundedSender<Pending>,
}

impl std::fmt::Debug for BatchLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchLink")
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

impl BatchLink {
    /// Start the dispatcher. Must be called inside a Tokio runtime.
    pub fn new(transport: Arc<dyn Transport>, max_batch_size: usize) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(dispatch_loop(transport, rx, max_batch_size.max(1)));
        Self { tx }
    }

    /// Enqueue one call and wait for its result
    pub async fn call(
        &self,
        kind: ProcedureKind,
        path: &'static str,
        input: Value,
    ) -> Result<Value, ClientError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Pending {
                kind,
                call: Call { path, input },
                reply,
            })
            .map_err(|_| ClientError::LinkClosed)?;
        rx.await.map_err(|_| ClientError::LinkClosed)?
    }
}

async fn dispatch_loop(
    transport: Arc<dyn Transport>,
    mut rx: mpsc::UnboundedReceiver<Pending>,
    max_batch_size: usize,
) {
    while let Some(first) = rx.recv().await {
        // Let the rest of this tick's callers enqueue.
        tokio::task::yield_now().await;

        let mut pending = vec![first];
        while let Ok(next) = rx.try_recv() {
            pending.push(next);
        }

        let (queries, mutations): (Vec<_>, Vec<_>) = pending
            .into_iter()
            .partition(|p| p.kind == ProcedureKind::Query);

        for (kind, mut group) in [
            (ProcedureKind::Query, queries),
            (ProcedureKind::Mutation, mutations),
        ] {
            while !group.is_empty() {
                let rest = group.split_off(group.len().min(max_batch_size));
                let chunk = std::mem::replace(&mut group, rest);
                tokio::spawn(send_batch(Arc::clone(&transport), kind, chunk));
            }
        }
    }
    tracing::debug!("batch link dispatcher stopped");
}

async fn send_batch(transport: Arc<dyn Transport>, kind: ProcedureKind, batch: Vec<Pending>) {
    let calls: Vec<Call> = batch.iter().map(|p| p.call.clone()).collect();

    match transport.send(kind, &calls).await {
        Ok(results) if results.len() == batch.len() => {
            for (pending, result) in batch.into_iter().zip(results) {
                let _ = pending.reply.send(result.map_err(ClientError::from));
            }
        }
        Ok(results) => {
            let err = ClientError::protocol(
                0,
                format!("transport returned {} results for {} calls", results.len(), batch.len()),
            );
            fail_all(batch, err);
        }
        Err(err) => {
            tracing::warn!(error = %err, calls = calls.len(), %kind, "batch request failed");
            fail_all(batch, err);
        }
    }
}

fn fail_all(batch: Vec<Pending>, err: ClientError) {
    for pending in batch {
        let _ = pending.reply.send(Err(err.clone()));
    }
}
