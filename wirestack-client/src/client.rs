//! Typed client facade

use std::sync::Arc;

use serde_json::Value;
use wirestack_core::{Mutation, Procedure, ProcedureKind, Query};

use crate::cache::QueryCache;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::link::BatchLink;
use crate::transport::{HttpTransport, Transport};

/// Calls procedures declared in `wirestack_core::contract`.
///
/// Queries issued together are batched and their results cached for the
/// configured stale time. Cloning shares the link and cache.
#[derive(Debug, Clone)]
pub struct Client {
    link: BatchLink,
    cache: Arc<QueryCache>,
}

impl Client {
    /// HTTP client for `config.url`. Must be called inside a Tokio runtime.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let transport = HttpTransport::new(config.url.as_str())?;
        Ok(Self::with_transport(Arc::new(transport), config))
    }

    pub fn with_transport(transport: Arc<dyn Transport>, config: &ClientConfig) -> Self {
        Self {
            link: BatchLink::new(transport, config.max_batch_size),
            cache: Arc::new(QueryCache::new(config.stale_time)),
        }
    }

    pub async fn query<P: Query>(&self, input: &P::Input) -> Result<P::Output, ClientError> {
        let input = encode::<P>(input)?;

        if let Some(hit) = self.cache.get_fresh(P::PATH, &input) {
            tracing::trace!(path = P::PATH, "query cache hit");
            return decode::<P>(hit);
        }

        let value = self
            .link
            .call(ProcedureKind::Query, P::PATH, input.clone())
            .await?;
        self.cache.insert(P::PATH, &input, value.clone());
        decode::<P>(value)
    }

    pub async fn mutate<P: Mutation>(&self, input: &P::Input) -> Result<P::Output, ClientError> {
        let input = encode::<P>(input)?;
        let value = self.link.call(ProcedureKind::Mutation, P::PATH, input).await?;
        decode::<P>(value)
    }

    /// Forget cached results of query `P`
    pub fn invalidate<P: Query>(&self) {
        self.cache.invalidate(P::PATH);
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }
}

fn encode<P: Procedure>(input: &P::Input) -> Result<Value, ClientError> {
    serde_json::to_value(input).map_err(|e| ClientError::Encode {
        path: P::PATH,
        source: Arc::new(e),
    })
}

fn decode<P: Procedure>(value: Value) -> Result<P::Output, ClientError> {
    serde_json::from_value(value).map_err(|e| ClientError::Decode {
        path: P::PATH,
        source: Arc::new(e),
    })
}
