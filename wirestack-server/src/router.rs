//! Procedure registry
//!
//! Procedures are registered on a [`RouterBuilder`], either raw (JSON in,
//! JSON out) or typed against a contract descriptor. Namespaced
//! sub-routers are combined with [`RouterBuilder::merge`], and
//! [`RouterBuilder::build`] checks that every name is valid and unique.
//! The resulting [`ProcedureRouter`] only resolves and invokes: no retry,
//! no validation beyond decoding the input.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::Value;
use wirestack_core::contract::{Mutation, Procedure, ProcedureKind, Query};
use wirestack_core::wire::PATH_SEPARATOR;
use wirestack_core::{RpcError, RpcErrorCode};

use crate::context::Context;
use crate::error::{ProcedureError, RouterError};

type Handler = Arc<dyn Fn(Context, Value) -> BoxFuture<'static, Result<Value, ProcedureError>> + Send + Sync>;

#[derive(Clone)]
struct Registered {
    kind: ProcedureKind,
    handler: Handler,
}

/// Collects procedure definitions
#[derive(Default)]
pub struct RouterBuilder {
    entries: Vec<(String, Registered)>,
}

impl RouterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a raw procedure under `name`
    pub fn procedure<F, Fut>(mut self, name: impl Into<String>, kind: ProcedureKind, handler: F) -> Self
    where
        F: Fn(Context, Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ProcedureError>> + Send + 'static,
    {
        let handler: Handler = Arc::new(move |ctx, input| handler(ctx, input).boxed());
        self.entries.push((name.into(), Registered { kind, handler }));
        self
    }

    /// Register a query handler for contract procedure `P`
    pub fn query<P, F, Fut>(self, handler: F) -> Self
    where
        P: Query,
        F: Fn(Context, P::Input) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<P::Output, ProcedureError>> + Send + 'static,
    {
        self.typed::<P, F, Fut>(handler)
    }

    /// Register a mutation handler for contract procedure `P`
    pub fn mutation<P, F, Fut>(self, handler: F) -> Self
    where
        P: Mutation,
        F: Fn(Context, P::Input) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<P::Output, ProcedureError>> + Send + 'static,
    {
        self.typed::<P, F, Fut>(handler)
    }

    fn typed<P, F, Fut>(self, handler: F) -> Self
    where
        P: Procedure,
        F: Fn(Context, P::Input) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<P::Output, ProcedureError>> + Send + 'static,
    {
        let handler = Arc::new(handler);
        self.procedure(P::PATH, P::KIND, move |ctx, raw| {
            let handler = Arc::clone(&handler);
            async move {
                let input: P::Input = serde_json::from_value(raw).map_err(ProcedureError::Input)?;
                let output = handler(ctx, input).await?;
                serde_json::to_value(output).map_err(ProcedureError::Output)
            }
        })
    }

    /// Add every procedure of `other`
    pub fn merge(mut self, other: RouterBuilder) -> Self {
        self.entries.extend(other.entries);
        self
    }

    /// Aggregate into a router, rejecting invalid or duplicate names
    pub fn build(self) -> Result<ProcedureRouter, RouterError> {
        let mut procedures = HashMap::with_capacity(self.entries.len());
        for (name, registered) in self.entries {
            validate_name(&name)?;
            if procedures.contains_key(&name) {
                return Err(RouterError::DuplicateProcedure(name));
            }
            procedures.insert(name, registered);
        }

        Ok(ProcedureRouter {
            procedures: Arc::new(procedures),
        })
    }
}

fn validate_name(name: &str) -> Result<(), RouterError> {
    let valid = !name.is_empty()
        && name.split('.').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c != PATH_SEPARATOR && c != '/' && !c.is_whitespace())
        });

    if valid {
        Ok(())
    } else {
        Err(RouterError::InvalidName(name.to_string()))
    }
}

/// Immutable set of named procedures. Cheap to clone.
#[derive(Clone)]
pub struct ProcedureRouter {
    procedures: Arc<HashMap<String, Registered>>,
}

impl ProcedureRouter {
    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.procedures.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.procedures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procedures.is_empty()
    }

    pub fn kind_of(&self, name: &str) -> Option<ProcedureKind> {
        self.procedures.get(name).map(|p| p.kind)
    }

    /// Invoke procedure `name` as `kind`
    pub async fn call(
        &self,
        ctx: Context,
        name: &str,
        kind: ProcedureKind,
        input: Value,
    ) -> Result<Value, RpcError> {
        let procedure = self
            .procedures
            .get(name)
            .ok_or_else(|| RpcError::not_found(name))?;

        if procedure.kind != kind {
            return Err(RpcError::new(
                RpcErrorCode::MethodNotSupported,
                format!("'{}' is a {}, not a {}", name, procedure.kind, kind),
            )
            .with_path(name));
        }

        tracing::debug!(procedure = name, %kind, "calling procedure");
        (procedure.handler)(ctx, input)
            .await
            .map_err(|e| e.into_rpc(name))
    }
}
