//! Procedure contract shared by server and client
//!
//! Each procedure is a zero-sized descriptor type. The server registers a
//! handler against the descriptor and the client calls through it, so the
//! name, input and output types are checked at compile time on both ends
//! without any runtime dependency between them.

pub mod hello;
pub mod user;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Whether a procedure reads (query) or writes (mutation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcedureKind {
    Query,
    Mutation,
}

impl std::fmt::Display for ProcedureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Query => f.write_str("query"),
            Self::Mutation => f.write_str("mutation"),
        }
    }
}

/// A named remote procedure
pub trait Procedure: Send + Sync + 'static {
    /// Dotted procedure name, e.g. `hello.world`
    const PATH: &'static str;
    const KIND: ProcedureKind;

    type Input: Serialize + DeserializeOwned + Send + Sync + 'static;
    type Output: Serialize + DeserializeOwned + Send + Sync + 'static;
}

/// Marker for procedures callable as queries
pub trait Query: Procedure {}

/// Marker for procedures callable as mutations
pub trait Mutation: Procedure {}
