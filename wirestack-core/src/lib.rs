//! wirestack-core: the contract shared by server and client
//!
//! - [`contract`]: procedure descriptors (`hello.world`, `user.*`)
//! - [`wire`]: request/response envelopes and batch encoding
//! - [`error`]: error codes both sides agree on
//! - [`env`]: deployment environment detection

pub mod contract;
pub mod env;
pub mod error;
pub mod wire;

pub use contract::{Mutation, Procedure, ProcedureKind, Query};
pub use env::Environment;
pub use error::{RpcError, RpcErrorCode};
pub use wire::Envelope;
