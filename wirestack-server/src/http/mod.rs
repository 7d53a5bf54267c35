//! HTTP layer
//!
//! Axum server with:
//! - Procedure endpoint under `/trpc` (single and batched calls)
//! - CORS (localhost only by default)
//! - Request tracing
//! - Graceful shutdown

pub mod error;
pub mod reply;
pub mod routes;
pub mod server;

pub use error::ServerError;
pub use reply::RpcReply;
pub use server::{build_app, run_server, serve, ServerConfig, RPC_ENDPOINT};
