//! wirestack-server: typed procedures over HTTP
//!
//! Procedures are declared against the shared contract in
//! `wirestack-core`, aggregated into a [`ProcedureRouter`] and served by
//! axum under `/trpc`. Each call gets a fresh [`Context`] carrying the
//! process-wide database handle.

pub mod context;
pub mod error;
pub mod http;
pub mod router;
pub mod routers;
pub mod state;

pub use context::{create_context, Context};
pub use error::{ProcedureError, RouterError};
pub use http::{build_app, run_server, serve, ServerConfig, ServerError, RPC_ENDPOINT};
pub use router::{ProcedureRouter, RouterBuilder};
pub use routers::app_router;
pub use state::AppState;
