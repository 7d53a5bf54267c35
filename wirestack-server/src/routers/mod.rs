//! Application procedures, one sub-router per namespace

pub mod hello;
pub mod user;

use crate::error::RouterError;
use crate::router::{ProcedureRouter, RouterBuilder};

/// Every procedure the server exposes
pub fn app_router() -> Result<ProcedureRouter, RouterError> {
    RouterBuilder::new()
        .merge(hello::router())
        .merge(user::router())
        .build()
}
