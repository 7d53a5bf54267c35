//! `hello` namespace

use wirestack_core::contract::hello::{World, HELLO_WORLD_MESSAGE};

use crate::error::ProcedureError;
use crate::router::RouterBuilder;

pub fn router() -> RouterBuilder {
    RouterBuilder::new().query::<World, _, _>(|_ctx, ()| async {
        Ok::<_, ProcedureError>(HELLO_WORLD_MESSAGE.to_string())
    })
}
