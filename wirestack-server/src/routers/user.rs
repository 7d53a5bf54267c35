//! `user` namespace

use wirestack_core::contract::user::{List, Upsert};
use wirestack_core::RpcError;

use crate::error::ProcedureError;
use crate::router::RouterBuilder;

pub fn router() -> RouterBuilder {
    RouterBuilder::new()
        .query::<List, _, _>(|ctx, ()| async move {
            ctx.users().list().await.map_err(ProcedureError::from)
        })
        .mutation::<Upsert, _, _>(|ctx, user| async move {
            if user.email.trim().is_empty() {
                return Err(ProcedureError::from(RpcError::bad_request(
                    "email must not be empty",
                )));
            }
            ctx.users().upsert(&user).await.map_err(ProcedureError::from)
        })
}
