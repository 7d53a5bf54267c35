//! Application state shared across handlers

use std::sync::Arc;

use wirestack_db::Database;

use crate::router::ProcedureRouter;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    db: Database,
    router: ProcedureRouter,
}

impl AppState {
    pub fn new(db: Database, router: ProcedureRouter) -> Self {
        Self {
            inner: Arc::new(AppStateInner { db, router }),
        }
    }

    pub fn db(&self) -> &Database {
        &self.inner.db
    }

    pub fn router(&self) -> &ProcedureRouter {
        &self.inner.router
    }
}
