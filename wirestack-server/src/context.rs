//! Per-call context handed to procedure handlers

use wirestack_db::{Database, UserRepo};

use crate::state::AppState;

/// Context for one procedure call. Discarded when the call completes.
#[derive(Clone, Debug)]
pub struct Context {
    db: Database,
}

impl Context {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// The process-wide connection pool
    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn users(&self) -> UserRepo<'_> {
        self.db.users()
    }
}

/// Build the context for one inbound call
pub fn create_context(state: &AppState) -> Context {
    Context::new(state.db().clone())
}
