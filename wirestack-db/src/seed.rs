//! Default-record seeding
//!
//! Upserts keyed by email, so running the seed twice leaves one row per
//! default user.

use futures::future::join_all;
use wirestack_core::contract::user::{NewUser, User};

use crate::error::DbError;
use crate::users::UserStore;

/// A user inserted by the seed routine
#[derive(Debug, Clone, Copy)]
pub struct SeedUser {
    pub name: &'static str,
    pub email: &'static str,
}

impl From<&SeedUser> for NewUser {
    fn from(user: &SeedUser) -> Self {
        NewUser::new(user.name, user.email)
    }
}

/// Add your own users here to pre-populate the database
pub const DEFAULT_USERS: &[SeedUser] = &[SeedUser {
    name: "Tim Apple",
    email: "tim@apple.com",
}];

pub fn default_users() -> Vec<NewUser> {
    DEFAULT_USERS.iter().map(NewUser::from).collect()
}

/// Issue every upsert concurrently and wait for all of them.
///
/// A failing upsert does not cancel the others; every write runs to
/// completion before the first error (in input order) is returned. No
/// ordering between writes.
pub async fn upsert_all<S>(store: &S, users: &[NewUser]) -> Result<Vec<User>, DbError>
where
    S: UserStore + ?Sized,
{
    join_all(users.iter().map(|user| store.upsert(user)))
        .await
        .into_iter()
        .collect()
}

/// Seed `users`, then release the store.
///
/// The store is closed exactly once whether or not seeding succeeded.
/// Errors are logged here and returned so the caller can pick an exit code.
pub async fn run<S>(store: &S, users: &[NewUser]) -> Result<Vec<User>, DbError>
where
    S: UserStore + ?Sized,
{
    let outcome = upsert_all(store, users).await;

    match &outcome {
        Ok(seeded) => tracing::info!(count = seeded.len(), "seeded users"),
        Err(e) => tracing::error!(error = %e, "seeding failed"),
    }

    store.close().await;
    outcome
}
