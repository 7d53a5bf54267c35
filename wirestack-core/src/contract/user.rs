//! `user` namespace and the user record shape

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Mutation, Procedure, ProcedureKind, Query};

/// Stored user. `email` is the natural key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted by an upsert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

impl NewUser {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// `user.list`: every user, ordered by email
pub struct List;

impl Procedure for List {
    const PATH: &'static str = "user.list";
    const KIND: ProcedureKind = ProcedureKind::Query;

    type Input = ();
    type Output = Vec<User>;
}

impl Query for List {}

/// `user.upsert`: insert or update by email
pub struct Upsert;

impl Procedure for Upsert {
    const PATH: &'static str = "user.upsert";
    const KIND: ProcedureKind = ProcedureKind::Mutation;

    type Input = NewUser;
    type Output = User;
}

impl Mutation for Upsert {}
