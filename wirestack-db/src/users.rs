//! User repository
//!
//! - upsert: INSERT with ON CONFLICT (email) (idempotent, no check-then-insert)
//! - list: single query ordered by email

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use wirestack_core::contract::user::{NewUser, User};

use crate::error::DbError;
use crate::Database;

/// User record from database
#[derive(Debug, Clone, FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Write side used by the seed routine.
///
/// `close` releases the underlying handle; callers invoke it once when done.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn upsert(&self, user: &NewUser) -> Result<User, DbError>;
    async fn close(&self);
}

/// User repository
pub struct UserRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a user, or update the name of the user with the same email.
    pub async fn upsert(&self, user: &NewUser) -> Result<User, DbError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (name, email) VALUES ($1, $2)
            ON CONFLICT (email) DO UPDATE
                SET name = EXCLUDED.name, updated_at = now()
            RETURNING id, name, email, created_at, updated_at
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// All users, ordered by email.
    pub async fn list(&self) -> Result<Vec<User>, DbError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, created_at, updated_at
            FROM users
            ORDER BY email
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(User::from))
    }
}

#[async_trait]
impl UserStore for Database {
    async fn upsert(&self, user: &NewUser) -> Result<User, DbError> {
        self.users().upsert(user).await
    }

    async fn close(&self) {
        Database::close(self).await;
    }
}
