//! wirestack-db: data access for wirestack
//!
//! [`Database::connect`] is the single way to obtain the connection pool.
//! Every environment gets at most one live pool per process. Outside
//! production the pool is also parked in a process-global slot, so
//! rebuilding application state (dev reloads, test harnesses) reuses it
//! instead of opening a fresh pool each time.

pub mod error;
pub mod pool;
pub mod seed;
pub mod singleton;
pub mod users;

use sqlx::PgPool;

pub use error::DbError;
pub use pool::{create_pool, DbConfig};
pub use singleton::{Cached, ClientSingleton, GlobalSlot};
pub use users::{UserRepo, UserStore};

/// Reload-surviving copy of the pool, written outside production only
static POOL_SLOT: GlobalSlot<PgPool> = GlobalSlot::new();

/// The per-process pool owner
static POOL: ClientSingleton<PgPool> = ClientSingleton::new(&POOL_SLOT);

/// Handle to the process-wide connection pool. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
    /// Set when the pool came from [`POOL`]
    generation: Option<u64>,
}

impl Database {
    /// Get the process-wide pool, constructing it on first call.
    ///
    /// Construction errors (bad URL, zero connection limit) propagate.
    pub fn connect(config: &DbConfig) -> Result<Self, DbError> {
        let cached = POOL.get_or_try_init(&config.environment, || {
            tracing::info!(
                env = %config.environment,
                max_connections = config.max_connections,
                "creating database pool"
            );
            create_pool(config)
        })?;

        Ok(Self {
            pool: cached.handle,
            generation: Some(cached.generation),
        })
    }

    /// Wrap an existing pool without touching the process-wide cache
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            pool,
            generation: None,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn users(&self) -> UserRepo<'_> {
        UserRepo::new(&self.pool)
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    /// Release the pool.
    ///
    /// When this is the cached process-wide pool, the cache and the global
    /// slot are emptied too, so a later [`connect`](Self::connect) builds a
    /// fresh pool rather than returning this closed one. Closing a handle
    /// from [`from_pool`](Self::from_pool), or one whose pool was already
    /// replaced, leaves the cache alone.
    pub async fn close(&self) {
        if let Some(generation) = self.generation {
            POOL.release(generation);
        }
        self.pool.close().await;
        tracing::debug!("database pool closed");
    }
}
