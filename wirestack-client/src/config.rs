//! Client configuration

use std::time::Duration;

/// Default procedure endpoint
pub const DEFAULT_URL: &str = "http://localhost:4000/trpc";

/// How long a query result counts as fresh
pub const DEFAULT_STALE_TIME: Duration = Duration::from_secs(60);

/// Upper bound on calls merged into one request
pub const DEFAULT_MAX_BATCH_SIZE: usize = 32;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Procedure endpoint, without a trailing procedure name
    pub url: String,
    pub stale_time: Duration,
    pub max_batch_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            stale_time: DEFAULT_STALE_TIME,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
        }
    }
}

impl ClientConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = stale_time;
        self
    }

    /// Values below 1 are treated as 1
    pub fn with_max_batch_size(mut self, max_batch_size: usize) -> Self {
        self.max_batch_size = max_batch_size.max(1);
        self
    }
}
