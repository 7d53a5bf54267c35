//! Server error type

use crate::error::RouterError;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("router error: {0}")]
    Router(#[from] RouterError),
}
