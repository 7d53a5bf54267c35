//! Error types for wirestack-server

use thiserror::Error;
use wirestack_core::{RpcError, RpcErrorCode};
use wirestack_db::DbError;

/// Error returned by a procedure handler
#[derive(Error, Debug)]
pub enum ProcedureError {
    /// Error the handler wants the caller to see as-is
    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error("database error: {0}")]
    Database(#[from] DbError),

    #[error("invalid input: {0}")]
    Input(serde_json::Error),

    #[error("failed to encode output: {0}")]
    Output(serde_json::Error),
}

impl ProcedureError {
    /// Convert to the wire error for procedure `path`.
    ///
    /// Database and encoding failures are logged here and reach the caller
    /// only as a generic internal error.
    pub fn into_rpc(self, path: &str) -> RpcError {
        let err = match self {
            Self::Rpc(e) => e,
            Self::Database(e) if e.is_unique_violation() => {
                RpcError::new(RpcErrorCode::Conflict, "record already exists")
            }
            Self::Database(e) => {
                tracing::error!(path, error = %e, "procedure database error");
                RpcError::internal()
            }
            Self::Input(e) => RpcError::bad_request(format!("invalid input: {}", e)),
            Self::Output(e) => {
                tracing::error!(path, error = %e, "procedure output encoding failed");
                RpcError::internal()
            }
        };

        match err.path {
            Some(_) => err,
            None => err.with_path(path),
        }
    }
}

/// Router construction error
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RouterError {
    #[error("procedure '{0}' is registered more than once")]
    DuplicateProcedure(String),

    #[error("invalid procedure name '{0}'")]
    InvalidName(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handler_rpc_error_keeps_code_and_gains_path() {
        let err = ProcedureError::from(RpcError::bad_request("name required"));
        let rpc = err.into_rpc("user.upsert");
        assert_eq!(rpc.code, RpcErrorCode::BadRequest);
        assert_eq!(rpc.message, "name required");
        assert_eq!(rpc.path.as_deref(), Some("user.upsert"));
    }

    #[test]
    fn database_error_is_hidden() {
        let err = ProcedureError::from(DbError::Config("pool closed".into()));
        let rpc = err.into_rpc("user.list");
        assert_eq!(rpc.code, RpcErrorCode::InternalServerError);
        assert_eq!(rpc.message, "an internal error occurred");
    }

    #[test]
    fn bad_input_is_bad_request() {
        let json_err = serde_json::from_str::<u32>("\"x\"").unwrap_err();
        let rpc = ProcedureError::Input(json_err).into_rpc("x.y");
        assert_eq!(rpc.code, RpcErrorCode::BadRequest);
        assert!(rpc.message.starts_with("invalid input"));
    }
}
