use common_errors::AppError;
use sql_connection::{PgError, PoolError};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("record not found: {record_id}")]
    NotFound { record_id: Uuid },
    #[error("{0}")]
    Validation(String),
    #[error("database error: {0}")]
    Database(#[from] PgError),
    #[error("database pool error: {0}")]
    Pool(#[from] PoolError),
}

impl From<RecordError> for AppError {
    fn from(err: RecordError) -> Self {
        match err {
            RecordError::NotFound { record_id } => {
                AppError::not_found(
                    "RECORD_NOT_FOUND",
                    &format!("Record {record_id} not found"),
                )
            }
            RecordError::Validation(message) => {
                AppError::bad_request("VALIDATION_FAILED", &message)
            }
            RecordError::Database(db_err) => {
                AppError::internal_server_error(&format!(
                    "Database error: {db_err}"
                ))
            }
            RecordError::Pool(pool_err) => {
                AppError::internal_server_error(&format!(
                    "Database connection error: {pool_err}"
                ))
            }
        }
    }
}
