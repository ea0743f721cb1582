use database::DbError;
use thiserror::Error;

/// Failures an action cannot turn into form state.
#[derive(Error, Debug)]
pub enum ActionError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),
}
