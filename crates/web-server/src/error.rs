use actions::ActionError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use database::DbError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),
    #[error("Action error: {0}")]
    Action(#[from] ActionError),
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let db_err = match self {
            AppError::Database(db_err) => db_err,
            AppError::Action(ActionError::Database(db_err)) => db_err,
        };

        let (status, error_message) = match db_err {
            DbError::NotFound => (StatusCode::NOT_FOUND, DbError::NotFound.to_string()),
            // Already logged with its cause by the repository.
            DbError::Query(op) => (StatusCode::INTERNAL_SERVER_ERROR, op.message().to_string()),
            other => {
                tracing::error!(error = ?other, "Database error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal database error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
