use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use database::DbError;
use serde_json::json;
use thiserror::Error;
use tracing;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid parameter: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Database unavailable")]
    Unavailable,
    #[error("Database error: {0}")]
    Database(DbError),
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            // A failed checkout means the store is unreachable or the pool
            // is exhausted; later requests may still succeed.
            DbError::Acquire(_) => ApiError::Unavailable,
            other => ApiError::Database(other),
        }
    }
}

/// Converts our custom `ApiError` into an HTTP response.
///
/// Service-side failures are logged in full and answered with a generic
/// message: neither credentials nor raw query text may reach the caller.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::Unavailable => {
                tracing::error!("Failed to acquire a database connection.");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "The database is currently unavailable".to_string(),
                )
            }
            ApiError::Database(db_err) => {
                tracing::error!(error = ?db_err, "Database error.");
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request() {
        let response = ApiError::Validation("limit must be between 1 and 100".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_maps_to_404() {
        let response = ApiError::NotFound("User not found".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn acquire_failure_maps_to_service_unavailable() {
        let err: ApiError = DbError::Acquire(sqlx_acquire_error()).into();
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn query_failure_maps_to_internal_error_with_generic_body() {
        let err: ApiError = DbError::EmptyAggregate.into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    fn sqlx_acquire_error() -> database::sqlx::Error {
        database::sqlx::Error::PoolTimedOut
    }
}
