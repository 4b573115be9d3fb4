//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::DomainError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from the client.
    BadRequest(String),
    /// Domain logic error.
    Domain(DomainError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Domain(err) => domain_error_to_response(err),
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn domain_error_to_response(err: DomainError) -> (StatusCode, String) {
    match &err {
        DomainError::EmailRequired | DomainError::InvalidPagination { .. } => {
            (StatusCode::BAD_REQUEST, err.to_string())
        }
        DomainError::UserNotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
        DomainError::EmailExists(_) | DomainError::UserAlreadyExists(_) => {
            (StatusCode::CONFLICT, err.to_string())
        }
        _ => {
            tracing::error!(error = %err, "internal server error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            )
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::UserId;

    fn status_of(err: DomainError) -> StatusCode {
        ApiError::from(err).into_response().status()
    }

    #[test]
    fn test_domain_errors_map_to_status_codes() {
        let id = UserId::new();
        assert_eq!(status_of(DomainError::EmailRequired), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(DomainError::InvalidPagination { offset: -1 }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(DomainError::UserNotFound(id)), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(DomainError::EmailExists("a@b.c".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(DomainError::UserAlreadyExists(id)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(DomainError::PasswordHash("boom".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_bad_request() {
        let response = ApiError::BadRequest("nope".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
