use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{debug, error};

use crate::domain::errors::{ErrorKind, TournamentError};

/// API error type with HTTP status code, machine code and message
///
/// Rendered as `{"success": false, "error": {"code", "message"}}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    /// Creates a new API error
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// Creates a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    /// Creates a 401 Unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
    }

    /// Creates a 404 Not Found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "success": false,
            "error": {
                "code": self.code,
                "message": self.message,
            }
        }));

        (self.status, body).into_response()
    }
}

impl From<TournamentError> for ApiError {
    fn from(err: TournamentError) -> Self {
        let status = match err.kind() {
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let TournamentError::Storage(source) = &err {
            error!(error = %source, "Storage failure");
        }
        Self::new(status, err.code(), err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(format!("Corps de requête invalide : {}", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        debug!(reason = %rejection.body_text(), "Rejected path parameter");
        Self::bad_request("ID invalide")
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(format!("Paramètres invalides : {}", rejection.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placement_conflicts_map_to_409() {
        let err = ApiError::from(TournamentError::SlotFull);
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(err.code, "SLOT_FULL");
    }

    #[test]
    fn storage_failures_hide_details() {
        let err = ApiError::from(TournamentError::Storage(
            crate::domain::repositories::RepositoryError::Database("disk full".to_string()),
        ));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message.contains("disk full"));
    }

    #[test]
    fn forbidden_maps_to_403() {
        let err = ApiError::from(TournamentError::forbidden("non"));
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.message, "non");
    }
}
