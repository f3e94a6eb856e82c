/// Error handling for the API server
///
/// A unified error type that maps to HTTP responses. Handlers return
/// `Result<T, ApiError>`, which converts into a status code plus the
/// single-key body `{"error": "<message>"}` used by every failure in the
/// API.
///
/// Mapping:
///
/// | Variant              | Status |
/// |----------------------|--------|
/// | `Validation`         | 400    |
/// | `Conflict`           | 400    |
/// | `Unauthorized`       | 401    |
/// | `Forbidden`          | 403    |
/// | `NotFound`           | 404    |
/// | `Internal`           | 500    |
/// | `ServiceUnavailable` | 503    |
///
/// Uniqueness and singleton violations respond with 400 rather than 409; the
/// management frontend treats every rejected write uniformly.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gestproy_shared::auth::jwt::JwtError;
use gestproy_shared::auth::password::PasswordError;
use gestproy_shared::models::miembro::MiembroError;
use gestproy_shared::models::proyecto::ProyectoError;
use gestproy_shared::models::rol::RolError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Missing or malformed required field (400)
    Validation(String),

    /// Uniqueness or singleton violation (400)
    Conflict(String),

    /// Missing/invalid/expired token or disabled account (401)
    Unauthorized(String),

    /// Caller lacks rights or target is a protected fixed resource (403)
    Forbidden(String),

    /// Referenced entity absent (404)
    NotFound(String),

    /// Internal server error (500)
    Internal(String),

    /// Store unreachable (503)
    ServiceUnavailable(String),
}

/// Error response body: a single human-readable message
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(msg) => write!(f, "Validation error: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
            ApiError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            ApiError::ServiceUnavailable(msg) => {
                tracing::error!("Service unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Database is unavailable".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Convert sqlx errors to API errors
///
/// Connectivity failures surface as an explicit 503 instead of propagating
/// as an unhandled fault; constraint violations surface as 400 Conflict.
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                ApiError::ServiceUnavailable(format!("Connection pool error: {}", err))
            }
            sqlx::Error::Io(e) => ApiError::ServiceUnavailable(format!("Database I/O error: {}", e)),
            sqlx::Error::Database(db_err) => {
                if db_err.constraint().is_some() {
                    return ApiError::Conflict(format!(
                        "Constraint violation: {}",
                        db_err.constraint().unwrap_or_default()
                    ));
                }
                ApiError::Internal(format!("Database error: {}", db_err))
            }
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

impl From<MiembroError> for ApiError {
    fn from(err: MiembroError) -> Self {
        match err {
            MiembroError::NotFound
            | MiembroError::ProyectoNotFound
            | MiembroError::RolNotFound => ApiError::NotFound(err.to_string()),
            MiembroError::AlreadyMember | MiembroError::SingletonRoleTaken(_) => {
                ApiError::Conflict(err.to_string())
            }
            MiembroError::Database(e) => e.into(),
        }
    }
}

impl From<RolError> for ApiError {
    fn from(err: RolError) -> Self {
        match err {
            RolError::NotFound => ApiError::NotFound(err.to_string()),
            RolError::FixedImmutable => ApiError::Forbidden(err.to_string()),
            RolError::Database(e) => e.into(),
        }
    }
}

impl From<ProyectoError> for ApiError {
    fn from(err: ProyectoError) -> Self {
        match err {
            ProyectoError::NotFound => ApiError::NotFound(err.to_string()),
            ProyectoError::NotCreator => ApiError::Forbidden(err.to_string()),
            ProyectoError::Database(e) => e.into(),
        }
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => ApiError::Unauthorized("Token expired".to_string()),
            JwtError::InvalidIssuer => ApiError::Unauthorized("Invalid token issuer".to_string()),
            _ => ApiError::Unauthorized(format!("Invalid token: {}", err)),
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::Internal(format!("Password operation failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::Validation("Field 'nombre' is required".to_string());
        assert_eq!(
            err.to_string(),
            "Validation error: Field 'nombre' is required"
        );

        let err = ApiError::NotFound("Project not found".to_string());
        assert_eq!(err.to_string(), "Not found: Project not found");
    }

    #[test]
    fn test_conflict_maps_to_bad_request() {
        let response = ApiError::Conflict("duplicate".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_fixed_role_maps_to_forbidden() {
        let response = ApiError::from(RolError::FixedImmutable).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_singleton_taken_maps_to_conflict() {
        let err = ApiError::from(MiembroError::SingletonRoleTaken("Product Owner".to_string()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_row_not_found_maps_to_404() {
        let response = ApiError::from(sqlx::Error::RowNotFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_pool_errors_map_to_503() {
        let response = ApiError::from(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
