//! Unified error handling for the payment workflow.
//!
//! Provides a single error type that services return and that converts to
//! Axum HTTP responses at the gateway.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::DomainError;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Application error types.
///
/// Client-class variants are expected outcomes rendered verbatim to the user.
/// `PartialApply` and the collaborator variants are faults.
#[derive(Error, Debug)]
pub enum AppError {
    // Identity
    #[error("Authentication required")]
    Unauthorized,

    #[error("Access denied")]
    Forbidden,

    // Client errors
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    InvalidState(String),

    #[error("{0}")]
    MethodUnavailable(String),

    // Consistency fault: payment stamped approved, profile not updated
    #[error("Payment {payment_id} approved but subscription of user {user_id} was not updated")]
    PartialApply {
        payment_id: Uuid,
        user_id: Uuid,
        #[source]
        source: Box<AppError>,
    },

    // External collaborator errors
    #[cfg(feature = "database")]
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    #[cfg(feature = "jwt")]
    #[error("Authentication error")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Collaborator error: {0}")]
    Collaborator(String),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body for HTTP
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Forbidden => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::InvalidState(_) => "INVALID_STATE",
            AppError::MethodUnavailable(_) => "METHOD_UNAVAILABLE",
            AppError::PartialApply { .. } => "PARTIAL_APPLY",
            #[cfg(feature = "database")]
            AppError::Database(_) => "DATABASE_ERROR",
            #[cfg(feature = "jwt")]
            AppError::Jwt(_) => "AUTH_ERROR",
            AppError::Collaborator(_) => "COLLABORATOR_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            #[cfg(feature = "jwt")]
            AppError::Jwt(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidState(_) => StatusCode::CONFLICT,
            AppError::MethodUnavailable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// True for failures that indicate a fault rather than a rejected request
    pub fn is_fault(&self) -> bool {
        self.status().is_server_error()
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            // Show full message for client errors
            AppError::Validation(msg)
            | AppError::InvalidState(msg)
            | AppError::MethodUnavailable(msg) => msg.clone(),

            // Hide details for internal errors; the service already logged context
            AppError::PartialApply { .. } => {
                "The payment was approved but the subscription could not be updated. Retry the subscription sync.".to_string()
            }
            #[cfg(feature = "database")]
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            #[cfg(feature = "jwt")]
            AppError::Jwt(e) => {
                tracing::debug!("JWT error: {:?}", e);
                "Invalid or expired token".to_string()
            }
            AppError::Collaborator(msg) => {
                tracing::error!("Collaborator error: {}", msg);
                "A dependent service failed".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            // Use default message for others
            _ => self.to_string(),
        }
    }
}

// =============================================================================
// HTTP Response (Axum)
// =============================================================================

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code().to_string(),
                message: self.user_message(),
            },
        };

        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AppError::Validation(msg),
            DomainError::NotFound(entity) => AppError::NotFound(entity),
            DomainError::InvalidState(msg) => AppError::InvalidState(msg),
            DomainError::MethodUnavailable(msg) => AppError::MethodUnavailable(msg),
            DomainError::Forbidden => AppError::Forbidden,
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self, entity: &str) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, entity: &str) -> AppResult<T> {
        self.ok_or_else(|| AppError::not_found(entity))
    }
}

/// Convenience constructors
impl AppError {
    pub fn not_found(entity: impl Into<String>) -> Self {
        AppError::NotFound(entity.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        AppError::InvalidState(msg.into())
    }

    pub fn collaborator(msg: impl Into<String>) -> Self {
        AppError::Collaborator(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_keep_their_message() {
        let err = AppError::from(DomainError::MethodUnavailable("use bank transfer".to_string()));
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.user_message(), "use bank transfer");
        assert!(!err.is_fault());

        let err = AppError::invalid_state("already approved");
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.code(), "INVALID_STATE");
    }

    #[test]
    fn test_partial_apply_is_a_fault_with_generic_message() {
        let err = AppError::PartialApply {
            payment_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            source: Box::new(AppError::collaborator("profiles write timed out")),
        };
        assert!(err.is_fault());
        assert_eq!(err.code(), "PARTIAL_APPLY");
        assert!(!err.user_message().contains("timed out"));
    }

    #[test]
    fn test_not_found_names_entity() {
        let err: AppResult<()> = None.ok_or_not_found("Payment");
        assert_eq!(err.unwrap_err().to_string(), "Payment not found");
    }
}
