use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::collections::BTreeMap;

use crate::auth::TokenError;
use crate::domain::money::MoneyError;
use crate::domain::validation::ValidationErrors;
use crate::domain::DomainError;

/// API error type with HTTP status code and message
///
/// Validation failures also carry a field → message map, rendered as
/// `{"error": "...", "fields": {...}}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub fields: Option<BTreeMap<String, String>>,
}

impl ApiError {
    /// Creates a new API error
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            fields: None,
        }
    }

    /// Creates a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Creates a 401 Unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// Creates a 403 Forbidden error
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    /// Creates a 404 Not Found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Creates a 409 Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    /// Creates a 422 error listing every invalid field
    pub fn validation(errors: &ValidationErrors) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: "Invalid data".to_string(),
            fields: Some(errors.messages()),
        }
    }

    /// Creates a 422 error for a single field rejected before domain validation
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(field.to_string(), message.into());
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: "Invalid data".to_string(),
            fields: Some(fields),
        }
    }

    /// Creates a 500 Internal Server Error
    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.fields {
            Some(fields) => json!({ "error": self.message, "fields": fields }),
            None => json!({ "error": self.message }),
        };

        (self.status, Json(body)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        if error.is_infrastructure() {
            tracing::error!(error = %error, "Request failed on an infrastructure fault");
            return Self::internal_server_error("Internal server error");
        }

        match error {
            DomainError::Validation(errors) => Self::validation(&errors),
            DomainError::Conflict(_) => Self::conflict(error.to_string()),
            DomainError::NotFound(message) => Self::not_found(message),
            DomainError::InvalidTransition { .. } | DomainError::Rule(_) => {
                Self::bad_request(error.to_string())
            }
            DomainError::InvalidCredentials => Self::unauthorized(error.to_string()),
            DomainError::Storage(_) | DomainError::Hashing(_) => {
                Self::internal_server_error("Internal server error")
            }
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(error: TokenError) -> Self {
        match error {
            TokenError::Invalid(_) => Self::unauthorized(error.to_string()),
            TokenError::Signing(_) => {
                tracing::error!(error = %error, "Failed to issue token");
                Self::internal_server_error("Internal server error")
            }
        }
    }
}

impl From<MoneyError> for ApiError {
    fn from(error: MoneyError) -> Self {
        Self::invalid_field("price", error.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}
