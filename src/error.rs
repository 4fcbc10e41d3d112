// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::auth::JwtError;
use crate::database::manager::DatabaseError;
use crate::filter::FilterError;
use crate::models::ModelError;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    ValidationError(Vec<String>),

    // 401 Unauthorized
    Unauthorized(String),

    // 404 Not Found
    NotFound(String),

    // 405 Method Not Allowed
    MethodNotAllowed(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::ValidationError(_) => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::NotFound(_) => 404,
            ApiError::MethodNotAllowed(_) => 405,
            ApiError::InternalServerError(_) => 500,
            ApiError::ServiceUnavailable(_) => 503,
        }
    }

    /// Get client-safe error message. Validation errors are joined; use
    /// `to_json` to keep them as a list.
    pub fn message(&self) -> String {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg)
            | ApiError::MethodNotAllowed(msg)
            | ApiError::InternalServerError(msg)
            | ApiError::ServiceUnavailable(msg) => msg.clone(),
            ApiError::ValidationError(errors) => errors.join("; "),
        }
    }

    /// Convert to the `{"error": {"message", "status"}}` response body
    pub fn to_json(&self) -> Value {
        let message = match self {
            ApiError::ValidationError(errors) => json!(errors),
            _ => json!(self.message()),
        };

        json!({
            "error": {
                "message": message,
                "status": self.status_code(),
            }
        })
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation_error(errors: Vec<String>) -> Self {
        ApiError::ValidationError(errors)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn method_not_allowed(message: impl Into<String>) -> Self {
        ApiError::MethodNotAllowed(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

impl From<ModelError> for ApiError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::BadRequest(msg) => ApiError::bad_request(msg),
            ModelError::NotFound(msg) => ApiError::not_found(msg),
            ModelError::Unauthorized(msg) => ApiError::unauthorized(msg),
            ModelError::Filter(filter_err) => filter_err.into(),
            ModelError::Database(sqlx_err) => {
                // Log the real error but return generic message
                tracing::error!("SQLx error: {}", sqlx_err);
                ApiError::internal_server_error("Database error occurred")
            }
            ModelError::PasswordHash(msg) => {
                tracing::error!("Password hashing error: {}", msg);
                ApiError::internal_server_error("Password processing failed")
            }
        }
    }
}

impl From<FilterError> for ApiError {
    fn from(err: FilterError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::Sqlx(sqlx_err) => {
                tracing::error!("SQLx error: {}", sqlx_err);
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            other => {
                tracing::error!("Database error: {}", other);
                ApiError::internal_server_error("Database error occurred")
            }
        }
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        tracing::error!("Token error: {}", err);
        ApiError::internal_server_error("Token generation failed")
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, field_errors)| {
                field_errors.iter().map(move |error| describe_field_error(field, error))
            })
            .collect();
        messages.sort();

        tracing::warn!(errors = ?messages, "Request validation failed");
        ApiError::validation_error(messages)
    }
}

/// One readable line per failed rule, e.g. `password: must be between 5 and 20 characters long`.
fn describe_field_error(field: &str, error: &validator::ValidationError) -> String {
    if let Some(message) = &error.message {
        return format!("{}: {}", field, message);
    }

    let bound = |key: &str| error.params.get(key).and_then(Value::as_f64);
    let detail = match (error.code.as_ref(), bound("min"), bound("max")) {
        ("length", Some(min), Some(max)) => format!("must be between {} and {} characters long", min, max),
        ("length", Some(min), None) => format!("must be at least {} characters long", min),
        ("length", None, Some(max)) => format!("must be at most {} characters long", max),
        ("range", Some(min), Some(max)) => format!("must be between {} and {}", min, max),
        ("range", Some(min), None) => format!("must be at least {}", min),
        ("range", None, Some(max)) => format!("must be at most {}", max),
        ("email", _, _) => "must be a valid email address".to_string(),
        ("url", _, _) => "must be a valid URL".to_string(),
        (code, _, _) => format!("failed validation ({})", code),
    };

    format!("{}: {}", field, detail)
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}
