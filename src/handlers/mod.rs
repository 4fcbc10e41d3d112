pub mod auth;
pub mod companies;
pub mod jobs;
pub mod users;

use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::AppState;

/// GET /health - service and store liveness
pub async fn health(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    DatabaseManager::health_check(&state.pool).await?;

    Ok(Json(json!({
        "status": "ok",
        "database": "connected",
        "environment": state.config.environment,
    })))
}

/// Any unmatched route
pub async fn not_found() -> ApiError {
    ApiError::not_found("Not Found")
}

/// Known path, unsupported method
pub async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed("Method Not Allowed")
}
