use axum::{extract::State, http::StatusCode};
use serde_json::{json, Value};

use crate::auth::create_token;
use crate::extract::ValidatedJson;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::User;
use crate::schemas::{UserAuth, UserRegister};
use crate::AppState;

/// POST /auth/token - exchange `{username, password}` for a signed token
pub async fn token(State(state): State<AppState>, ValidatedJson(body): ValidatedJson<UserAuth>) -> ApiResult<Value> {
    let user = User::authenticate(&state.pool, &state.hasher, &body.username, &body.password).await?;
    let token = create_token(&user.username, user.is_admin, &state.config.security)?;

    Ok(ApiResponse::object(json!({ "token": token }), StatusCode::OK))
}

/// POST /auth/register - self sign-up; never creates an admin
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<UserRegister>,
) -> ApiResult<Value> {
    let user = User::register(&state.pool, &state.hasher, body.into()).await?;
    let token = create_token(&user.username, user.is_admin, &state.config.security)?;

    Ok(ApiResponse::object(json!({ "token": token }), StatusCode::CREATED))
}
