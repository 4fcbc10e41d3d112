//! User management. Creating and listing users is for admins; everything
//! addressed by `:username` is open to that user or an admin.

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;

use crate::auth::create_token;
use crate::extract::{parse_id, ValidatedJson};
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{User, UserWithJobs};
use crate::schemas::{NewUser, UserUpdate};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct CreatedUser {
    pub user: User,
    pub token: String,
}

/// POST /users (admin) - may create admins; returns the user and a token
pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<NewUser>,
) -> ApiResult<CreatedUser> {
    let user = User::register(&state.pool, &state.hasher, body).await?;
    let token = create_token(&user.username, user.is_admin, &state.config.security)?;

    Ok(ApiResponse::object(CreatedUser { user, token }, StatusCode::CREATED))
}

/// GET /users (admin)
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<UserWithJobs>> {
    let users = User::find_all(&state.pool).await?;
    Ok(ApiResponse::success("users", users))
}

/// GET /users/:username
pub async fn get(State(state): State<AppState>, Path(username): Path<String>) -> ApiResult<UserWithJobs> {
    let user = User::get(&state.pool, &username).await?;
    Ok(ApiResponse::success("user", user))
}

/// PATCH /users/:username
pub async fn update(
    State(state): State<AppState>,
    Path(username): Path<String>,
    ValidatedJson(body): ValidatedJson<UserUpdate>,
) -> ApiResult<User> {
    let user = User::update(&state.pool, &state.hasher, &username, body).await?;
    Ok(ApiResponse::success("user", user))
}

/// DELETE /users/:username
pub async fn remove(State(state): State<AppState>, Path(username): Path<String>) -> ApiResult<String> {
    User::remove(&state.pool, &username).await?;
    Ok(ApiResponse::success("deleted", username))
}

/// POST /users/:username/jobs/:id
pub async fn apply(
    State(state): State<AppState>,
    Path((username, id)): Path<(String, String)>,
) -> ApiResult<i32> {
    let job_id = parse_id(&id)?;
    User::apply_to_job(&state.pool, &username, job_id).await?;
    Ok(ApiResponse::success("applied", job_id))
}
