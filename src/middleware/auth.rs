use std::collections::HashMap;

use axum::{
    extract::{Path, Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::{decode_token, Claims};
use crate::error::ApiError;
use crate::AppState;

const UNAUTHORIZED: &str = "Unauthorized";

/// Attach verified claims to the request when a valid bearer token is sent.
///
/// Never rejects: a missing, malformed, expired or forged token just means the
/// request continues anonymously and later gates decide.
pub async fn authenticate(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    if let Some(token) = bearer_token(request.headers()) {
        match decode_token(token, &state.config.security.secret_key) {
            Ok(claims) => {
                tracing::debug!(username = %claims.username, is_admin = claims.is_admin, "token accepted");
                request.extensions_mut().insert(claims);
            }
            Err(e) => tracing::debug!(error = %e, "token ignored"),
        }
    }

    next.run(request).await
}

/// Gate: any authenticated user.
pub async fn require_login(request: Request, next: Next) -> Result<Response, ApiError> {
    ensure_logged_in(request.extensions().get::<Claims>())?;
    Ok(next.run(request).await)
}

/// Gate: authenticated admin.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    ensure_admin(request.extensions().get::<Claims>())?;
    Ok(next.run(request).await)
}

/// Gate: the user named by the `:username` route parameter, or an admin.
pub async fn require_correct_user_or_admin(
    Path(params): Path<HashMap<String, String>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let username = params.get("username").map(String::as_str).unwrap_or_default();
    ensure_correct_user_or_admin(request.extensions().get::<Claims>(), username)?;
    Ok(next.run(request).await)
}

pub fn ensure_logged_in(claims: Option<&Claims>) -> Result<&Claims, ApiError> {
    claims.ok_or_else(|| ApiError::unauthorized(UNAUTHORIZED))
}

pub fn ensure_admin(claims: Option<&Claims>) -> Result<&Claims, ApiError> {
    match claims {
        Some(claims) if claims.is_admin => Ok(claims),
        _ => {
            tracing::debug!("admin gate rejected request");
            Err(ApiError::unauthorized(UNAUTHORIZED))
        }
    }
}

pub fn ensure_correct_user_or_admin<'a>(
    claims: Option<&'a Claims>,
    username: &str,
) -> Result<&'a Claims, ApiError> {
    match claims {
        Some(claims) if claims.is_admin || claims.username == username => Ok(claims),
        _ => {
            tracing::debug!(%username, "self-or-admin gate rejected request");
            Err(ApiError::unauthorized(UNAUTHORIZED))
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}
