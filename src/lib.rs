use std::sync::Arc;

use axum::{
    handler::Handler,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod extract;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod schemas;

use auth::PasswordHasher;
use config::AppConfig;
use middleware::{authenticate, require_admin, require_correct_user_or_admin};

/// Shared, read-only request state.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<AppConfig>,
    pub hasher: PasswordHasher,
}

impl AppState {
    pub fn new(pool: PgPool, config: AppConfig) -> Result<Self, auth::password::PasswordError> {
        let hasher = PasswordHasher::new(config.security.password_hash_cost)?;
        Ok(Self {
            pool,
            config: Arc::new(config),
            hasher,
        })
    }
}

pub fn app(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(handlers::health))
        .merge(auth_routes())
        .merge(company_routes())
        .merge(job_routes())
        .merge(user_routes())
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .fallback(handlers::not_found)
        .layer(from_fn_with_state(state.clone(), authenticate))
        .layer(CorsLayer::permissive());

    let router = if state.config.api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    };

    router.with_state(state)
}

fn auth_routes() -> Router<AppState> {
    use handlers::auth;

    Router::new()
        .route("/auth/token", post(auth::token))
        .route("/auth/register", post(auth::register))
}

fn company_routes() -> Router<AppState> {
    use handlers::companies;

    let admin = from_fn(require_admin);

    Router::new()
        .route(
            "/companies",
            get(companies::list).post(companies::create.layer(admin.clone())),
        )
        .route(
            "/companies/:handle",
            get(companies::get)
                .patch(companies::update.layer(admin.clone()))
                .delete(companies::remove.layer(admin)),
        )
}

fn job_routes() -> Router<AppState> {
    use handlers::jobs;

    let admin = from_fn(require_admin);

    Router::new()
        .route("/jobs", get(jobs::list).post(jobs::create.layer(admin.clone())))
        .route(
            "/jobs/:id",
            get(jobs::get)
                .patch(jobs::update.layer(admin.clone()))
                .delete(jobs::remove.layer(admin)),
        )
}

fn user_routes() -> Router<AppState> {
    use handlers::users;

    let admin = from_fn(require_admin);
    let self_or_admin = from_fn(require_correct_user_or_admin);

    Router::new()
        .route(
            "/users",
            get(users::list.layer(admin.clone())).post(users::create.layer(admin)),
        )
        .route(
            "/users/:username",
            get(users::get.layer(self_or_admin.clone()))
                .patch(users::update.layer(self_or_admin.clone()))
                .delete(users::remove.layer(self_or_admin.clone())),
        )
        .route("/users/:username/jobs/:id", post(users::apply.layer(self_or_admin)))
}
