pub mod auth;
pub mod error;
mod password;
mod users;
mod validation;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Auth routes (public)
    let auth_routes = Router::new().route("/login", post(auth::login));

    // User management (authorization enforced per handler)
    let user_routes = Router::new()
        .route("/users", get(users::list_users))
        .route("/users/:id", get(users::get_user))
        .route("/users/:id", put(users::update_user))
        .route("/users/:id", delete(users::delete_user));

    // Password reset flow (public, token-gated)
    let password_routes = Router::new()
        .route(
            "/forgot-password",
            get(password::forgot_password_form).post(password::send_reset_link),
        )
        .route(
            "/reset-password/:user_id/:token",
            get(password::reset_password_form).post(password::reset_password),
        );

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/auth", auth_routes)
        .nest("/api", user_routes)
        .nest("/password", password_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
