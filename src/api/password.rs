//! Password reset flow.
//!
//! No reset state is persisted. A reset link is valid exactly as long as
//! its token verifies against the user's current password hash; the
//! completing update rewrites that hash and strands every outstanding
//! link. Each step looks the hash up fresh, so concurrent completions
//! race safely: whichever lands second fails verification.

use axum::{
    extract::{Path, State},
    response::Html,
    Form,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::api::auth;
use crate::api::error::ApiError;
use crate::api::validation::validate_password;
use crate::db::User;
use crate::{tokens, ui, AppState};

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub password: String,
}

/// Serve the forgot-password form
///
/// GET /password/forgot-password
pub async fn forgot_password_form() -> Html<String> {
    Html(ui::render_forgot_password_page())
}

/// Email a reset link to an account
///
/// POST /password/forgot-password
pub async fn send_reset_link(
    State(state): State<Arc<AppState>>,
    Form(request): Form<ForgotPasswordRequest>,
) -> Result<Html<String>, ApiError> {
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = ?")
        .bind(&request.email)
        .fetch_optional(&state.db)
        .await?;

    // Reveals whether the address has an account; kept to match the
    // flow's contract
    let user = user.ok_or_else(|| ApiError::not_found("User not found"))?;

    let token = tokens::issue(
        &state.config.auth.secret_key,
        &user.id,
        &user.email,
        &user.password_hash,
    )
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to sign reset token");
        ApiError::internal("Failed to issue reset token")
    })?;

    let link = format!(
        "{}/password/reset-password/{}/{}",
        state.config.server.public_url.trim_end_matches('/'),
        user.id,
        token
    );

    let html_body = crate::notifications::render_reset_email_html(&link);
    let text_body = crate::notifications::render_reset_email_text(&link);

    state
        .mailer
        .send(&user.email, "Reset Password", &html_body, &text_body)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to send reset email");
            ApiError::send_failed("Failed to send reset email")
        })?;

    info!(user_id = %user.id, "Password reset link sent");

    Ok(Html(ui::render_link_sent_page(&user.email)))
}

/// Serve the reset form after checking the link is still good
///
/// GET /password/reset-password/:user_id/:token
pub async fn reset_password_form(
    State(state): State<Arc<AppState>>,
    Path((user_id, token)): Path<(String, String)>,
) -> Result<Html<String>, ApiError> {
    let user = find_user(&state, &user_id).await?;

    // Key recomputed from the stored hash on every check
    tokens::verify(&state.config.auth.secret_key, &user.password_hash, &token)
        .map_err(|_| ApiError::token_invalid())?;

    Ok(Html(ui::render_reset_password_page(&user.email)))
}

/// Set the new password, invalidating the link that authorized it
///
/// POST /password/reset-password/:user_id/:token
pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    Path((user_id, token)): Path<(String, String)>,
    Form(request): Form<ResetPasswordRequest>,
) -> Result<Html<String>, ApiError> {
    if let Err(message) = validate_password(&request.password) {
        return Err(ApiError::validation_field("password", message));
    }

    let user = find_user(&state, &user_id).await?;

    tokens::verify(&state.config.auth.secret_key, &user.password_hash, &token)
        .map_err(|_| ApiError::token_invalid())?;

    let password_hash = auth::hash_password(&request.password).map_err(|e| {
        tracing::error!(error = %e, "Failed to hash password");
        ApiError::internal("Failed to hash password")
    })?;

    // This write changes the signing key and strands every token issued
    // under the old hash, this one included
    sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
        .bind(&password_hash)
        .bind(Utc::now().to_rfc3339())
        .bind(&user.id)
        .execute(&state.db)
        .await?;

    info!(user_id = %user.id, "Password reset completed");

    Ok(Html(ui::render_reset_success_page()))
}

async fn find_user(state: &AppState, user_id: &str) -> Result<User, ApiError> {
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(&state.db)
        .await?;
    user.ok_or_else(|| ApiError::not_found("User not found"))
}
