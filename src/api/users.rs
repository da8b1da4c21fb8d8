//! User management endpoints.
//!
//! List and delete are open to admins, reads of a single record to the
//! admin or the account owner. Profile updates are self-service only:
//! an admin cannot rewrite another user's credentials.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::api::auth::{self, AuthUser};
use crate::api::error::{ApiError, ValidationErrorBuilder};
use crate::api::validation::{validate_password, validate_username};
use crate::db::{User, UserResponse};
use crate::AppState;

/// Fields a user may change on their own record. Anything else in the
/// body is ignored.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteUserResponse {
    pub message: String,
}

/// List all users
///
/// GET /api/users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    if !auth_user.is_admin() {
        return Err(ApiError::forbidden("Admin access required"));
    }

    let users: Vec<User> = sqlx::query_as("SELECT * FROM users ORDER BY created_at")
        .fetch_all(&state.db)
        .await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Get a user by id
///
/// GET /api/users/:id
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    if !auth_user.is_admin() && auth_user.id != id {
        return Err(ApiError::forbidden("You can only view your own profile"));
    }

    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(&id)
        .fetch_optional(&state.db)
        .await?;

    let user = user.ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(user.into()))
}

/// Update a user's own username and/or password
///
/// PUT /api/users/:id
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    // Self-service only. Admins manage accounts through delete, not by
    // rewriting other users' credentials.
    if auth_user.id != id {
        return Err(ApiError::forbidden("You can only update your own profile"));
    }

    let mut errors = ValidationErrorBuilder::new();
    if let Some(username) = &request.username {
        if let Err(message) = validate_username(username) {
            errors.add("username", message);
        }
    }
    if let Some(password) = &request.password {
        if let Err(message) = validate_password(password) {
            errors.add("password", message);
        }
    }
    errors.finish()?;

    let existing: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(&id)
        .fetch_optional(&state.db)
        .await?;
    if existing.is_none() {
        return Err(ApiError::not_found("User not found"));
    }

    let password_hash = match &request.password {
        Some(password) => Some(auth::hash_password(password).map_err(|e| {
            tracing::error!(error = %e, "Failed to hash password");
            ApiError::internal("Failed to hash password")
        })?),
        None => None,
    };

    sqlx::query(
        "UPDATE users
         SET username = COALESCE(?, username),
             password_hash = COALESCE(?, password_hash),
             updated_at = ?
         WHERE id = ?",
    )
    .bind(&request.username)
    .bind(&password_hash)
    .bind(Utc::now().to_rfc3339())
    .bind(&id)
    .execute(&state.db)
    .await?;

    let updated: User = sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await?;

    info!(user_id = %id, "User profile updated");

    Ok(Json(updated.into()))
}

/// Delete a user
///
/// DELETE /api/users/:id
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<DeleteUserResponse>, ApiError> {
    if !auth_user.is_admin() && auth_user.id != id {
        return Err(ApiError::forbidden("You can only delete your own account"));
    }

    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(&id)
        .fetch_optional(&state.db)
        .await?;
    if user.is_none() {
        return Err(ApiError::not_found("User not found"));
    }

    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(&id)
        .execute(&state.db)
        .await?;

    info!(user_id = %id, "User deleted");

    Ok(Json(DeleteUserResponse {
        message: "User has been deleted".to_string(),
    }))
}
