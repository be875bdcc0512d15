//! Authentication API handlers

use crate::api::handlers::AppState;
use crate::api::models::MessageResponse;
use crate::auth::jwt::generate_token;
use crate::auth::models::{LoginRequest, LoginResponse, RegisterRequest, UserInfo};
use crate::auth::password::{hash_password, verify_password};
use crate::core::error::{Result, StaffdeskError};
use crate::db::models::User;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use uuid::Uuid;

/// Handler for POST /api/auth/register - User registration
///
/// Registration never issues a token; logging in is a separate step.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    let username = req.username.trim().to_string();
    let email = req.email.trim().to_lowercase();
    let password = req.password;

    if username.is_empty() || email.is_empty() || password.is_empty() {
        return Err(StaffdeskError::ValidationError(
            "username, email and password are required".to_string(),
        ));
    }

    tracing::info!(username = %username, "User registration attempt");

    let password_hash = hash_password(&password)?;

    let user = User {
        id: Uuid::new_v4().to_string(),
        username: username.clone(),
        email,
        password_hash,
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    // UNIQUE index on users.email turns duplicate registration into Conflict
    state.user_repo.create(&user).await?;

    tracing::info!(user_id = %user.id, username = %username, "User registered successfully");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Registration successful".to_string(),
        }),
    ))
}

/// Handler for POST /api/auth/login - User login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let email = req.email.trim().to_lowercase();

    tracing::info!(email = %email, "Login attempt");

    // Same message for unknown email and bad password
    let user = state
        .user_repo
        .find_by_email(&email)
        .await?
        .ok_or_else(|| StaffdeskError::AuthError("Invalid credentials".to_string()))?;

    let is_valid = verify_password(&req.password, &user.password_hash)?;
    if !is_valid {
        tracing::warn!(email = %email, "Invalid password");
        return Err(StaffdeskError::AuthError("Invalid credentials".to_string()));
    }

    let token = generate_token(&user.id, &state.jwt_secret, state.token_ttl_days)?;

    tracing::info!(user_id = %user.id, username = %user.username, "Login successful");

    Ok(Json(LoginResponse {
        token,
        user: UserInfo {
            id: user.id,
            username: user.username,
            email: user.email,
        },
    }))
}
