//! Authentication Handlers
//!
//! Handles login and token issuance

use std::time::Duration;

use axum::{Json, extract::State};

use crate::AppError;
use crate::core::ServerState;
use crate::db::repository;
use crate::utils::password::verify_password;

// Re-use shared DTOs for API consistency
use shared::client::{LoginRequest, LoginResponse};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// POST /api/auth/login
///
/// Authenticates email + password and returns a JWT token.
/// Any account with a password set may log in (admins always have one;
/// customers normally arrive through an external identity provider).
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let user = repository::user::find_by_email(&state.db.pool, &req.email).await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Unified error message to prevent email enumeration
    let user = match user {
        Some(u) => u,
        None => {
            tracing::warn!(email = %req.email, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    if !user.is_active {
        return Err(AppError::forbidden("Account has been disabled"));
    }

    let hash = match &user.password_hash {
        Some(h) => h,
        None => {
            tracing::warn!(email = %req.email, "Login failed - no password set");
            return Err(AppError::invalid_credentials());
        }
    };

    if !verify_password(&req.password, hash)? {
        tracing::warn!(email = %req.email, "Login failed - invalid credentials");
        return Err(AppError::invalid_credentials());
    }

    let token = state
        .get_jwt_service()
        .generate_token(&user)
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

    tracing::info!(user_id = user.id, role = %user.role, "Login successful");

    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}
