//! Signup and login endpoints

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::auth::{hash_password, verify_password};
use crate::db::repos::{DbError, UserRepo};
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::models::{Email, Password, UserName};

/// Signup request
#[derive(Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token response
#[derive(Serialize, Deserialize)]
pub struct TokenResponse {
    #[serde(rename = "jwtToken")]
    pub jwt_token: String,
}

/// POST /api/auth/signup - create an account and log it in
async fn signup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let name = UserName::new(&req.name)?;
    let email = Email::new(&req.email)?;
    let password = Password::new(&req.password)?;

    // Argon2 is deliberately slow; keep it off the async workers
    let hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(ApiError::internal)??;

    let user = UserRepo::new(&state.pool)
        .create(&name, &email, &hash)
        .await
        .map_err(|e| match e {
            DbError::Conflict { .. } => ApiError::bad_request("User already exists"),
            other => other.into(),
        })?;

    tracing::info!(user_id = user.id, "User signed up");
    Ok(Json(TokenResponse {
        jwt_token: state.tokens.issue(user.id),
    }))
}

/// POST /api/auth/login - exchange credentials for a token
async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let email = Email::new(&req.email)?;

    let user = UserRepo::new(&state.pool)
        .find_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::bad_request("User not found"))?;

    let stored = user.password;
    let plain = req.password;
    let valid = tokio::task::spawn_blocking(move || verify_password(&plain, &stored))
        .await
        .map_err(ApiError::internal)??;

    if !valid {
        tracing::info!(user_id = user.id, "Login rejected: incorrect password");
        return Err(ApiError::bad_request("Incorrect password"));
    }

    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(TokenResponse {
        jwt_token: state.tokens.issue(user.id),
    }))
}

/// Auth routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
}
