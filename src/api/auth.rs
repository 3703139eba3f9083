//! Login and registration endpoints.
//!
//! Login reports the account's role but issues no session or token.

use axum::{extract::State, http::StatusCode, Json};

use super::ApiResult;
use crate::auth::{hash_password, verify_password};
use crate::errors::AppError;
use crate::models::{LoginRequest, LoginResponse, MessageResponse, RegisterRequest, DEFAULT_ROLE};
use crate::AppState;

const MIN_PASSWORD_LEN: usize = 8;
const USERNAME_LEN: std::ops::RangeInclusive<usize> = 3..=50;

/// POST /api/login - Check credentials.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let username = request.username.trim();
    if username.is_empty() || request.password.is_empty() {
        return Err(AppError::Validation(
            "Username and password are required".to_string(),
        ));
    }

    let Some(user) = state.repo.find_user(username).await? else {
        tracing::info!("Login failed for unknown user {}", username);
        return Err(invalid_credentials());
    };

    if !verify_password(&request.password, &user.password_hash) {
        tracing::info!("Login failed for user {}", username);
        return Err(invalid_credentials());
    }

    tracing::info!("User {} logged in", user.username);
    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        username: user.username,
        role: user.role,
    }))
}

/// POST /api/register - Create an editor account.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let username = request.username.trim();
    let email = request.email.trim();
    validate_registration(username, email, &request.password)?;

    if state.repo.user_exists(username, email).await? {
        return Err(AppError::Conflict(
            "Username or email already exists".to_string(),
        ));
    }

    let hash = hash_password(&request.password)?;
    state
        .repo
        .create_user(username, email, &hash, DEFAULT_ROLE)
        .await?;

    tracing::info!("Registered user {}", username);
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User registered successfully".to_string(),
        }),
    ))
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid username or password".to_string())
}

fn validate_registration(username: &str, email: &str, password: &str) -> Result<(), AppError> {
    if username.is_empty() || email.is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Username, email and password are required".to_string(),
        ));
    }
    if !USERNAME_LEN.contains(&username.chars().count()) {
        return Err(AppError::Validation(format!(
            "Username must be between {} and {} characters",
            USERNAME_LEN.start(),
            USERNAME_LEN.end()
        )));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => {}
        _ => return Err(AppError::Validation("Invalid email address".to_string())),
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}
