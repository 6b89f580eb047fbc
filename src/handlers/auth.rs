use axum::{extract::State, http::StatusCode, Json};

use crate::auth::AuthUser;
use crate::error::{AppError, FieldError, Result};
use crate::models::{AuthResponse, LoginUser, RegisterUser, UserResponse};
use crate::response::ApiSuccess;
use crate::state::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterUser>,
) -> Result<(StatusCode, ApiSuccess<AuthResponse>)> {
    validate_register(&input)?;

    let result = state.auth.register(&input).await?;
    Ok((StatusCode::CREATED, ApiSuccess::new(result)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginUser>,
) -> Result<ApiSuccess<AuthResponse>> {
    validate_login(&input)?;

    let result = state.auth.login(&input).await?;
    Ok(ApiSuccess::new(result))
}

pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<ApiSuccess<UserResponse>> {
    let user = state.auth.get_user(auth.id).await?;
    Ok(ApiSuccess::new(user))
}

fn validate_register(input: &RegisterUser) -> Result<()> {
    let mut errors = Vec::new();

    if !is_valid_email(&input.email) {
        errors.push(FieldError::new("email", "A valid email address is required"));
    }
    if input.password.chars().count() < 8 {
        errors.push(FieldError::new(
            "password",
            "Password must be at least 8 characters",
        ));
    }
    if !input.password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push(FieldError::new(
            "password",
            "Password must contain at least one lowercase letter",
        ));
    }
    if !input.password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push(FieldError::new(
            "password",
            "Password must contain at least one uppercase letter",
        ));
    }
    if !input.password.chars().any(|c| c.is_ascii_digit()) {
        errors.push(FieldError::new(
            "password",
            "Password must contain at least one digit",
        ));
    }
    if input.name.is_empty() || input.name.chars().count() > 100 {
        errors.push(FieldError::new(
            "name",
            "Name must be between 1 and 100 characters",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

fn validate_login(input: &LoginUser) -> Result<()> {
    let mut errors = Vec::new();

    if !is_valid_email(&input.email) {
        errors.push(FieldError::new("email", "A valid email address is required"));
    }
    if input.password.is_empty() {
        errors.push(FieldError::new("password", "Password is required"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}
