use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::{AppError, FieldError, Result};
use crate::models::{CreateTag, DeletedTag, TagResponse, UpdateTag};
use crate::response::ApiSuccess;
use crate::state::AppState;

const MAX_NAME_CHARS: usize = 50;

pub async fn list_tags(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<ApiSuccess<Vec<TagResponse>>> {
    let tags = state.tags.list(auth.id).await?;
    Ok(ApiSuccess::new(tags))
}

pub async fn get_tag(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(tag_id): Path<Uuid>,
) -> Result<ApiSuccess<TagResponse>> {
    let tag = state.tags.get(tag_id, auth.id).await?;
    Ok(ApiSuccess::new(tag))
}

pub async fn create_tag(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateTag>,
) -> Result<(StatusCode, ApiSuccess<TagResponse>)> {
    let mut errors = Vec::new();
    check_name(&input.name, &mut errors);
    if let Some(color) = &input.color {
        check_color(color, &mut errors);
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let tag = state.tags.create(auth.id, &input).await?;
    Ok((StatusCode::CREATED, ApiSuccess::new(tag)))
}

pub async fn update_tag(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(tag_id): Path<Uuid>,
    Json(input): Json<UpdateTag>,
) -> Result<ApiSuccess<TagResponse>> {
    let mut errors = Vec::new();
    if let Some(name) = &input.name {
        check_name(name, &mut errors);
    }
    if let Some(color) = &input.color {
        check_color(color, &mut errors);
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let tag = state.tags.update(tag_id, auth.id, &input).await?;
    Ok(ApiSuccess::new(tag))
}

pub async fn delete_tag(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(tag_id): Path<Uuid>,
) -> Result<ApiSuccess<DeletedTag>> {
    let deleted = state.tags.delete(tag_id, auth.id).await?;
    Ok(ApiSuccess::new(deleted))
}

fn check_name(name: &str, errors: &mut Vec<FieldError>) {
    if name.is_empty() || name.chars().count() > MAX_NAME_CHARS {
        errors.push(FieldError::new(
            "name",
            "Tag name must be between 1 and 50 characters",
        ));
    }
}

/// Colors are `#` followed by six hex digits.
fn check_color(color: &str, errors: &mut Vec<FieldError>) {
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());

    if !valid {
        errors.push(FieldError::new(
            "color",
            "Color must be a # followed by six hex digits",
        ));
    }
}
