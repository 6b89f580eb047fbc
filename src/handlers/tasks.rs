use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::{AppError, FieldError, Result};
use crate::models::{
    CreateTask, DeletedTask, TaskFilter, TaskListResponse, TaskResponse, UpdateTask,
};
use crate::response::ApiSuccess;
use crate::state::AppState;

const MAX_TITLE_CHARS: usize = 255;
const MAX_DESCRIPTION_CHARS: usize = 1000;

/// Raw query parameters; resolved into a [`TaskFilter`] with per-field
/// validation before the service sees them.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListQuery {
    pub status: Option<String>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub tag_ids: Option<String>,
}

impl TaskListQuery {
    fn into_filter(self) -> Result<TaskFilter> {
        let mut filter = TaskFilter::default();
        let mut errors = Vec::new();

        if let Some(raw) = self.status {
            match raw.parse() {
                Ok(status) => filter.status = status,
                Err(_) => errors.push(FieldError::new(
                    "status",
                    "Must be one of all, completed, incomplete",
                )),
            }
        }
        if let Some(raw) = self.sort_by {
            match raw.parse() {
                Ok(sort_by) => filter.sort_by = sort_by,
                Err(_) => errors.push(FieldError::new(
                    "sortBy",
                    "Must be one of createdAt, dueDate, priority",
                )),
            }
        }
        if let Some(raw) = self.sort_order {
            match raw.parse() {
                Ok(sort_order) => filter.sort_order = sort_order,
                Err(_) => errors.push(FieldError::new("sortOrder", "Must be asc or desc")),
            }
        }

        filter.search = self.search.filter(|s| !s.is_empty());

        if let Some(raw) = self.tag_ids {
            if !raw.is_empty() {
                // Entries that do not parse as ids could never match a
                // stored tag, so they are dropped rather than rejected.
                let ids = raw
                    .split(',')
                    .filter_map(|part| Uuid::parse_str(part.trim()).ok())
                    .collect();
                filter.tag_ids = Some(ids);
            }
        }

        if errors.is_empty() {
            Ok(filter)
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

pub async fn list_tasks(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<TaskListQuery>,
) -> Result<ApiSuccess<TaskListResponse>> {
    let filter = query.into_filter()?;

    let result = state.tasks.list(auth.id, &filter).await?;
    Ok(ApiSuccess::new(result))
}

pub async fn get_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(task_id): Path<Uuid>,
) -> Result<ApiSuccess<TaskResponse>> {
    let task = state.tasks.get(task_id, auth.id).await?;
    Ok(ApiSuccess::new(task))
}

pub async fn create_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateTask>,
) -> Result<(StatusCode, ApiSuccess<TaskResponse>)> {
    validate_create(&input)?;

    let task = state.tasks.create(auth.id, input).await?;
    Ok((StatusCode::CREATED, ApiSuccess::new(task)))
}

pub async fn update_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(task_id): Path<Uuid>,
    Json(patch): Json<UpdateTask>,
) -> Result<ApiSuccess<TaskResponse>> {
    validate_update(&patch)?;

    let task = state.tasks.update(task_id, auth.id, patch).await?;
    Ok(ApiSuccess::new(task))
}

pub async fn delete_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(task_id): Path<Uuid>,
) -> Result<ApiSuccess<DeletedTask>> {
    let deleted = state.tasks.delete(task_id, auth.id).await?;
    Ok(ApiSuccess::new(deleted))
}

pub async fn toggle_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(task_id): Path<Uuid>,
) -> Result<ApiSuccess<TaskResponse>> {
    let task = state.tasks.toggle_completion(task_id, auth.id).await?;
    Ok(ApiSuccess::new(task))
}

fn validate_create(input: &CreateTask) -> Result<()> {
    let mut errors = Vec::new();

    check_title(&input.title, &mut errors);
    if let Some(description) = &input.description {
        check_description(description, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

fn validate_update(patch: &UpdateTask) -> Result<()> {
    let mut errors = Vec::new();

    if let Some(title) = &patch.title {
        check_title(title, &mut errors);
    }
    if let Some(Some(description)) = &patch.description {
        check_description(description, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

fn check_title(title: &str, errors: &mut Vec<FieldError>) {
    if title.is_empty() || title.chars().count() > MAX_TITLE_CHARS {
        errors.push(FieldError::new(
            "title",
            "Title must be between 1 and 255 characters",
        ));
    }
}

fn check_description(description: &str, errors: &mut Vec<FieldError>) {
    if description.chars().count() > MAX_DESCRIPTION_CHARS {
        errors.push(FieldError::new(
            "description",
            "Description must be at most 1000 characters",
        ));
    }
}
