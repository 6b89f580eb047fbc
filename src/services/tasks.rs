use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{
    CreateTask, DeletedTask, Priority, Task, TaskFilter, TaskListResponse, TaskResponse,
    UpdateTask,
};
use crate::repo::{TagRepository, TaskRepository};

/// Task CRUD with ownership checks, filtering/sorting and tag association
/// maintenance.
#[derive(Clone)]
pub struct TaskService {
    tasks: TaskRepository,
    tags: TagRepository,
}

impl TaskService {
    pub fn new(tasks: TaskRepository, tags: TagRepository) -> Self {
        Self { tasks, tags }
    }

    pub async fn list(&self, user_id: Uuid, filter: &TaskFilter) -> Result<TaskListResponse> {
        let rows = self.tasks.list_with_filter(user_id, filter).await?;
        let total = self.tasks.count_with_filter(user_id, filter).await?;

        let mut tasks = Vec::with_capacity(rows.len());
        for task in rows {
            let tags = self.tags.list_for_task(task.id).await?;
            tasks.push(task.into_response(tags.into_iter().map(Into::into).collect()));
        }

        Ok(TaskListResponse { tasks, total })
    }

    pub async fn get(&self, task_id: Uuid, user_id: Uuid) -> Result<TaskResponse> {
        let task = self.owned_task(task_id, user_id).await?;
        let tags = self.tags.list_for_task(task.id).await?;

        Ok(task.into_response(tags.into_iter().map(Into::into).collect()))
    }

    pub async fn create(&self, user_id: Uuid, input: CreateTask) -> Result<TaskResponse> {
        let task = self
            .tasks
            .create(
                user_id,
                &input.title,
                input.description.as_deref(),
                input.priority.unwrap_or(Priority::Medium),
                input.due_date,
            )
            .await?;

        if let Some(tag_ids) = &input.tag_ids {
            // Ids naming tags the user does not own, or no tag at all, are
            // dropped rather than rejected.
            let valid = self.tags.filter_owned(user_id, tag_ids).await?;
            self.tags.attach(task.id, &valid).await?;
        }

        self.get(task.id, user_id).await
    }

    pub async fn update(
        &self,
        task_id: Uuid,
        user_id: Uuid,
        patch: UpdateTask,
    ) -> Result<TaskResponse> {
        self.owned_task(task_id, user_id).await?;

        self.tasks.update(task_id, &patch).await?;

        if let Some(tag_ids) = &patch.tag_ids {
            // A present tagIds list, even an empty one, replaces the whole
            // association set.
            self.tags.clear_for_task(task_id).await?;
            let valid = self.tags.filter_owned(user_id, tag_ids).await?;
            self.tags.attach(task_id, &valid).await?;
        }

        self.get(task_id, user_id).await
    }

    pub async fn delete(&self, task_id: Uuid, user_id: Uuid) -> Result<DeletedTask> {
        self.owned_task(task_id, user_id).await?;

        self.tags.clear_for_task(task_id).await?;
        self.tasks.delete(task_id).await?;

        Ok(DeletedTask { id: task_id })
    }

    pub async fn toggle_completion(&self, task_id: Uuid, user_id: Uuid) -> Result<TaskResponse> {
        let task = self.owned_task(task_id, user_id).await?;

        self.tasks.set_completed(task_id, !task.completed).await?;

        self.get(task_id, user_id).await
    }

    /// Existence is checked before ownership, so a missing task is 404 and a
    /// foreign one is 403, never the other way around.
    async fn owned_task(&self, task_id: Uuid, user_id: Uuid) -> Result<Task> {
        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".to_string()))?;

        if task.user_id != user_id {
            return Err(AppError::Forbidden(
                "You do not have access to this task".to_string(),
            ));
        }

        Ok(task)
    }
}
