use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Priority, SortKey, SortOrder, StatusFilter, Task, TaskFilter, UpdateTask};

#[derive(Clone)]
pub struct TaskRepository {
    pool: Arc<SqlitePool>,
}

impl TaskRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        title: &str,
        description: Option<&str>,
        priority: Priority,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<Task> {
        let id = Uuid::new_v4();

        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (id, user_id, title, description, completed, priority, due_date, created_at, updated_at)
            VALUES ($1, $2, $3, $4, 0, $5, $6, datetime('now'), datetime('now'))
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(title)
        .bind(description)
        .bind(priority)
        .bind(due_date)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(task)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(task)
    }

    pub async fn list_with_filter(&self, user_id: Uuid, filter: &TaskFilter) -> Result<Vec<Task>> {
        let mut query = QueryBuilder::<Sqlite>::new("SELECT * FROM tasks");
        push_filter_clauses(&mut query, user_id, filter);

        match filter.sort_by {
            SortKey::CreatedAt => {
                query.push(" ORDER BY created_at");
            }
            SortKey::DueDate => {
                query.push(" ORDER BY due_date");
            }
            // Priority is stored as TEXT, so an alphabetic sort would put
            // HIGH before LOW. Rank it explicitly: LOW < MEDIUM < HIGH.
            SortKey::Priority => {
                query.push(
                    " ORDER BY CASE priority WHEN 'LOW' THEN 0 WHEN 'MEDIUM' THEN 1 ELSE 2 END",
                );
            }
        }
        match filter.sort_order {
            SortOrder::Asc => {
                query.push(" ASC");
            }
            SortOrder::Desc => {
                query.push(" DESC");
            }
        }

        let tasks = query
            .build_query_as::<Task>()
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(tasks)
    }

    /// Total matching the same filter, independent of any ordering.
    pub async fn count_with_filter(&self, user_id: Uuid, filter: &TaskFilter) -> Result<i64> {
        let mut query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM tasks");
        push_filter_clauses(&mut query, user_id, filter);

        let total = query
            .build_query_scalar::<i64>()
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(total)
    }

    /// Partial update: only fields present in the patch are assigned.
    /// `description` and `due_date` carry a second Option layer so an
    /// explicit null clears the column.
    pub async fn update(&self, id: Uuid, patch: &UpdateTask) -> Result<Task> {
        let mut query = QueryBuilder::<Sqlite>::new("UPDATE tasks SET updated_at = datetime('now')");

        if let Some(title) = &patch.title {
            query.push(", title = ").push_bind(title.clone());
        }
        if let Some(description) = &patch.description {
            query.push(", description = ").push_bind(description.clone());
        }
        if let Some(priority) = patch.priority {
            query.push(", priority = ").push_bind(priority);
        }
        if let Some(due_date) = &patch.due_date {
            query.push(", due_date = ").push_bind(*due_date);
        }

        query.push(" WHERE id = ").push_bind(id);
        query.push(" RETURNING *");

        let task = query
            .build_query_as::<Task>()
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(task)
    }

    pub async fn set_completed(&self, id: Uuid, completed: bool) -> Result<Task> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET completed = $2, updated_at = datetime('now')
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(completed)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(task)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Task not found".to_string()));
        }

        Ok(())
    }
}

fn push_filter_clauses(query: &mut QueryBuilder<'_, Sqlite>, user_id: Uuid, filter: &TaskFilter) {
    query.push(" WHERE user_id = ").push_bind(user_id);

    match filter.status {
        StatusFilter::Completed => {
            query.push(" AND completed = 1");
        }
        StatusFilter::Incomplete => {
            query.push(" AND completed = 0");
        }
        StatusFilter::All => {}
    }

    if let Some(search) = &filter.search {
        query
            .push(" AND LOWER(title) LIKE ")
            .push_bind(format!("%{}%", search.to_lowercase()));
    }

    if let Some(tag_ids) = &filter.tag_ids {
        if tag_ids.is_empty() {
            // An explicitly empty tag set can never match.
            query.push(" AND 0 = 1");
        } else {
            query.push(" AND id IN (SELECT task_id FROM task_tags WHERE tag_id IN (");
            let mut ids = query.separated(", ");
            for tag_id in tag_ids {
                ids.push_bind(*tag_id);
            }
            query.push("))");
        }
    }
}
