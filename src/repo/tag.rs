use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::Tag;

#[derive(Clone)]
pub struct TagRepository {
    pool: Arc<SqlitePool>,
}

impl TagRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user_id: Uuid, name: &str, color: &str) -> Result<Tag> {
        let id = Uuid::new_v4();

        let tag = sqlx::query_as::<_, Tag>(
            r#"
            INSERT INTO tags (id, user_id, name, color, created_at)
            VALUES ($1, $2, $3, $4, datetime('now'))
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(name)
        .bind(color)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(map_unique_violation)?;

        Ok(tag)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Tag>> {
        let tag = sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(tag)
    }

    pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Tag>> {
        let tags =
            sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE user_id = $1 ORDER BY name ASC")
                .bind(user_id)
                .fetch_all(self.pool.as_ref())
                .await?;

        Ok(tags)
    }

    pub async fn update(&self, id: Uuid, name: Option<&str>, color: Option<&str>) -> Result<Tag> {
        let tag = sqlx::query_as::<_, Tag>(
            r#"
            UPDATE tags
            SET name = COALESCE($2, name),
                color = COALESCE($3, color)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(color)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(map_unique_violation)?;

        Ok(tag)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Tag not found".to_string()));
        }

        Ok(())
    }

    /// Of the supplied ids, keep only those naming a tag owned by `user_id`.
    pub async fn filter_owned(&self, user_id: Uuid, tag_ids: &[Uuid]) -> Result<Vec<Uuid>> {
        if tag_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = QueryBuilder::<Sqlite>::new("SELECT id FROM tags WHERE user_id = ");
        query.push_bind(user_id);
        query.push(" AND id IN (");
        let mut ids = query.separated(", ");
        for tag_id in tag_ids {
            ids.push_bind(*tag_id);
        }
        query.push(")");

        let owned = query
            .build_query_scalar::<Uuid>()
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(owned)
    }

    pub async fn attach(&self, task_id: Uuid, tag_ids: &[Uuid]) -> Result<()> {
        if tag_ids.is_empty() {
            return Ok(());
        }

        let mut query = QueryBuilder::<Sqlite>::new("INSERT INTO task_tags (task_id, tag_id) ");
        query.push_values(tag_ids, |mut row, tag_id| {
            row.push_bind(task_id).push_bind(*tag_id);
        });
        query.build().execute(self.pool.as_ref()).await?;

        Ok(())
    }

    pub async fn clear_for_task(&self, task_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM task_tags WHERE task_id = $1")
            .bind(task_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    pub async fn clear_for_tag(&self, tag_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM task_tags WHERE tag_id = $1")
            .bind(tag_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    pub async fn list_for_task(&self, task_id: Uuid) -> Result<Vec<Tag>> {
        let tags = sqlx::query_as::<_, Tag>(
            r#"
            SELECT t.* FROM tags t
            INNER JOIN task_tags tt ON t.id = tt.tag_id
            WHERE tt.task_id = $1
            ORDER BY t.name ASC
            "#,
        )
        .bind(task_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(tags)
    }
}

/// The `(user_id, name)` uniqueness constraint surfaces as a domain error;
/// everything else propagates as a database error.
fn map_unique_violation(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict("Tag name already in use".to_string())
        }
        _ => AppError::Database(e),
    }
}
