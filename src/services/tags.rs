use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{CreateTag, DeletedTag, Tag, TagResponse, UpdateTag};
use crate::repo::TagRepository;

const DEFAULT_COLOR: &str = "#CCCCCC";

#[derive(Clone)]
pub struct TagService {
    tags: TagRepository,
}

impl TagService {
    pub fn new(tags: TagRepository) -> Self {
        Self { tags }
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<TagResponse>> {
        let tags = self.tags.list_by_user(user_id).await?;

        Ok(tags.into_iter().map(Into::into).collect())
    }

    pub async fn get(&self, tag_id: Uuid, user_id: Uuid) -> Result<TagResponse> {
        let tag = self.owned_tag(tag_id, user_id).await?;

        Ok(tag.into())
    }

    pub async fn create(&self, user_id: Uuid, input: &CreateTag) -> Result<TagResponse> {
        let color = input.color.as_deref().unwrap_or(DEFAULT_COLOR);
        let tag = self.tags.create(user_id, &input.name, color).await?;

        Ok(tag.into())
    }

    pub async fn update(
        &self,
        tag_id: Uuid,
        user_id: Uuid,
        input: &UpdateTag,
    ) -> Result<TagResponse> {
        self.owned_tag(tag_id, user_id).await?;

        let tag = self
            .tags
            .update(tag_id, input.name.as_deref(), input.color.as_deref())
            .await?;

        Ok(tag.into())
    }

    /// Join rows referencing the tag go first; the tasks themselves survive,
    /// losing the tag.
    pub async fn delete(&self, tag_id: Uuid, user_id: Uuid) -> Result<DeletedTag> {
        self.owned_tag(tag_id, user_id).await?;

        self.tags.clear_for_tag(tag_id).await?;
        self.tags.delete(tag_id).await?;

        Ok(DeletedTag { id: tag_id })
    }

    /// Same NotFound-then-Forbidden order as tasks.
    async fn owned_tag(&self, tag_id: Uuid, user_id: Uuid) -> Result<Tag> {
        let tag = self
            .tags
            .find_by_id(tag_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Tag not found".to_string()))?;

        if tag.user_id != user_id {
            return Err(AppError::Forbidden(
                "You do not have access to this tag".to_string(),
            ));
        }

        Ok(tag)
    }
}
