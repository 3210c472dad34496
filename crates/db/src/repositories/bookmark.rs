//! Bookmark repository.

use std::sync::Arc;

use chrono::Utc;
use lms_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::{Bookmark, Content, bookmark, content};

/// Repository for content bookmarks.
#[derive(Clone)]
pub struct BookmarkRepository {
    db: Arc<DatabaseConnection>,
}

impl BookmarkRepository {
    /// Create a new bookmark repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a bookmark by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<bookmark::Model>> {
        Bookmark::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user's bookmark of a content.
    pub async fn find(&self, user_id: i32, content_id: i32) -> AppResult<Option<bookmark::Model>> {
        Bookmark::find()
            .filter(bookmark::Column::UserId.eq(user_id))
            .filter(bookmark::Column::ContentId.eq(content_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Bookmark a content, returning the existing bookmark if present.
    ///
    /// The flag is `true` when a new bookmark was created.
    pub async fn get_or_create(
        &self,
        user_id: i32,
        content_id: i32,
    ) -> AppResult<(bookmark::Model, bool)> {
        if let Some(existing) = self.find(user_id, content_id).await? {
            return Ok((existing, false));
        }

        let active_model = bookmark::ActiveModel {
            user_id: Set(user_id),
            content_id: Set(content_id),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        match active_model.insert(self.db.as_ref()).await {
            Ok(created) => Ok((created, true)),
            Err(e) if super::is_unique_violation(&e) => self
                .find(user_id, content_id)
                .await?
                .map(|existing| (existing, false))
                .ok_or_else(|| AppError::Database(e.to_string())),
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }

    /// List a user's bookmarks with their content, newest first.
    pub async fn find_by_user(
        &self,
        user_id: i32,
    ) -> AppResult<Vec<(bookmark::Model, Option<content::Model>)>> {
        Bookmark::find()
            .find_also_related(Content)
            .filter(bookmark::Column::UserId.eq(user_id))
            .order_by_desc(bookmark::Column::CreatedAt)
            .order_by_desc(bookmark::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a bookmark.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        Bookmark::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
