//! Comment repository.

use std::sync::Arc;

use chrono::Utc;
use lms_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};

use crate::entities::{Comment, comment, content, membership};

/// Repository for comment operations.
#[derive(Clone)]
pub struct CommentRepository {
    db: Arc<DatabaseConnection>,
}

impl CommentRepository {
    /// Create a new comment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a comment by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<comment::Model>> {
        Comment::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a comment by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<comment::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Comment not found: {id}")))
    }

    /// List moderated comments on a content, newest first.
    pub async fn find_moderated_by_content(
        &self,
        content_id: i32,
    ) -> AppResult<Vec<comment::Model>> {
        Comment::find()
            .filter(comment::Column::ContentId.eq(content_id))
            .filter(comment::Column::IsModerated.eq(true))
            .order_by_desc(comment::Column::CreatedAt)
            .order_by_desc(comment::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List comments filtered by moderation flag and body text (for admin).
    pub async fn find_filtered(
        &self,
        is_moderated: Option<bool>,
        search: Option<&str>,
    ) -> AppResult<Vec<comment::Model>> {
        let mut query = Comment::find();

        if let Some(is_moderated) = is_moderated {
            query = query.filter(comment::Column::IsModerated.eq(is_moderated));
        }
        if let Some(search) = search.filter(|s| !s.is_empty()) {
            query = query.filter(comment::Column::Comment.contains(search));
        }

        query
            .order_by_desc(comment::Column::CreatedAt)
            .order_by_desc(comment::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count moderated comments across all contents of a course.
    pub async fn count_moderated_by_course(&self, course_id: i32) -> AppResult<u64> {
        Comment::find()
            .join(JoinType::InnerJoin, comment::Relation::Content.def())
            .filter(content::Column::CourseId.eq(course_id))
            .filter(comment::Column::IsModerated.eq(true))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count comments written by a user in any course.
    pub async fn count_by_user(&self, user_id: i32) -> AppResult<u64> {
        Comment::find()
            .join(JoinType::InnerJoin, comment::Relation::Member.def())
            .filter(membership::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new, unmoderated comment.
    pub async fn create(
        &self,
        content_id: i32,
        member_id: i32,
        text: String,
    ) -> AppResult<comment::Model> {
        let now = Utc::now();
        let active_model = comment::ActiveModel {
            content_id: Set(content_id),
            member_id: Set(member_id),
            comment: Set(text),
            is_moderated: Set(false),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };

        active_model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Set the moderation flag of a comment.
    pub async fn set_moderated(&self, id: i32, is_moderated: bool) -> AppResult<comment::Model> {
        let comment = self.get_by_id(id).await?;

        let mut active: comment::ActiveModel = comment.into();
        active.is_moderated = Set(is_moderated);
        active.updated_at = Set(Utc::now().into());

        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_comment(id: i32, is_moderated: bool) -> comment::Model {
        comment::Model {
            id,
            content_id: 1,
            member_id: 1,
            comment: "Great lesson".to_string(),
            is_moderated,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_moderated_by_content() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    create_test_comment(2, true),
                    create_test_comment(1, true),
                ]])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        let comments = repo.find_moderated_by_content(1).await.unwrap();

        assert_eq!(comments.len(), 2);
        assert!(comments.iter().all(|c| c.is_moderated));
    }

    #[tokio::test]
    async fn test_set_moderated_missing_comment() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<comment::Model>::new()])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        let result = repo.set_moderated(42, true).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
