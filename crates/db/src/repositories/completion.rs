//! Content and course completion repository.

use std::sync::Arc;

use chrono::Utc;
use lms_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};

use crate::entities::{
    ContentCompletion, CourseCompletion, content, content_completion, course_completion,
};

/// Repository for completion tracking.
#[derive(Clone)]
pub struct CompletionRepository {
    db: Arc<DatabaseConnection>,
}

impl CompletionRepository {
    /// Create a new completion repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    // === Content completions ===

    /// Find a content completion by ID.
    pub async fn find_content_completion_by_id(
        &self,
        id: i32,
    ) -> AppResult<Option<content_completion::Model>> {
        ContentCompletion::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the completion of a content by a user.
    pub async fn find_content_completion(
        &self,
        user_id: i32,
        content_id: i32,
    ) -> AppResult<Option<content_completion::Model>> {
        ContentCompletion::find()
            .filter(content_completion::Column::UserId.eq(user_id))
            .filter(content_completion::Column::ContentId.eq(content_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Record that a user completed a content.
    ///
    /// A second completion of the same content fails with
    /// [`AppError::AlreadyCompleted`], including when two inserts race.
    pub async fn create_content_completion(
        &self,
        user_id: i32,
        content_id: i32,
    ) -> AppResult<content_completion::Model> {
        if self
            .find_content_completion(user_id, content_id)
            .await?
            .is_some()
        {
            return Err(already_completed(content_id));
        }

        let active_model = content_completion::ActiveModel {
            user_id: Set(user_id),
            content_id: Set(content_id),
            completion_date: Set(Utc::now().into()),
            ..Default::default()
        };

        active_model.insert(self.db.as_ref()).await.map_err(|e| {
            if super::is_unique_violation(&e) {
                already_completed(content_id)
            } else {
                AppError::Database(e.to_string())
            }
        })
    }

    /// Count a user's content completions within a course.
    pub async fn count_content_completions_in_course(
        &self,
        user_id: i32,
        course_id: i32,
    ) -> AppResult<u64> {
        ContentCompletion::find()
            .join(JoinType::InnerJoin, content_completion::Relation::Content.def())
            .filter(content_completion::Column::UserId.eq(user_id))
            .filter(content::Column::CourseId.eq(course_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List a user's content completions within a course.
    pub async fn find_content_completions_in_course(
        &self,
        user_id: i32,
        course_id: i32,
    ) -> AppResult<Vec<content_completion::Model>> {
        ContentCompletion::find()
            .join(JoinType::InnerJoin, content_completion::Relation::Content.def())
            .filter(content_completion::Column::UserId.eq(user_id))
            .filter(content::Column::CourseId.eq(course_id))
            .order_by_asc(content_completion::Column::CompletionDate)
            .order_by_asc(content_completion::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count all content completions of a user.
    pub async fn count_content_completions_by_user(&self, user_id: i32) -> AppResult<u64> {
        ContentCompletion::find()
            .filter(content_completion::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a content completion.
    pub async fn delete_content_completion(&self, id: i32) -> AppResult<()> {
        ContentCompletion::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    // === Course completions ===

    /// Find a course completion by ID.
    pub async fn find_course_completion_by_id(
        &self,
        id: i32,
    ) -> AppResult<Option<course_completion::Model>> {
        CourseCompletion::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the completion of a course by a user.
    pub async fn find_course_completion(
        &self,
        user_id: i32,
        course_id: i32,
    ) -> AppResult<Option<course_completion::Model>> {
        CourseCompletion::find()
            .filter(course_completion::Column::UserId.eq(user_id))
            .filter(course_completion::Column::CourseId.eq(course_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Return the course completion of a user, creating it if absent.
    pub async fn get_or_create_course_completion(
        &self,
        user_id: i32,
        course_id: i32,
    ) -> AppResult<course_completion::Model> {
        if let Some(existing) = self.find_course_completion(user_id, course_id).await? {
            return Ok(existing);
        }

        let active_model = course_completion::ActiveModel {
            user_id: Set(user_id),
            course_id: Set(course_id),
            completion_date: Set(Utc::now().into()),
            ..Default::default()
        };

        match active_model.insert(self.db.as_ref()).await {
            Ok(created) => Ok(created),
            // Lost a race against a concurrent writer
            Err(e) if super::is_unique_violation(&e) => self
                .find_course_completion(user_id, course_id)
                .await?
                .ok_or_else(|| AppError::Database(e.to_string())),
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }

    /// List completions of a course, earliest first.
    pub async fn find_course_completions_by_course(
        &self,
        course_id: i32,
    ) -> AppResult<Vec<course_completion::Model>> {
        CourseCompletion::find()
            .filter(course_completion::Column::CourseId.eq(course_id))
            .order_by_asc(course_completion::Column::CompletionDate)
            .order_by_asc(course_completion::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List the course completions of a user, earliest first.
    pub async fn find_course_completions_by_user(
        &self,
        user_id: i32,
    ) -> AppResult<Vec<course_completion::Model>> {
        CourseCompletion::find()
            .filter(course_completion::Column::UserId.eq(user_id))
            .order_by_asc(course_completion::Column::CompletionDate)
            .order_by_asc(course_completion::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

fn already_completed(content_id: i32) -> AppError {
    AppError::AlreadyCompleted(format!("Content {content_id} was already completed"))
}
