//! Feedback repository.

use std::sync::Arc;

use chrono::Utc;
use lms_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::{Feedback, feedback};

/// Repository for course feedback.
#[derive(Clone)]
pub struct FeedbackRepository {
    db: Arc<DatabaseConnection>,
}

impl FeedbackRepository {
    /// Create a new feedback repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find feedback by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<feedback::Model>> {
        Feedback::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user's feedback on a course.
    pub async fn find(&self, user_id: i32, course_id: i32) -> AppResult<Option<feedback::Model>> {
        Feedback::find()
            .filter(feedback::Column::UserId.eq(user_id))
            .filter(feedback::Column::CourseId.eq(course_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or overwrite a user's feedback on a course.
    pub async fn upsert(
        &self,
        user_id: i32,
        course_id: i32,
        rating: i16,
        comment: String,
    ) -> AppResult<feedback::Model> {
        let now = Utc::now();

        if let Some(existing) = self.find(user_id, course_id).await? {
            let mut active: feedback::ActiveModel = existing.into();
            active.rating = Set(rating);
            active.comment = Set(comment);
            active.updated_at = Set(now.into());

            return active
                .update(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()));
        }

        let active_model = feedback::ActiveModel {
            user_id: Set(user_id),
            course_id: Set(course_id),
            rating: Set(rating),
            comment: Set(comment),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };

        active_model.insert(self.db.as_ref()).await.map_err(|e| {
            if super::is_unique_violation(&e) {
                AppError::Conflict("Feedback was submitted concurrently".to_string())
            } else {
                AppError::Database(e.to_string())
            }
        })
    }

    /// Update the rating and/or comment of a feedback.
    pub async fn update(
        &self,
        id: i32,
        rating: Option<i16>,
        comment: Option<String>,
    ) -> AppResult<feedback::Model> {
        let feedback = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Feedback not found: {id}")))?;

        let mut active: feedback::ActiveModel = feedback.into();

        if let Some(rating) = rating {
            active.rating = Set(rating);
        }
        if let Some(comment) = comment {
            active.comment = Set(comment);
        }

        active.updated_at = Set(Utc::now().into());

        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List feedback on a course, newest first.
    pub async fn find_by_course(&self, course_id: i32) -> AppResult<Vec<feedback::Model>> {
        Feedback::find()
            .filter(feedback::Column::CourseId.eq(course_id))
            .order_by_desc(feedback::Column::CreatedAt)
            .order_by_desc(feedback::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count feedback on a course.
    pub async fn count_by_course(&self, course_id: i32) -> AppResult<u64> {
        Feedback::find()
            .filter(feedback::Column::CourseId.eq(course_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a feedback.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        Feedback::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_feedback(id: i32, rating: i16, comment: &str) -> feedback::Model {
        feedback::Model {
            id,
            user_id: 1,
            course_id: 2,
            rating,
            comment: comment.to_string(),
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_upsert_overwrites_existing() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([
                    [create_test_feedback(1, 2, "meh")],
                    [create_test_feedback(1, 5, "great")],
                ])
                .into_connection(),
        );

        let repo = FeedbackRepository::new(db);
        let feedback = repo.upsert(1, 2, 5, "great".to_string()).await.unwrap();

        assert_eq!(feedback.id, 1);
        assert_eq!(feedback.rating, 5);
        assert_eq!(feedback.comment, "great");
    }
}
