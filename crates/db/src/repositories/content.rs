//! Content repository.

use std::sync::Arc;

use lms_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};

use crate::entities::{Content, content};

/// Repository for course content operations.
#[derive(Clone)]
pub struct ContentRepository {
    db: Arc<DatabaseConnection>,
}

impl ContentRepository {
    /// Create a new content repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find content by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<content::Model>> {
        Content::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find content by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<content::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Content not found: {id}")))
    }

    /// List the contents of a course in creation order.
    pub async fn find_by_course(&self, course_id: i32) -> AppResult<Vec<content::Model>> {
        Content::find()
            .filter(content::Column::CourseId.eq(course_id))
            .order_by_asc(content::Column::CreatedAt)
            .order_by_asc(content::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count the contents of a course.
    pub async fn count_by_course(&self, course_id: i32) -> AppResult<u64> {
        Content::find()
            .filter(content::Column::CourseId.eq(course_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create new content.
    pub async fn create(&self, model: content::ActiveModel) -> AppResult<content::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_content(id: i32, course_id: i32) -> content::Model {
        content::Model {
            id,
            course_id,
            parent_id: None,
            name: format!("Lesson {id}"),
            description: "-".to_string(),
            video_url: None,
            file_attachment: None,
            release_date: None,
            end_date: None,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_course() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_content(1, 3), create_test_content(2, 3)]])
                .into_connection(),
        );

        let repo = ContentRepository::new(db);
        let contents = repo.find_by_course(3).await.unwrap();

        assert_eq!(contents.len(), 2);
        assert!(contents.iter().all(|c| c.course_id == 3));
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<content::Model>::new()])
                .into_connection(),
        );

        let repo = ContentRepository::new(db);
        assert!(matches!(repo.get_by_id(1).await, Err(AppError::NotFound(_))));
    }
}
