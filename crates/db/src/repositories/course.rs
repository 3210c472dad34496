//! Course repository.

use std::sync::Arc;

use chrono::Utc;
use lms_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::{Course, course};

/// Repository for course operations.
#[derive(Clone)]
pub struct CourseRepository {
    db: Arc<DatabaseConnection>,
}

impl CourseRepository {
    /// Create a new course repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a course by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<course::Model>> {
        Course::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a course by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<course::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Course not found: {id}")))
    }

    /// Find courses by IDs.
    pub async fn find_by_ids(&self, ids: &[i32]) -> AppResult<Vec<course::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Course::find()
            .filter(course::Column::Id.is_in(ids.iter().copied()))
            .order_by_desc(course::Column::CreatedAt)
            .order_by_desc(course::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all courses, newest first.
    pub async fn find_all(&self) -> AppResult<Vec<course::Model>> {
        Course::find()
            .order_by_desc(course::Column::CreatedAt)
            .order_by_desc(course::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count courses owned by a teacher.
    pub async fn count_by_teacher(&self, teacher_id: i32) -> AppResult<u64> {
        Course::find()
            .filter(course::Column::TeacherId.eq(teacher_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new course.
    pub async fn create(&self, model: course::ActiveModel) -> AppResult<course::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Set or clear the enrollment limit of a course.
    pub async fn set_max_students(
        &self,
        id: i32,
        max_students: Option<i32>,
    ) -> AppResult<course::Model> {
        let course = self.get_by_id(id).await?;

        let mut active: course::ActiveModel = course.into();
        active.max_students = Set(max_students);
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

    fn create_test_course(id: i32, max_students: Option<i32>) -> course::Model {
        course::Model {
            id,
            name: "Rust 101".to_string(),
            description: "Ownership and borrowing".to_string(),
            price: 0,
            teacher_id: 1,
            max_students,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<course::Model>::new()])
                .into_connection(),
        );

        let repo = CourseRepository::new(db);
        let result = repo.get_by_id(7).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_set_max_students() {
        let before = create_test_course(1, None);
        let after = create_test_course(1, Some(30));

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[before], [after]])
                .into_connection(),
        );

        let repo = CourseRepository::new(db);
        let updated = repo.set_max_students(1, Some(30)).await.unwrap();

        assert_eq!(updated.max_students, Some(30));
    }

    #[tokio::test]
    async fn test_count_by_teacher() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(2))
                }]])
                .into_connection(),
        );

        let repo = CourseRepository::new(db);
        assert_eq!(repo.count_by_teacher(1).await.unwrap(), 2);
    }
}
