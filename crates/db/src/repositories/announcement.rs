//! Announcement repository.

use std::sync::Arc;

use chrono::Utc;
use lms_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::{Announcement, announcement};

/// Repository for course announcement operations.
#[derive(Clone)]
pub struct AnnouncementRepository {
    db: Arc<DatabaseConnection>,
}

impl AnnouncementRepository {
    /// Create a new announcement repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find announcement by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<announcement::Model>> {
        Announcement::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find announcement by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<announcement::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Announcement not found: {id}")))
    }

    /// List announcements, optionally restricted to one course, by show date.
    pub async fn find_by_course(
        &self,
        course_id: Option<i32>,
    ) -> AppResult<Vec<announcement::Model>> {
        let mut query = Announcement::find();

        if let Some(course_id) = course_id {
            query = query.filter(announcement::Column::CourseId.eq(course_id));
        }

        query
            .order_by_asc(announcement::Column::ShowDate)
            .order_by_asc(announcement::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new announcement.
    pub async fn create(
        &self,
        course_id: i32,
        title: String,
        message: String,
        show_date: chrono::DateTime<Utc>,
    ) -> AppResult<announcement::Model> {
        let now = Utc::now();
        let active_model = announcement::ActiveModel {
            course_id: Set(course_id),
            title: Set(title),
            message: Set(message),
            show_date: Set(show_date.into()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };

        active_model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an announcement.
    pub async fn update(
        &self,
        id: i32,
        title: Option<String>,
        message: Option<String>,
        show_date: Option<chrono::DateTime<Utc>>,
    ) -> AppResult<announcement::Model> {
        let announcement = self.get_by_id(id).await?;

        let mut active: announcement::ActiveModel = announcement.into();

        if let Some(title) = title {
            active.title = Set(title);
        }
        if let Some(message) = message {
            active.message = Set(message);
        }
        if let Some(show_date) = show_date {
            active.show_date = Set(show_date.into());
        }

        active.updated_at = Set(Utc::now().into());

        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete an announcement.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        Announcement::delete_by_id(id)
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

    fn create_test_announcement(id: i32, course_id: i32, title: &str) -> announcement::Model {
        announcement::Model {
            id,
            course_id,
            title: title.to_string(),
            message: "Exam moved to Friday".to_string(),
            show_date: Utc::now().into(),
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_id_returns_announcement() {
        let announcement = create_test_announcement(1, 2, "Exam");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[announcement.clone()]])
                .into_connection(),
        );

        let repo = AnnouncementRepository::new(db);
        let found = repo.find_by_id(1).await.unwrap().unwrap();

        assert_eq!(found.title, "Exam");
    }

    #[tokio::test]
    async fn test_find_by_course() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    create_test_announcement(1, 2, "First"),
                    create_test_announcement(2, 2, "Second"),
                ]])
                .into_connection(),
        );

        let repo = AnnouncementRepository::new(db);
        let results = repo.find_by_course(Some(2)).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "First");
    }

    #[tokio::test]
    async fn test_update_missing_announcement() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<announcement::Model>::new()])
                .into_connection(),
        );

        let repo = AnnouncementRepository::new(db);
        let result = repo.update(5, Some("New".to_string()), None, None).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
