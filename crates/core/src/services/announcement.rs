//! Announcement service.

use chrono::{DateTime, Utc};
use lms_common::AppResult;
use lms_db::{
    entities::{announcement, user},
    repositories::{AnnouncementRepository, CourseRepository},
};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use super::policy::{self, Action, Resource};

/// Input for creating an announcement.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAnnouncementInput {
    #[validate(length(min = 1, max = 255))]
    pub title: String,

    #[validate(length(min = 1))]
    pub message: String,

    /// Defaults to now.
    pub show_date: Option<DateTime<Utc>>,
}

/// Input for updating an announcement.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAnnouncementInput {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,

    #[validate(length(min = 1))]
    pub message: Option<String>,

    pub show_date: Option<DateTime<Utc>>,
}

/// Service for managing course announcements.
#[derive(Clone)]
pub struct AnnouncementService {
    announcement_repo: AnnouncementRepository,
    course_repo: CourseRepository,
}

impl AnnouncementService {
    /// Create a new announcement service.
    #[must_use]
    pub const fn new(
        announcement_repo: AnnouncementRepository,
        course_repo: CourseRepository,
    ) -> Self {
        Self {
            announcement_repo,
            course_repo,
        }
    }

    /// List the announcements of a course by show date.
    pub async fn list_for_course(&self, course_id: i32) -> AppResult<Vec<announcement::Model>> {
        self.course_repo.get_by_id(course_id).await?;
        self.announcement_repo.find_by_course(Some(course_id)).await
    }

    /// Create an announcement.
    pub async fn create(
        &self,
        actor: &user::Model,
        course_id: i32,
        input: CreateAnnouncementInput,
    ) -> AppResult<announcement::Model> {
        let course = self.course_repo.get_by_id(course_id).await?;
        policy::authorize(Some(actor), Action::ManageAnnouncements, Resource::Course(&course))?;
        input.validate()?;

        let announcement = self
            .announcement_repo
            .create(
                course_id,
                input.title,
                input.message,
                input.show_date.unwrap_or_else(Utc::now),
            )
            .await?;

        info!(announcement_id = announcement.id, course_id, "Announcement created");

        Ok(announcement)
    }

    /// Update an announcement.
    pub async fn update(
        &self,
        actor: &user::Model,
        announcement_id: i32,
        input: UpdateAnnouncementInput,
    ) -> AppResult<announcement::Model> {
        let announcement = self.announcement_repo.get_by_id(announcement_id).await?;
        let course = self.course_repo.get_by_id(announcement.course_id).await?;
        policy::authorize(Some(actor), Action::ManageAnnouncements, Resource::Course(&course))?;
        input.validate()?;

        self.announcement_repo
            .update(announcement_id, input.title, input.message, input.show_date)
            .await
    }

    /// Delete an announcement.
    pub async fn delete(&self, actor: &user::Model, announcement_id: i32) -> AppResult<()> {
        let announcement = self.announcement_repo.get_by_id(announcement_id).await?;
        let course = self.course_repo.get_by_id(announcement.course_id).await?;
        policy::authorize(Some(actor), Action::ManageAnnouncements, Resource::Course(&course))?;

        self.announcement_repo.delete(announcement_id).await?;

        info!(announcement_id, "Announcement deleted");

        Ok(())
    }
}
