//! Course service.

use chrono::Utc;
use lms_common::AppResult;
use lms_db::{
    entities::{course, user},
    repositories::CourseRepository,
};
use sea_orm::Set;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use super::policy::{self, Action, Resource};

/// Input for creating a course.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCourseInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[validate(range(min = 0))]
    pub price: i32,

    #[validate(range(min = 0))]
    pub max_students: Option<i32>,
}

/// Input for changing the enrollment limit. `None` clears the limit.
#[derive(Debug, Deserialize, Validate)]
pub struct EnrollmentLimitInput {
    #[validate(range(min = 0))]
    pub max_students: Option<i32>,
}

/// Service for managing courses.
#[derive(Clone)]
pub struct CourseService {
    course_repo: CourseRepository,
}

impl CourseService {
    /// Create a new course service.
    #[must_use]
    pub const fn new(course_repo: CourseRepository) -> Self {
        Self { course_repo }
    }

    /// List all courses, newest first.
    pub async fn list(&self) -> AppResult<Vec<course::Model>> {
        self.course_repo.find_all().await
    }

    /// Get a course by ID.
    pub async fn get(&self, course_id: i32) -> AppResult<course::Model> {
        self.course_repo.get_by_id(course_id).await
    }

    /// Create a course taught by the actor.
    pub async fn create(
        &self,
        actor: &user::Model,
        input: CreateCourseInput,
    ) -> AppResult<course::Model> {
        policy::authorize(Some(actor), Action::CreateCourse, Resource::None)?;
        input.validate()?;

        let now = Utc::now();
        let course = self
            .course_repo
            .create(course::ActiveModel {
                name: Set(input.name),
                description: Set(input.description),
                price: Set(input.price),
                teacher_id: Set(actor.id),
                max_students: Set(input.max_students),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
                ..Default::default()
            })
            .await?;

        info!(course_id = course.id, teacher_id = actor.id, "Course created");

        Ok(course)
    }

    /// Set or clear the enrollment limit of a course.
    pub async fn set_enrollment_limit(
        &self,
        actor: &user::Model,
        course_id: i32,
        input: EnrollmentLimitInput,
    ) -> AppResult<course::Model> {
        let course = self.course_repo.get_by_id(course_id).await?;
        policy::authorize(Some(actor), Action::SetEnrollmentLimit, Resource::Course(&course))?;
        input.validate()?;

        let course = self
            .course_repo
            .set_max_students(course_id, input.max_students)
            .await?;

        info!(course_id, max_students = ?course.max_students, "Enrollment limit changed");

        Ok(course)
    }
}
