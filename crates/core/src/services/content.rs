//! Course content service.

use chrono::{DateTime, Utc};
use lms_common::{AppError, AppResult};
use lms_db::{
    entities::{content, course, user},
    repositories::{ContentRepository, CourseRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use super::policy::{self, Action, Resource};

/// Input for creating content.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateContentInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    pub description: Option<String>,

    #[validate(url, length(max = 200))]
    pub video_url: Option<String>,

    #[validate(length(max = 255))]
    pub file_attachment: Option<String>,

    pub parent_id: Option<i32>,

    pub release_date: Option<DateTime<Utc>>,

    pub end_date: Option<DateTime<Utc>>,
}

/// Whether `content` can be seen by `viewer` at `now`.
///
/// Staff and the course teacher see everything. Everyone else sees content
/// inside its `[release_date, end_date]` window; a missing bound is open.
#[must_use]
pub fn is_visible(
    content: &content::Model,
    course: &course::Model,
    viewer: Option<&user::Model>,
    now: DateTime<Utc>,
) -> bool {
    let privileged =
        viewer.is_some_and(|user| user.is_staff_member() || user.id == course.teacher_id);
    if privileged {
        return true;
    }

    let released = content.release_date.is_none_or(|release| release <= now);
    let not_ended = content.end_date.is_none_or(|end| end >= now);

    released && not_ended
}

/// Service for course content.
#[derive(Clone)]
pub struct ContentService {
    content_repo: ContentRepository,
    course_repo: CourseRepository,
}

impl ContentService {
    /// Create a new content service.
    #[must_use]
    pub const fn new(content_repo: ContentRepository, course_repo: CourseRepository) -> Self {
        Self {
            content_repo,
            course_repo,
        }
    }

    /// List the contents of a course the viewer can currently see.
    pub async fn list_visible(
        &self,
        viewer: Option<&user::Model>,
        course_id: i32,
    ) -> AppResult<Vec<content::Model>> {
        let course = self.course_repo.get_by_id(course_id).await?;
        let now = Utc::now();

        Ok(self
            .content_repo
            .find_by_course(course_id)
            .await?
            .into_iter()
            .filter(|content| is_visible(content, &course, viewer, now))
            .collect())
    }

    /// Get one content of a course. Invisible content is reported as missing.
    pub async fn get_visible(
        &self,
        viewer: Option<&user::Model>,
        course_id: i32,
        content_id: i32,
    ) -> AppResult<content::Model> {
        let course = self.course_repo.get_by_id(course_id).await?;
        let content = self.content_repo.get_by_id(content_id).await?;

        if content.course_id != course.id || !is_visible(&content, &course, viewer, Utc::now()) {
            return Err(AppError::NotFound(format!("Content not found: {content_id}")));
        }

        Ok(content)
    }

    /// Add content to a course.
    pub async fn create(
        &self,
        actor: &user::Model,
        course_id: i32,
        input: CreateContentInput,
    ) -> AppResult<content::Model> {
        let course = self.course_repo.get_by_id(course_id).await?;
        policy::authorize(Some(actor), Action::CreateContent, Resource::Course(&course))?;
        input.validate()?;

        if let (Some(release), Some(end)) = (input.release_date, input.end_date)
            && end < release
        {
            return Err(AppError::Validation(
                "end_date must not be before release_date".to_string(),
            ));
        }

        if let Some(parent_id) = input.parent_id {
            let parent = self.content_repo.find_by_id(parent_id).await?;
            if parent.is_none_or(|parent| parent.course_id != course_id) {
                return Err(AppError::NotFound(format!(
                    "Parent content not found in course {course_id}: {parent_id}"
                )));
            }
        }

        let now = Utc::now();
        let content = self
            .content_repo
            .create(content::ActiveModel {
                course_id: Set(course_id),
                parent_id: Set(input.parent_id),
                name: Set(input.name),
                description: Set(input.description.unwrap_or_else(|| "-".to_string())),
                video_url: Set(input.video_url),
                file_attachment: Set(input.file_attachment),
                release_date: Set(input.release_date.map(Into::into)),
                end_date: Set(input.end_date.map(Into::into)),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
                ..Default::default()
            })
            .await?;

        info!(course_id, content_id = content.id, "Content created");

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn course(teacher_id: i32) -> course::Model {
        course::Model {
            id: 1,
            name: "Rust".to_string(),
            description: String::new(),
            price: 0,
            teacher_id,
            max_students: None,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn content(
        release_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    ) -> content::Model {
        content::Model {
            id: 1,
            course_id: 1,
            parent_id: None,
            name: "Lesson".to_string(),
            description: "-".to_string(),
            video_url: None,
            file_attachment: None,
            release_date: release_date.map(Into::into),
            end_date: end_date.map(Into::into),
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn user(id: i32, is_staff: bool) -> user::Model {
        user::Model {
            id,
            username: format!("user{id}"),
            email: format!("user{id}@example.com"),
            password_hash: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            is_staff,
            is_superuser: false,
            created_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_unbounded_content_is_visible() {
        assert!(is_visible(&content(None, None), &course(1), None, Utc::now()));
    }

    #[test]
    fn test_release_window() {
        let now = Utc::now();
        let course = course(1);
        let student = user(2, false);
        let item = content(Some(now + Duration::days(1)), Some(now + Duration::days(10)));

        assert!(!is_visible(&item, &course, Some(&student), now));
        assert!(is_visible(&item, &course, Some(&student), now + Duration::days(2)));
        assert!(!is_visible(&item, &course, Some(&student), now + Duration::days(11)));
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let now = Utc::now();
        let item = content(Some(now), Some(now));

        assert!(is_visible(&item, &course(1), None, now));
    }

    #[test]
    fn test_teacher_and_staff_see_unreleased_content() {
        let now = Utc::now();
        let course = course(1);
        let item = content(Some(now + Duration::days(1)), None);

        assert!(is_visible(&item, &course, Some(&user(1, false)), now));
        assert!(is_visible(&item, &course, Some(&user(3, true)), now));
        assert!(!is_visible(&item, &course, None, now));
    }
}
