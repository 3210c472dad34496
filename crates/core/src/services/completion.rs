//! Completion service.
//!
//! Content completions are recorded once per user. After every recorded
//! completion, [`CompletionService::reconcile_course_completion`] derives the
//! course completion from the counts; it only ever creates rows.

use lms_common::{AppError, AppResult};
use lms_db::{
    entities::{content_completion, course_completion, user},
    repositories::{
        CompletionRepository, ContentRepository, CourseRepository, MembershipRepository,
        UserRepository,
    },
};
use serde::Serialize;
use tracing::info;

use super::policy::{self, Action, Resource};

/// Data printed on a course certificate.
#[derive(Debug, Clone, Serialize)]
pub struct Certificate {
    pub completion_id: i32,
    pub user_id: i32,
    pub username: String,
    pub full_name: String,
    pub course_id: i32,
    pub course_name: String,
    pub completion_date: chrono::DateTime<chrono::FixedOffset>,
    pub total_contents: u64,
    pub completed_contents: u64,
}

/// Service for completion tracking.
#[derive(Clone)]
pub struct CompletionService {
    completion_repo: CompletionRepository,
    content_repo: ContentRepository,
    course_repo: CourseRepository,
    membership_repo: MembershipRepository,
    user_repo: UserRepository,
}

impl CompletionService {
    /// Create a new completion service.
    #[must_use]
    pub const fn new(
        completion_repo: CompletionRepository,
        content_repo: ContentRepository,
        course_repo: CourseRepository,
        membership_repo: MembershipRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            completion_repo,
            content_repo,
            course_repo,
            membership_repo,
            user_repo,
        }
    }

    /// Mark a content as completed by the actor.
    ///
    /// Completing the same content twice fails with
    /// [`AppError::AlreadyCompleted`].
    pub async fn complete_content(
        &self,
        actor: &user::Model,
        content_id: i32,
    ) -> AppResult<content_completion::Model> {
        let content = self.content_repo.get_by_id(content_id).await?;
        let course = self.course_repo.get_by_id(content.course_id).await?;
        let is_member = self.membership_repo.is_member(course.id, actor.id).await?;

        policy::authorize(
            Some(actor),
            Action::CompleteContent,
            Resource::Enrolled {
                course: &course,
                is_member,
            },
        )?;

        let completion = self
            .completion_repo
            .create_content_completion(actor.id, content_id)
            .await?;

        info!(user_id = actor.id, content_id, "Content completed");

        self.reconcile_course_completion(actor.id, course.id).await?;

        Ok(completion)
    }

    /// Create the course completion for a user once every content of the
    /// course is completed.
    ///
    /// Returns the course completion when the user has one. Safe to call any
    /// number of times; an existing completion is never removed even if the
    /// course gained content since.
    pub async fn reconcile_course_completion(
        &self,
        user_id: i32,
        course_id: i32,
    ) -> AppResult<Option<course_completion::Model>> {
        let total = self.content_repo.count_by_course(course_id).await?;
        let done = self
            .completion_repo
            .count_content_completions_in_course(user_id, course_id)
            .await?;

        if total == 0 || done < total {
            return self
                .completion_repo
                .find_course_completion(user_id, course_id)
                .await;
        }

        let completion = self
            .completion_repo
            .get_or_create_course_completion(user_id, course_id)
            .await?;

        info!(user_id, course_id, done, total, "Course completion reconciled");

        Ok(Some(completion))
    }

    /// The actor's completion of a course.
    pub async fn certificate_data(
        &self,
        actor: &user::Model,
        course_id: i32,
    ) -> AppResult<course_completion::Model> {
        policy::authorize(Some(actor), Action::ViewOwnCompletions, Resource::None)?;
        self.course_repo.get_by_id(course_id).await?;

        self.completion_repo
            .find_course_completion(actor.id, course_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Course not completed yet".to_string()))
    }

    /// Build the certificate payload for a course completion.
    pub async fn certificate(
        &self,
        actor: &user::Model,
        completion_id: i32,
    ) -> AppResult<Certificate> {
        let completion = self
            .completion_repo
            .find_course_completion_by_id(completion_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Completion not found: {completion_id}")))?;

        policy::authorize(
            Some(actor),
            Action::ViewCertificate,
            Resource::User(completion.user_id),
        )?;

        let user = self.user_repo.get_by_id(completion.user_id).await?;
        let course = self.course_repo.get_by_id(completion.course_id).await?;
        let total_contents = self.content_repo.count_by_course(course.id).await?;
        let completed_contents = self
            .completion_repo
            .count_content_completions_in_course(user.id, course.id)
            .await?;

        let full_name = format!("{} {}", user.first_name, user.last_name)
            .trim()
            .to_string();

        Ok(Certificate {
            completion_id: completion.id,
            user_id: user.id,
            full_name: if full_name.is_empty() {
                user.username.clone()
            } else {
                full_name
            },
            username: user.username,
            course_id: course.id,
            course_name: course.name,
            completion_date: completion.completion_date,
            total_contents,
            completed_contents,
        })
    }

    /// List every completion of a course.
    pub async fn list_course_completions(
        &self,
        actor: &user::Model,
        course_id: i32,
    ) -> AppResult<Vec<course_completion::Model>> {
        let course = self.course_repo.get_by_id(course_id).await?;
        policy::authorize(
            Some(actor),
            Action::ListCourseCompletions,
            Resource::Course(&course),
        )?;

        self.completion_repo
            .find_course_completions_by_course(course_id)
            .await
    }

    /// List the courses a user has completed.
    pub async fn list_user_completed_courses(
        &self,
        actor: &user::Model,
        user_id: i32,
    ) -> AppResult<Vec<course_completion::Model>> {
        policy::authorize(
            Some(actor),
            Action::ViewUserCompletedCourses,
            Resource::User(user_id),
        )?;
        self.user_repo.get_by_id(user_id).await?;

        self.completion_repo
            .find_course_completions_by_user(user_id)
            .await
    }

    /// List the actor's content completions within a course.
    pub async fn list_my_content_completions(
        &self,
        actor: &user::Model,
        course_id: i32,
    ) -> AppResult<Vec<content_completion::Model>> {
        policy::authorize(Some(actor), Action::ViewOwnCompletions, Resource::None)?;
        self.course_repo.get_by_id(course_id).await?;

        self.completion_repo
            .find_content_completions_in_course(actor.id, course_id)
            .await
    }

    /// Withdraw one of the actor's content completions.
    ///
    /// Course completions already earned are kept.
    pub async fn delete_content_completion(
        &self,
        actor: &user::Model,
        completion_id: i32,
    ) -> AppResult<()> {
        policy::authorize(Some(actor), Action::ViewOwnCompletions, Resource::None)?;

        let completion = self
            .completion_repo
            .find_content_completion_by_id(completion_id)
            .await?
            .filter(|completion| completion.user_id == actor.id)
            .ok_or_else(|| AppError::NotFound(format!("Completion not found: {completion_id}")))?;

        self.completion_repo
            .delete_content_completion(completion.id)
            .await?;

        info!(
            user_id = actor.id,
            content_id = completion.content_id,
            "Content completion withdrawn"
        );

        Ok(())
    }
}
