//! Feedback service.
//!
//! A user has at most one feedback per course; submitting again overwrites
//! the rating and comment.

use lms_common::{AppError, AppResult};
use lms_db::{
    entities::{feedback, user},
    repositories::{CourseRepository, FeedbackRepository},
};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use super::policy::{self, Action, Resource};

/// Input for submitting feedback.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitFeedbackInput {
    pub course_id: i32,

    #[validate(range(min = 1, max = 5))]
    pub rating: i16,

    #[serde(default)]
    #[validate(length(max = 5000))]
    pub comment: String,
}

/// Input for editing feedback.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateFeedbackInput {
    #[validate(range(min = 1, max = 5))]
    pub rating: Option<i16>,

    #[validate(length(max = 5000))]
    pub comment: Option<String>,
}

/// Service for course feedback.
#[derive(Clone)]
pub struct FeedbackService {
    feedback_repo: FeedbackRepository,
    course_repo: CourseRepository,
}

impl FeedbackService {
    /// Create a new feedback service.
    #[must_use]
    pub const fn new(feedback_repo: FeedbackRepository, course_repo: CourseRepository) -> Self {
        Self {
            feedback_repo,
            course_repo,
        }
    }

    /// Submit or overwrite the actor's feedback on a course.
    pub async fn submit(
        &self,
        actor: &user::Model,
        input: SubmitFeedbackInput,
    ) -> AppResult<feedback::Model> {
        policy::authorize(Some(actor), Action::ManageOwnFeedback, Resource::None)?;
        input.validate()?;
        self.course_repo.get_by_id(input.course_id).await?;

        let feedback = self
            .feedback_repo
            .upsert(actor.id, input.course_id, input.rating, input.comment)
            .await?;

        info!(
            feedback_id = feedback.id,
            course_id = feedback.course_id,
            rating = feedback.rating,
            "Feedback submitted"
        );

        Ok(feedback)
    }

    /// List the feedback on a course.
    pub async fn list_for_course(&self, course_id: i32) -> AppResult<Vec<feedback::Model>> {
        self.course_repo.get_by_id(course_id).await?;
        self.feedback_repo.find_by_course(course_id).await
    }

    /// Edit one of the actor's feedbacks.
    pub async fn update(
        &self,
        actor: &user::Model,
        feedback_id: i32,
        input: UpdateFeedbackInput,
    ) -> AppResult<feedback::Model> {
        policy::authorize(Some(actor), Action::ManageOwnFeedback, Resource::None)?;
        self.find_own(actor, feedback_id).await?;
        input.validate()?;

        self.feedback_repo
            .update(feedback_id, input.rating, input.comment)
            .await
    }

    /// Delete one of the actor's feedbacks.
    pub async fn delete(&self, actor: &user::Model, feedback_id: i32) -> AppResult<()> {
        policy::authorize(Some(actor), Action::ManageOwnFeedback, Resource::None)?;
        self.find_own(actor, feedback_id).await?;

        self.feedback_repo.delete(feedback_id).await
    }

    async fn find_own(&self, actor: &user::Model, feedback_id: i32) -> AppResult<feedback::Model> {
        self.feedback_repo
            .find_by_id(feedback_id)
            .await?
            .filter(|feedback| feedback.user_id == actor.id)
            .ok_or_else(|| AppError::NotFound(format!("Feedback not found: {feedback_id}")))
    }
}
