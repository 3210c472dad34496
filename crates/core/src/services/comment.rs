//! Comment service.
//!
//! New comments start unmoderated. Only moderated comments are listed
//! publicly; moderation is open to the course teacher and staff.

use lms_common::{AppError, AppResult};
use lms_db::{
    entities::{comment, user},
    repositories::{CommentRepository, ContentRepository, CourseRepository, MembershipRepository},
};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use super::policy::{self, Action, Resource};

/// Input for posting a comment.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentInput {
    #[validate(length(min = 1, max = 5000))]
    pub comment: String,
}

/// Input for the moderation toggle.
#[derive(Debug, Deserialize)]
pub struct ModerateCommentInput {
    pub is_moderated: bool,
}

/// Service for content comments.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    content_repo: ContentRepository,
    course_repo: CourseRepository,
    membership_repo: MembershipRepository,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub const fn new(
        comment_repo: CommentRepository,
        content_repo: ContentRepository,
        course_repo: CourseRepository,
        membership_repo: MembershipRepository,
    ) -> Self {
        Self {
            comment_repo,
            content_repo,
            course_repo,
            membership_repo,
        }
    }

    /// List the moderated comments on a content, newest first.
    pub async fn list_moderated(
        &self,
        course_id: i32,
        content_id: i32,
    ) -> AppResult<Vec<comment::Model>> {
        let content = self.content_repo.get_by_id(content_id).await?;
        if content.course_id != course_id {
            return Err(AppError::NotFound(format!("Content not found: {content_id}")));
        }

        self.comment_repo.find_moderated_by_content(content_id).await
    }

    /// Post a comment on a content as a member of its course.
    pub async fn create(
        &self,
        actor: &user::Model,
        course_id: i32,
        content_id: i32,
        input: CreateCommentInput,
    ) -> AppResult<comment::Model> {
        let course = self.course_repo.get_by_id(course_id).await?;
        let content = self.content_repo.get_by_id(content_id).await?;
        if content.course_id != course.id {
            return Err(AppError::NotFound(format!("Content not found: {content_id}")));
        }

        let membership = self.membership_repo.find(course_id, actor.id).await?;
        policy::authorize(
            Some(actor),
            Action::CommentOnContent,
            Resource::Enrolled {
                course: &course,
                is_member: membership.is_some(),
            },
        )?;
        let membership = membership
            .ok_or_else(|| AppError::Forbidden("You are not a member of this course".to_string()))?;

        input.validate()?;

        let comment = self
            .comment_repo
            .create(content_id, membership.id, input.comment)
            .await?;

        info!(comment_id = comment.id, content_id, user_id = actor.id, "Comment posted");

        Ok(comment)
    }

    /// Approve or hide a comment.
    pub async fn moderate(
        &self,
        actor: &user::Model,
        comment_id: i32,
        input: ModerateCommentInput,
    ) -> AppResult<comment::Model> {
        let comment = self.comment_repo.get_by_id(comment_id).await?;
        let content = self.content_repo.get_by_id(comment.content_id).await?;
        let course = self.course_repo.get_by_id(content.course_id).await?;

        policy::authorize(Some(actor), Action::ModerateComment, Resource::Course(&course))?;

        let comment = self
            .comment_repo
            .set_moderated(comment_id, input.is_moderated)
            .await?;

        info!(
            comment_id,
            is_moderated = comment.is_moderated,
            moderator_id = actor.id,
            "Comment moderated"
        );

        Ok(comment)
    }
}
