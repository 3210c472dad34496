//! User dashboards and course analytics.

use lms_common::AppResult;
use lms_db::{
    entities::{membership::MemberRole, user},
    repositories::{
        CommentRepository, CompletionRepository, ContentRepository, CourseRepository,
        FeedbackRepository, MembershipRepository, UserRepository,
    },
};
use serde::Serialize;

use super::policy::{self, Action, Resource};

/// Activity summary of a user.
#[derive(Debug, Clone, Serialize)]
pub struct UserDashboard {
    pub user_id: i32,
    pub username: String,
    pub email: String,
    pub courses_as_student: u64,
    pub courses_created_as_teacher: u64,
    pub comments_written: u64,
    pub content_completed: u64,
}

/// Activity summary of a course.
#[derive(Debug, Clone, Serialize)]
pub struct CourseAnalytics {
    pub course_id: i32,
    pub course_name: String,
    pub total_members: u64,
    pub total_contents: u64,
    /// Moderated comments only.
    pub total_comments: u64,
    pub total_feedbacks: u64,
}

/// Service for read-only activity summaries.
#[derive(Clone)]
pub struct AnalyticsService {
    user_repo: UserRepository,
    course_repo: CourseRepository,
    membership_repo: MembershipRepository,
    content_repo: ContentRepository,
    comment_repo: CommentRepository,
    completion_repo: CompletionRepository,
    feedback_repo: FeedbackRepository,
}

impl AnalyticsService {
    /// Create a new analytics service.
    #[must_use]
    pub const fn new(
        user_repo: UserRepository,
        course_repo: CourseRepository,
        membership_repo: MembershipRepository,
        content_repo: ContentRepository,
        comment_repo: CommentRepository,
        completion_repo: CompletionRepository,
        feedback_repo: FeedbackRepository,
    ) -> Self {
        Self {
            user_repo,
            course_repo,
            membership_repo,
            content_repo,
            comment_repo,
            completion_repo,
            feedback_repo,
        }
    }

    /// Summarize a user's activity.
    pub async fn user_dashboard(
        &self,
        actor: &user::Model,
        user_id: i32,
    ) -> AppResult<UserDashboard> {
        policy::authorize(Some(actor), Action::ViewUserDashboard, Resource::User(user_id))?;

        let user = self.user_repo.get_by_id(user_id).await?;

        let courses_as_student = self
            .membership_repo
            .count_by_user_and_role(user_id, MemberRole::Student)
            .await?;

        Ok(UserDashboard {
            user_id: user.id,
            username: user.username,
            email: user.email,
            courses_as_student,
            courses_created_as_teacher: self.course_repo.count_by_teacher(user_id).await?,
            comments_written: self.comment_repo.count_by_user(user_id).await?,
            content_completed: self
                .completion_repo
                .count_content_completions_by_user(user_id)
                .await?,
        })
    }

    /// Summarize a course's activity.
    pub async fn course_analytics(
        &self,
        actor: &user::Model,
        course_id: i32,
    ) -> AppResult<CourseAnalytics> {
        let course = self.course_repo.get_by_id(course_id).await?;
        policy::authorize(Some(actor), Action::ViewCourseAnalytics, Resource::Course(&course))?;

        Ok(CourseAnalytics {
            course_id: course.id,
            course_name: course.name,
            total_members: self.membership_repo.count_by_course(course_id).await?,
            total_contents: self.content_repo.count_by_course(course_id).await?,
            total_comments: self.comment_repo.count_moderated_by_course(course_id).await?,
            total_feedbacks: self.feedback_repo.count_by_course(course_id).await?,
        })
    }
}
