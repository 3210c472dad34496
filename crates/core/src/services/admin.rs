//! Staff-only administrative listings.

use lms_common::AppResult;
use lms_db::{
    entities::{announcement, comment, membership, membership::MemberRole, user},
    repositories::{AnnouncementRepository, CommentRepository, MembershipRepository},
};
use serde::Deserialize;

use super::policy::{self, Action, Resource};

/// Filters for the member listing.
#[derive(Debug, Default, Deserialize)]
pub struct MemberFilter {
    pub course_id: Option<i32>,
    pub role: Option<MemberRole>,
}

/// Filters for the comment listing.
#[derive(Debug, Default, Deserialize)]
pub struct CommentFilter {
    pub is_moderated: Option<bool>,
    /// Substring of the comment body.
    pub search: Option<String>,
}

/// Filters for the announcement listing.
#[derive(Debug, Default, Deserialize)]
pub struct AnnouncementFilter {
    pub course_id: Option<i32>,
}

/// Service backing the administrative views.
#[derive(Clone)]
pub struct AdminService {
    membership_repo: MembershipRepository,
    comment_repo: CommentRepository,
    announcement_repo: AnnouncementRepository,
}

impl AdminService {
    /// Create a new admin service.
    #[must_use]
    pub const fn new(
        membership_repo: MembershipRepository,
        comment_repo: CommentRepository,
        announcement_repo: AnnouncementRepository,
    ) -> Self {
        Self {
            membership_repo,
            comment_repo,
            announcement_repo,
        }
    }

    pub async fn list_members(
        &self,
        actor: &user::Model,
        filter: MemberFilter,
    ) -> AppResult<Vec<membership::Model>> {
        policy::authorize(Some(actor), Action::AdminListing, Resource::None)?;
        self.membership_repo
            .find_filtered(filter.course_id, filter.role)
            .await
    }

    pub async fn list_comments(
        &self,
        actor: &user::Model,
        filter: CommentFilter,
    ) -> AppResult<Vec<comment::Model>> {
        policy::authorize(Some(actor), Action::AdminListing, Resource::None)?;
        self.comment_repo
            .find_filtered(filter.is_moderated, filter.search.as_deref())
            .await
    }

    pub async fn list_announcements(
        &self,
        actor: &user::Model,
        filter: AnnouncementFilter,
    ) -> AppResult<Vec<announcement::Model>> {
        policy::authorize(Some(actor), Action::AdminListing, Resource::None)?;
        self.announcement_repo.find_by_course(filter.course_id).await
    }
}
