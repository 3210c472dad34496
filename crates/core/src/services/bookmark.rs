//! Bookmark service.

use chrono::{DateTime, FixedOffset};
use lms_common::{AppError, AppResult};
use lms_db::{
    entities::{content, course, user},
    repositories::{BookmarkRepository, ContentRepository, CourseRepository},
};
use serde::{Deserialize, Serialize};

use super::policy::{self, Action, Resource};

/// Input for bookmarking a content.
#[derive(Debug, Deserialize)]
pub struct AddBookmarkInput {
    pub content_id: i32,
}

/// A bookmark together with its content and course.
#[derive(Debug, Clone, Serialize)]
pub struct BookmarkView {
    pub id: i32,
    pub content: content::Model,
    pub course: course::Model,
    pub created_at: DateTime<FixedOffset>,
}

/// Service for content bookmarks.
#[derive(Clone)]
pub struct BookmarkService {
    bookmark_repo: BookmarkRepository,
    content_repo: ContentRepository,
    course_repo: CourseRepository,
}

impl BookmarkService {
    /// Create a new bookmark service.
    #[must_use]
    pub const fn new(
        bookmark_repo: BookmarkRepository,
        content_repo: ContentRepository,
        course_repo: CourseRepository,
    ) -> Self {
        Self {
            bookmark_repo,
            content_repo,
            course_repo,
        }
    }

    /// Bookmark a content. Bookmarking twice returns the same bookmark.
    pub async fn add(&self, actor: &user::Model, content_id: i32) -> AppResult<BookmarkView> {
        policy::authorize(Some(actor), Action::ManageOwnBookmarks, Resource::None)?;

        let content = self.content_repo.get_by_id(content_id).await?;
        let course = self.course_repo.get_by_id(content.course_id).await?;
        let (bookmark, created) = self.bookmark_repo.get_or_create(actor.id, content_id).await?;

        if created {
            tracing::debug!(user_id = actor.id, content_id, "Bookmark added");
        }

        Ok(BookmarkView {
            id: bookmark.id,
            content,
            course,
            created_at: bookmark.created_at,
        })
    }

    /// List the actor's bookmarks, newest first.
    pub async fn list(&self, actor: &user::Model) -> AppResult<Vec<BookmarkView>> {
        policy::authorize(Some(actor), Action::ManageOwnBookmarks, Resource::None)?;

        let rows = self.bookmark_repo.find_by_user(actor.id).await?;

        let mut course_ids: Vec<i32> = rows
            .iter()
            .filter_map(|(_, content)| content.as_ref().map(|c| c.course_id))
            .collect();
        course_ids.sort_unstable();
        course_ids.dedup();
        let courses = self.course_repo.find_by_ids(&course_ids).await?;

        Ok(rows
            .into_iter()
            .filter_map(|(bookmark, content)| {
                let content = content?;
                let course = courses.iter().find(|c| c.id == content.course_id)?.clone();
                Some(BookmarkView {
                    id: bookmark.id,
                    content,
                    course,
                    created_at: bookmark.created_at,
                })
            })
            .collect())
    }

    /// Delete one of the actor's bookmarks.
    pub async fn delete(&self, actor: &user::Model, bookmark_id: i32) -> AppResult<()> {
        policy::authorize(Some(actor), Action::ManageOwnBookmarks, Resource::None)?;

        self.bookmark_repo
            .find_by_id(bookmark_id)
            .await?
            .filter(|bookmark| bookmark.user_id == actor.id)
            .ok_or_else(|| AppError::NotFound(format!("Bookmark not found: {bookmark_id}")))?;

        self.bookmark_repo.delete(bookmark_id).await
    }
}
