//! Database repositories.

mod announcement;
mod bookmark;
mod comment;
mod completion;
mod content;
mod course;
mod feedback;
mod membership;
mod user;

pub use announcement::AnnouncementRepository;
pub use bookmark::BookmarkRepository;
pub use comment::CommentRepository;
pub use completion::CompletionRepository;
pub use content::ContentRepository;
pub use course::CourseRepository;
pub use feedback::FeedbackRepository;
pub use membership::MembershipRepository;
pub use user::UserRepository;

use sea_orm::{DbErr, SqlErr};

/// Whether a database error is a unique constraint violation.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
