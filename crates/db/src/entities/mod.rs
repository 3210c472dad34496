//! Database entities.

#![allow(missing_docs)]

pub mod announcement;
pub mod bookmark;
pub mod comment;
pub mod content;
pub mod content_completion;
pub mod course;
pub mod course_completion;
pub mod feedback;
pub mod membership;
pub mod user;

pub use announcement::Entity as Announcement;
pub use bookmark::Entity as Bookmark;
pub use comment::Entity as Comment;
pub use content::Entity as Content;
pub use content_completion::Entity as ContentCompletion;
pub use course::Entity as Course;
pub use course_completion::Entity as CourseCompletion;
pub use feedback::Entity as Feedback;
pub use membership::Entity as Membership;
pub use user::Entity as User;
