//! Business logic services.

#![allow(missing_docs)]

pub mod admin;
pub mod analytics;
pub mod announcement;
pub mod auth;
pub mod bookmark;
pub mod comment;
pub mod completion;
pub mod content;
pub mod course;
pub mod enrollment;
pub mod feedback;
pub mod policy;

pub use admin::{AdminService, AnnouncementFilter, CommentFilter, MemberFilter};
pub use analytics::{AnalyticsService, CourseAnalytics, UserDashboard};
pub use announcement::{AnnouncementService, CreateAnnouncementInput, UpdateAnnouncementInput};
pub use auth::{AuthService, Claims, LoginInput, RegisterInput};
pub use bookmark::{AddBookmarkInput, BookmarkService, BookmarkView};
pub use comment::{CommentService, CreateCommentInput, ModerateCommentInput};
pub use completion::{Certificate, CompletionService};
pub use content::{ContentService, CreateContentInput};
pub use course::{CourseService, CreateCourseInput, EnrollmentLimitInput};
pub use enrollment::{BatchEnrollInput, EnrollmentService};
pub use feedback::{FeedbackService, SubmitFeedbackInput, UpdateFeedbackInput};
pub use policy::{Action, Resource, Rule, authorize};
