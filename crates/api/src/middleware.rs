//! API middleware.

#![allow(missing_docs)]

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use lms_common::Config;
use lms_core::{
    AdminService, AnalyticsService, AnnouncementService, AuthService, BookmarkService,
    CommentService, CompletionService, ContentService, CourseService, EnrollmentService,
    FeedbackService,
};
use lms_db::repositories::{
    AnnouncementRepository, BookmarkRepository, CommentRepository, CompletionRepository,
    ContentRepository, CourseRepository, FeedbackRepository, MembershipRepository,
    UserRepository,
};
use sea_orm::DatabaseConnection;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub course_service: CourseService,
    pub enrollment_service: EnrollmentService,
    pub content_service: ContentService,
    pub comment_service: CommentService,
    pub completion_service: CompletionService,
    pub announcement_service: AnnouncementService,
    pub bookmark_service: BookmarkService,
    pub feedback_service: FeedbackService,
    pub analytics_service: AnalyticsService,
    pub admin_service: AdminService,
}

impl AppState {
    /// Wire every repository and service over one connection pool.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>, config: &Config) -> Self {
        let user_repo = UserRepository::new(Arc::clone(&db));
        let course_repo = CourseRepository::new(Arc::clone(&db));
        let membership_repo = MembershipRepository::new(Arc::clone(&db));
        let content_repo = ContentRepository::new(Arc::clone(&db));
        let comment_repo = CommentRepository::new(Arc::clone(&db));
        let completion_repo = CompletionRepository::new(Arc::clone(&db));
        let announcement_repo = AnnouncementRepository::new(Arc::clone(&db));
        let bookmark_repo = BookmarkRepository::new(Arc::clone(&db));
        let feedback_repo = FeedbackRepository::new(Arc::clone(&db));

        Self {
            auth_service: AuthService::new(user_repo.clone(), &config.auth),
            course_service: CourseService::new(course_repo.clone()),
            enrollment_service: EnrollmentService::new(
                course_repo.clone(),
                membership_repo.clone(),
                user_repo.clone(),
            ),
            content_service: ContentService::new(content_repo.clone(), course_repo.clone()),
            comment_service: CommentService::new(
                comment_repo.clone(),
                content_repo.clone(),
                course_repo.clone(),
                membership_repo.clone(),
            ),
            completion_service: CompletionService::new(
                completion_repo.clone(),
                content_repo.clone(),
                course_repo.clone(),
                membership_repo.clone(),
                user_repo.clone(),
            ),
            announcement_service: AnnouncementService::new(
                announcement_repo.clone(),
                course_repo.clone(),
            ),
            bookmark_service: BookmarkService::new(
                bookmark_repo,
                content_repo.clone(),
                course_repo.clone(),
            ),
            feedback_service: FeedbackService::new(feedback_repo.clone(), course_repo.clone()),
            analytics_service: AnalyticsService::new(
                user_repo,
                course_repo,
                membership_repo.clone(),
                content_repo,
                comment_repo.clone(),
                completion_repo,
                feedback_repo,
            ),
            admin_service: AdminService::new(membership_repo, comment_repo, announcement_repo),
        }
    }
}

/// Authentication middleware.
///
/// Resolves a `Bearer` token to its user and stores the user in the request
/// extensions. Requests without a valid token pass through anonymously; the
/// extractors decide whether that is acceptable.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(Authorization(bearer)) = req.headers().typed_get::<Authorization<Bearer>>() {
        match state.auth_service.authenticate_token(bearer.token()).await {
            Ok(user) => {
                req.extensions_mut().insert(user);
            }
            Err(e) => {
                tracing::debug!(error = %e, "Rejected bearer token");
            }
        }
    }

    next.run(req).await
}
