//! Access policy.
//!
//! Every role check in the service layer goes through [`authorize`], which
//! maps an [`Action`] to a [`Rule`] and evaluates it against a [`Resource`].

use lms_common::{AppError, AppResult};
use lms_db::entities::{course, user};

/// An operation an actor wants to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateCourse,
    CompleteContent,
    ManageOwnBookmarks,
    ManageOwnFeedback,
    ViewOwnCompletions,
    ViewUserDashboard,
    ViewUserCompletedCourses,
    ViewCertificate,
    ViewCourseAnalytics,
    CreateContent,
    ListCourseCompletions,
    ManageAnnouncements,
    ListMembers,
    ModerateComment,
    BatchEnroll,
    SetEnrollmentLimit,
    CommentOnContent,
    AdminListing,
}

/// The predicate an action requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Any signed-in user.
    Authenticated,
    /// The user the resource belongs to, or staff.
    SelfOrStaff,
    /// The course's teacher, or staff.
    TeacherOrStaff,
    /// The course's teacher only.
    TeacherOnly,
    /// A member of the course.
    MemberOnly,
    /// Staff only.
    StaffOnly,
}

impl Action {
    /// The rule guarding this action.
    #[must_use]
    pub const fn rule(self) -> Rule {
        match self {
            Self::CreateCourse
            | Self::ManageOwnBookmarks
            | Self::ManageOwnFeedback
            | Self::ViewOwnCompletions => Rule::Authenticated,
            Self::ViewUserDashboard | Self::ViewUserCompletedCourses | Self::ViewCertificate => {
                Rule::SelfOrStaff
            }
            Self::ViewCourseAnalytics
            | Self::CreateContent
            | Self::ListCourseCompletions
            | Self::ManageAnnouncements
            | Self::ListMembers
            | Self::ModerateComment => Rule::TeacherOrStaff,
            Self::BatchEnroll | Self::SetEnrollmentLimit => Rule::TeacherOnly,
            Self::CompleteContent | Self::CommentOnContent => Rule::MemberOnly,
            Self::AdminListing => Rule::StaffOnly,
        }
    }
}

/// What the action is performed on.
#[derive(Debug, Clone, Copy)]
pub enum Resource<'a> {
    /// Nothing in particular.
    None,
    /// Data owned by the user with this ID.
    User(i32),
    /// A course.
    Course(&'a course::Model),
    /// A course, together with whether the actor holds a membership in it.
    Enrolled {
        course: &'a course::Model,
        is_member: bool,
    },
}

impl Resource<'_> {
    const fn course(&self) -> Option<&course::Model> {
        match self {
            Self::Course(course) | Self::Enrolled { course, .. } => Some(*course),
            Self::None | Self::User(_) => None,
        }
    }
}

impl Rule {
    /// Evaluate the rule for a signed-in actor.
    #[must_use]
    pub fn allows(self, actor: &user::Model, resource: &Resource<'_>) -> bool {
        let is_teacher = resource
            .course()
            .is_some_and(|course| course.teacher_id == actor.id);

        match self {
            Self::Authenticated => true,
            Self::SelfOrStaff => {
                actor.is_staff_member() || matches!(resource, Resource::User(id) if *id == actor.id)
            }
            Self::TeacherOrStaff => actor.is_staff_member() || is_teacher,
            Self::TeacherOnly => is_teacher,
            Self::MemberOnly => matches!(resource, Resource::Enrolled { is_member: true, .. }),
            Self::StaffOnly => actor.is_staff_member(),
        }
    }
}

/// Check that `actor` may perform `action` on `resource`.
///
/// Returns the actor on success. A missing actor is
/// [`AppError::Unauthorized`]; a failed rule is [`AppError::Forbidden`].
pub fn authorize<'u>(
    actor: Option<&'u user::Model>,
    action: Action,
    resource: Resource<'_>,
) -> AppResult<&'u user::Model> {
    let actor = actor.ok_or(AppError::Unauthorized)?;

    if action.rule().allows(actor, &resource) {
        Ok(actor)
    } else {
        tracing::debug!(user_id = actor.id, ?action, "Access denied");
        Err(AppError::Forbidden(forbidden_message(action).to_string()))
    }
}

const fn forbidden_message(action: Action) -> &'static str {
    match action.rule() {
        Rule::Authenticated => "Not allowed",
        Rule::SelfOrStaff => "Only the owner or staff can do this",
        Rule::TeacherOrStaff => "Only the course teacher or staff can do this",
        Rule::TeacherOnly => "Only the course teacher can do this",
        Rule::MemberOnly => "You are not a member of this course",
        Rule::StaffOnly => "Staff only",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(id: i32, is_staff: bool) -> user::Model {
        user::Model {
            id,
            username: format!("user{id}"),
            email: format!("user{id}@example.com"),
            password_hash: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            is_staff,
            is_superuser: false,
            created_at: Utc::now().into(),
        }
    }

    fn course(teacher_id: i32) -> course::Model {
        course::Model {
            id: 1,
            name: "Rust".to_string(),
            description: String::new(),
            price: 0,
            teacher_id,
            max_students: None,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_missing_actor_is_unauthorized() {
        let result = authorize(None, Action::CreateCourse, Resource::None);
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_teacher_only_rejects_staff() {
        let staff = user(2, true);
        let course = course(1);

        let result = authorize(Some(&staff), Action::BatchEnroll, Resource::Course(&course));
        assert!(matches!(result, Err(AppError::Forbidden(_))));

        let teacher = user(1, false);
        assert!(authorize(Some(&teacher), Action::BatchEnroll, Resource::Course(&course)).is_ok());
    }

    #[test]
    fn test_teacher_or_staff() {
        let course = course(1);

        let cases = [
            (user(1, false), true),
            (user(2, true), true),
            (user(3, false), false),
        ];
        for (actor, allowed) in cases {
            let result =
                authorize(Some(&actor), Action::ModerateComment, Resource::Course(&course));
            assert_eq!(result.is_ok(), allowed, "user {}", actor.id);
        }
    }

    #[test]
    fn test_self_or_staff() {
        let me = user(5, false);
        let staff = user(6, true);

        assert!(authorize(Some(&me), Action::ViewUserDashboard, Resource::User(5)).is_ok());
        assert!(authorize(Some(&me), Action::ViewUserDashboard, Resource::User(7)).is_err());
        assert!(authorize(Some(&staff), Action::ViewUserDashboard, Resource::User(7)).is_ok());
    }

    #[test]
    fn test_member_only_ignores_teacher_and_staff() {
        let course = course(1);
        let teacher = user(1, false);
        let staff = user(2, true);

        let not_member = Resource::Enrolled { course: &course, is_member: false };
        assert!(authorize(Some(&teacher), Action::CompleteContent, not_member).is_err());
        assert!(authorize(Some(&staff), Action::CompleteContent, not_member).is_err());

        let member = Resource::Enrolled { course: &course, is_member: true };
        assert!(authorize(Some(&user(9, false)), Action::CompleteContent, member).is_ok());
    }

    #[test]
    fn test_course_rule_without_course_is_forbidden() {
        let teacher = user(1, false);
        let result = authorize(Some(&teacher), Action::ListMembers, Resource::None);
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[test]
    fn test_superuser_counts_as_staff() {
        let mut root = user(4, false);
        root.is_superuser = true;
        assert!(authorize(Some(&root), Action::AdminListing, Resource::None).is_ok());
        assert!(authorize(Some(&user(8, false)), Action::AdminListing, Resource::None).is_err());
    }
}
