//! Enrollment service.
//!
//! Batch enrollment checks the course capacity once, before any membership
//! is written. A batch that starts below the limit is enrolled in full even
//! if it takes the course past `max_students`.

use std::collections::BTreeSet;

use lms_common::{AppError, AppResult};
use lms_db::{
    entities::{membership, user},
    repositories::{CourseRepository, MembershipRepository, UserRepository},
};
use serde::Deserialize;
use tracing::info;

use super::policy::{self, Action, Resource};

/// Input for batch enrollment.
#[derive(Debug, Deserialize)]
pub struct BatchEnrollInput {
    pub user_ids: Vec<i32>,
}

/// Service for course enrollment.
#[derive(Clone)]
pub struct EnrollmentService {
    course_repo: CourseRepository,
    membership_repo: MembershipRepository,
    user_repo: UserRepository,
}

impl EnrollmentService {
    /// Create a new enrollment service.
    #[must_use]
    pub const fn new(
        course_repo: CourseRepository,
        membership_repo: MembershipRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            course_repo,
            membership_repo,
            user_repo,
        }
    }

    /// Enroll a set of users as students of a course.
    ///
    /// Returns the number of memberships created. Users who are already
    /// members are skipped.
    pub async fn batch_enroll(
        &self,
        actor: &user::Model,
        course_id: i32,
        user_ids: &[i32],
    ) -> AppResult<u64> {
        let course = self.course_repo.get_by_id(course_id).await?;
        policy::authorize(Some(actor), Action::BatchEnroll, Resource::Course(&course))?;

        let user_ids: Vec<i32> = user_ids
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let found = self.user_repo.find_by_ids(&user_ids).await?;
        if let Some(missing) = user_ids
            .iter()
            .find(|id| !found.iter().any(|user| user.id == **id))
        {
            return Err(AppError::NotFound(format!("User not found: {missing}")));
        }

        // A negative cap is treated as no cap.
        if let Some(max_students) = course.max_students.filter(|max| *max >= 0) {
            let current = self.membership_repo.count_by_course(course_id).await?;
            if current >= max_students as u64 {
                return Err(AppError::CapacityExceeded(format!(
                    "Course {course_id} is full ({current}/{max_students})"
                )));
            }
        }

        let enrolled = self
            .membership_repo
            .enroll_students(course_id, &user_ids)
            .await?;

        info!(course_id, requested = user_ids.len(), enrolled, "Batch enrollment completed");

        Ok(enrolled)
    }

    /// List the members of a course.
    pub async fn list_members(
        &self,
        actor: &user::Model,
        course_id: i32,
    ) -> AppResult<Vec<membership::Model>> {
        let course = self.course_repo.get_by_id(course_id).await?;
        policy::authorize(Some(actor), Action::ListMembers, Resource::Course(&course))?;

        self.membership_repo.find_by_course(course_id).await
    }
}
