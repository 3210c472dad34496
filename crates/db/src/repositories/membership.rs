//! Membership repository.

use std::sync::Arc;

use chrono::Utc;
use lms_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

use crate::entities::{Membership, membership, membership::MemberRole};

/// Repository for course membership operations.
#[derive(Clone)]
pub struct MembershipRepository {
    db: Arc<DatabaseConnection>,
}

impl MembershipRepository {
    /// Create a new membership repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the membership of a user in a course.
    pub async fn find(&self, course_id: i32, user_id: i32) -> AppResult<Option<membership::Model>> {
        Membership::find()
            .filter(membership::Column::CourseId.eq(course_id))
            .filter(membership::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check if a user is a member of a course.
    pub async fn is_member(&self, course_id: i32, user_id: i32) -> AppResult<bool> {
        Ok(self.find(course_id, user_id).await?.is_some())
    }

    /// Count members of a course.
    pub async fn count_by_course(&self, course_id: i32) -> AppResult<u64> {
        Membership::find()
            .filter(membership::Column::CourseId.eq(course_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List members of a course in enrollment order.
    pub async fn find_by_course(&self, course_id: i32) -> AppResult<Vec<membership::Model>> {
        Membership::find()
            .filter(membership::Column::CourseId.eq(course_id))
            .order_by_asc(membership::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count memberships of a user with a given role.
    pub async fn count_by_user_and_role(&self, user_id: i32, role: MemberRole) -> AppResult<u64> {
        Membership::find()
            .filter(membership::Column::UserId.eq(user_id))
            .filter(membership::Column::Role.eq(role))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List memberships filtered by course and/or role (for admin).
    pub async fn find_filtered(
        &self,
        course_id: Option<i32>,
        role: Option<MemberRole>,
    ) -> AppResult<Vec<membership::Model>> {
        let mut query = Membership::find();

        if let Some(course_id) = course_id {
            query = query.filter(membership::Column::CourseId.eq(course_id));
        }
        if let Some(role) = role {
            query = query.filter(membership::Column::Role.eq(role));
        }

        query
            .order_by_asc(membership::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Enroll users as students in one transaction, skipping existing members.
    ///
    /// Returns the number of memberships created.
    pub async fn enroll_students(&self, course_id: i32, user_ids: &[i32]) -> AppResult<u64> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut created = 0;
        for &user_id in user_ids {
            let existing = Membership::find()
                .filter(membership::Column::CourseId.eq(course_id))
                .filter(membership::Column::UserId.eq(user_id))
                .one(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

            if existing.is_some() {
                continue;
            }

            let now = Utc::now();
            membership::ActiveModel {
                course_id: Set(course_id),
                user_id: Set(user_id),
                role: Set(MemberRole::Student),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

            created += 1;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(created)
    }
}
