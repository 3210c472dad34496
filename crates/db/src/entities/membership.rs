//! Course membership entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role of a member within a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(3))")]
pub enum MemberRole {
    /// Enrolled student.
    #[sea_orm(string_value = "std")]
    #[serde(rename = "std")]
    Student,
    /// Teaching assistant.
    #[sea_orm(string_value = "ast")]
    #[serde(rename = "ast")]
    Assistant,
}

impl Default for MemberRole {
    fn default() -> Self {
        Self::Student
    }
}

/// Membership - tracks which users are enrolled in which courses.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "membership")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(indexed)]
    pub course_id: i32,

    #[sea_orm(indexed)]
    pub user_id: i32,

    pub role: MemberRole,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id",
        on_delete = "Restrict"
    )]
    Course,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Restrict"
    )]
    User,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_format() {
        assert_eq!(serde_json::to_value(MemberRole::Student).unwrap(), "std");
        assert_eq!(serde_json::to_value(MemberRole::Assistant).unwrap(), "ast");
        assert_eq!(MemberRole::default(), MemberRole::Student);
    }
}
