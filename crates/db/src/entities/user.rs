//! User entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub username: String,

    #[sea_orm(unique)]
    pub email: String,

    /// Argon2 PHC string
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub first_name: String,

    pub last_name: String,

    #[sea_orm(default_value = false)]
    pub is_staff: bool,

    #[sea_orm(default_value = false)]
    pub is_superuser: bool,

    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// Staff accounts and superusers bypass per-course ownership checks.
    #[must_use]
    pub const fn is_staff_member(&self) -> bool {
        self.is_staff || self.is_superuser
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::course::Entity")]
    Course,
    #[sea_orm(has_many = "super::membership::Entity")]
    Membership,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::membership::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Membership.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(is_staff: bool, is_superuser: bool) -> Model {
        Model {
            id: 1,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "hash".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            is_staff,
            is_superuser,
            created_at: Utc::now().fixed_offset(),
        }
    }

    #[test]
    fn test_staff_predicate() {
        assert!(!user(false, false).is_staff_member());
        assert!(user(true, false).is_staff_member());
        assert!(user(false, true).is_staff_member());
    }

    #[test]
    fn test_password_hash_is_not_serialized() {
        let json = serde_json::to_value(user(false, false)).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "alice");
    }
}
