//! Test utilities for database operations.
//!
//! Provides an in-memory SQLite database with every migration applied, plus
//! small seeding helpers for the core tables.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, DbErr, Set,
};
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;
use tracing::info;

use crate::entities::{content, course, membership, membership::MemberRole, user};
use crate::migrations::Migrator;

/// In-memory SQLite URL.
pub const SQLITE_MEMORY_URL: &str = "sqlite::memory:";

/// A test database context backed by in-memory SQLite.
pub struct TestDatabase {
    /// Database connection.
    pub conn: Arc<DatabaseConnection>,
}

impl TestDatabase {
    /// Create a fresh database and run all migrations.
    ///
    /// The pool is pinned to a single connection: every in-memory SQLite
    /// connection opens its own empty database.
    pub async fn new() -> Result<Self, DbErr> {
        let mut opt = ConnectOptions::new(SQLITE_MEMORY_URL);
        opt.max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;
        Migrator::up(&conn, None).await?;

        info!("Created in-memory test database");

        Ok(Self {
            conn: Arc::new(conn),
        })
    }

    /// Get the database connection.
    #[must_use]
    pub fn connection(&self) -> Arc<DatabaseConnection> {
        Arc::clone(&self.conn)
    }

    /// Insert a user with a placeholder password hash.
    pub async fn create_user(&self, username: &str, is_staff: bool) -> Result<user::Model, DbErr> {
        user::ActiveModel {
            username: Set(username.to_string()),
            email: Set(format!("{username}@example.com")),
            password_hash: Set("not-a-real-hash".to_string()),
            first_name: Set(String::new()),
            last_name: Set(String::new()),
            is_staff: Set(is_staff),
            is_superuser: Set(false),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(self.conn.as_ref())
        .await
    }

    /// Insert a course owned by `teacher_id`.
    pub async fn create_course(
        &self,
        teacher_id: i32,
        name: &str,
        max_students: Option<i32>,
    ) -> Result<course::Model, DbErr> {
        let now = Utc::now();
        course::ActiveModel {
            name: Set(name.to_string()),
            description: Set(format!("About {name}")),
            price: Set(0),
            teacher_id: Set(teacher_id),
            max_students: Set(max_students),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        }
        .insert(self.conn.as_ref())
        .await
    }

    /// Insert a content item into a course.
    pub async fn create_content(
        &self,
        course_id: i32,
        name: &str,
        release_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    ) -> Result<content::Model, DbErr> {
        let now = Utc::now();
        content::ActiveModel {
            course_id: Set(course_id),
            parent_id: Set(None),
            name: Set(name.to_string()),
            description: Set("-".to_string()),
            video_url: Set(None),
            file_attachment: Set(None),
            release_date: Set(release_date.map(Into::into)),
            end_date: Set(end_date.map(Into::into)),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        }
        .insert(self.conn.as_ref())
        .await
    }

    /// Insert a membership directly, bypassing enrollment rules.
    pub async fn create_membership(
        &self,
        course_id: i32,
        user_id: i32,
        role: MemberRole,
    ) -> Result<membership::Model, DbErr> {
        let now = Utc::now();
        membership::ActiveModel {
            course_id: Set(course_id),
            user_id: Set(user_id),
            role: Set(role),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        }
        .insert(self.conn.as_ref())
        .await
    }
}
