//! Create content_completion and course_completion tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ContentCompletion::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ContentCompletion::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ContentCompletion::UserId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ContentCompletion::ContentId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ContentCompletion::CompletionDate)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_content_completion_user")
                            .from(ContentCompletion::Table, ContentCompletion::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_content_completion_content")
                            .from(ContentCompletion::Table, ContentCompletion::ContentId)
                            .to(Content::Table, Content::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (user_id, content_id) - a content is completed once
        manager
            .create_index(
                Index::create()
                    .name("idx_content_completion_user_content")
                    .table(ContentCompletion::Table)
                    .col(ContentCompletion::UserId)
                    .col(ContentCompletion::ContentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CourseCompletion::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CourseCompletion::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CourseCompletion::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(CourseCompletion::CourseId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CourseCompletion::CompletionDate)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_completion_user")
                            .from(CourseCompletion::Table, CourseCompletion::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_completion_course")
                            .from(CourseCompletion::Table, CourseCompletion::CourseId)
                            .to(Course::Table, Course::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (user_id, course_id) - a course is completed once
        manager
            .create_index(
                Index::create()
                    .name("idx_course_completion_user_course")
                    .table(CourseCompletion::Table)
                    .col(CourseCompletion::UserId)
                    .col(CourseCompletion::CourseId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CourseCompletion::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ContentCompletion::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ContentCompletion {
    Table,
    Id,
    UserId,
    ContentId,
    CompletionDate,
}

#[derive(Iden)]
enum CourseCompletion {
    Table,
    Id,
    UserId,
    CourseId,
    CompletionDate,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum Content {
    Table,
    Id,
}

#[derive(Iden)]
enum Course {
    Table,
    Id,
}
