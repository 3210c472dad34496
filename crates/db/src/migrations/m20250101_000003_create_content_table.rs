//! Create content and comment tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Content::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Content::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Content::CourseId).integer().not_null())
                    .col(ColumnDef::new(Content::ParentId).integer())
                    .col(ColumnDef::new(Content::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Content::Description)
                            .text()
                            .not_null()
                            .default("-"),
                    )
                    .col(ColumnDef::new(Content::VideoUrl).string_len(200))
                    .col(ColumnDef::new(Content::FileAttachment).string_len(255))
                    .col(ColumnDef::new(Content::ReleaseDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(Content::EndDate).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Content::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Content::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_content_course")
                            .from(Content::Table, Content::CourseId)
                            .to(Course::Table, Course::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_content_parent")
                            .from(Content::Table, Content::ParentId)
                            .to(Content::Table, Content::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_content_course_id")
                    .table(Content::Table)
                    .col(Content::CourseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Comment::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Comment::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Comment::ContentId).integer().not_null())
                    .col(ColumnDef::new(Comment::MemberId).integer().not_null())
                    .col(ColumnDef::new(Comment::Comment).text().not_null())
                    .col(
                        ColumnDef::new(Comment::IsModerated)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Comment::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Comment::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comment_content")
                            .from(Comment::Table, Comment::ContentId)
                            .to(Content::Table, Content::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comment_member")
                            .from(Comment::Table, Comment::MemberId)
                            .to(Membership::Table, Membership::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (content_id, is_moderated) for the public listing
        manager
            .create_index(
                Index::create()
                    .name("idx_comment_content_moderated")
                    .table(Comment::Table)
                    .col(Comment::ContentId)
                    .col(Comment::IsModerated)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Comment::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Content::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Content {
    Table,
    Id,
    CourseId,
    ParentId,
    Name,
    Description,
    VideoUrl,
    FileAttachment,
    ReleaseDate,
    EndDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Comment {
    Table,
    Id,
    ContentId,
    MemberId,
    Comment,
    IsModerated,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Course {
    Table,
    Id,
}

#[derive(Iden)]
enum Membership {
    Table,
    Id,
}
