//! Create note table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Note::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Note::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Note::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Note::UserHost).string_len(256))
                    .col(ColumnDef::new(Note::Text).text())
                    .col(ColumnDef::new(Note::Cw).string_len(512))
                    .col(ColumnDef::new(Note::Visibility).string_len(16).not_null().default("public"))
                    .col(ColumnDef::new(Note::ReplyId).string_len(32))
                    .col(ColumnDef::new(Note::RenoteId).string_len(32))
                    .col(ColumnDef::new(Note::FileIds).json_binary().not_null().default("[]"))
                    .col(
                        ColumnDef::new(Note::AttachedFileTypes)
                            .json_binary()
                            .not_null()
                            .default("[]"),
                    )
                    .col(ColumnDef::new(Note::RepliesCount).integer().not_null().default(0))
                    .col(ColumnDef::new(Note::RenoteCount).integer().not_null().default(0))
                    .col(ColumnDef::new(Note::ReactionCount).integer().not_null().default(0))
                    .col(ColumnDef::new(Note::Uri).string_len(1024))
                    .col(
                        ColumnDef::new(Note::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Note::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_note_user")
                            .from(Note::Table, Note::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_note_user_id")
                    .table(Note::Table)
                    .col(Note::UserId)
                    .to_owned(),
            )
            .await?;

        // GIN index for attachment type containment checks
        manager
            .get_connection()
            .execute_unprepared(
                r#"CREATE INDEX IF NOT EXISTS "idx_note_attached_file_types" ON "note" USING GIN ("attached_file_types")"#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Note::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Note {
    Table,
    Id,
    UserId,
    UserHost,
    Text,
    Cw,
    Visibility,
    ReplyId,
    RenoteId,
    FileIds,
    AttachedFileTypes,
    RepliesCount,
    RenoteCount,
    ReactionCount,
    Uri,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
