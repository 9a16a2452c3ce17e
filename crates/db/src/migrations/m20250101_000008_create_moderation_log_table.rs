//! Create moderation log table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ModerationLog::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ModerationLog::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ModerationLog::ModeratorId).string_len(32).not_null())
                    .col(ColumnDef::new(ModerationLog::Type).string_len(128).not_null())
                    .col(ColumnDef::new(ModerationLog::Info).json_binary().not_null())
                    .col(
                        ColumnDef::new(ModerationLog::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_moderation_log_moderator")
                            .from(ModerationLog::Table, ModerationLog::ModeratorId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_moderation_log_moderator_id")
                    .table(ModerationLog::Table)
                    .col(ModerationLog::ModeratorId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ModerationLog::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ModerationLog {
    Table,
    Id,
    ModeratorId,
    Type,
    Info,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
