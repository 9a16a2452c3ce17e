//! Create drive file table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DriveFile::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(DriveFile::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(DriveFile::UserId).string_len(32))
                    .col(ColumnDef::new(DriveFile::UserHost).string_len(256))
                    .col(ColumnDef::new(DriveFile::Name).string_len(256).not_null())
                    .col(ColumnDef::new(DriveFile::ContentType).string_len(128).not_null())
                    .col(ColumnDef::new(DriveFile::Size).big_integer().not_null().default(0))
                    .col(ColumnDef::new(DriveFile::Url).string_len(1024).not_null())
                    .col(ColumnDef::new(DriveFile::WebpublicUrl).string_len(1024))
                    .col(ColumnDef::new(DriveFile::WebpublicType).string_len(128))
                    .col(ColumnDef::new(DriveFile::IsSensitive).boolean().not_null().default(false))
                    .col(ColumnDef::new(DriveFile::IsLink).boolean().not_null().default(false))
                    .col(ColumnDef::new(DriveFile::Uri).string_len(1024))
                    .col(
                        ColumnDef::new(DriveFile::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_drive_file_user")
                            .from(DriveFile::Table, DriveFile::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_drive_file_user_id")
                    .table(DriveFile::Table)
                    .col(DriveFile::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DriveFile::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum DriveFile {
    Table,
    Id,
    UserId,
    UserHost,
    Name,
    ContentType,
    Size,
    Url,
    WebpublicUrl,
    WebpublicType,
    IsSensitive,
    IsLink,
    Uri,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
