//! Create meta settings table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MetaSettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MetaSettings::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MetaSettings::Name).string_len(256))
                    .col(ColumnDef::new(MetaSettings::Description).text())
                    .col(ColumnDef::new(MetaSettings::MaintainerName).string_len(256))
                    .col(ColumnDef::new(MetaSettings::MaintainerEmail).string_len(256))
                    .col(
                        ColumnDef::new(MetaSettings::SecureMode)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(MetaSettings::PrivateMode)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(MetaSettings::BlockedHosts)
                            .json_binary()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(MetaSettings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(MetaSettings::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MetaSettings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum MetaSettings {
    Table,
    Id,
    Name,
    Description,
    MaintainerName,
    MaintainerEmail,
    SecureMode,
    PrivateMode,
    BlockedHosts,
    CreatedAt,
    UpdatedAt,
}
