//! Create metadata table for turn artifacts.

use sea_orm_migration::prelude::*;

use super::m20241001_000003_create_turns::Turn;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Metadata::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Metadata::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Metadata::TurnId).big_integer())
                    .col(ColumnDef::new(Metadata::Path).string().not_null())
                    .col(
                        ColumnDef::new(Metadata::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Metadata::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Metadata::Table, Metadata::TurnId)
                            .to(Turn::Table, Turn::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Upserts conflict on turn_id; NULLs (orphans) never collide.
        manager
            .create_index(
                Index::create()
                    .name("idx_metadata_turn_id")
                    .table(Metadata::Table)
                    .col(Metadata::TurnId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_metadata_path")
                    .table(Metadata::Table)
                    .col(Metadata::Path)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Metadata::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Metadata {
    Table,
    Id,
    TurnId,
    Path,
    CreatedAt,
    UpdatedAt,
}
