//! Create turns table.

use sea_orm_migration::prelude::*;

use super::m20241001_000002_create_rounds::Round;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Turn::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Turn::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Turn::RoundId).big_integer().not_null())
                    .col(ColumnDef::new(Turn::PlayerId).big_integer().not_null())
                    .col(ColumnDef::new(Turn::Scores).text())
                    .col(
                        ColumnDef::new(Turn::IsWinner)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Turn::StartedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Turn::ClosedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Turn::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Turn::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Turn::Table, Turn::RoundId)
                            .to(Round::Table, Round::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_turns_round_player")
                    .table(Turn::Table)
                    .col(Turn::RoundId)
                    .col(Turn::PlayerId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Turn::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Turn {
    #[sea_orm(iden = "turns")]
    Table,
    Id,
    RoundId,
    PlayerId,
    Scores,
    IsWinner,
    StartedAt,
    ClosedAt,
    CreatedAt,
    UpdatedAt,
}
