//! Create rounds table.

use sea_orm_migration::prelude::*;

use super::m20241001_000001_create_games::Game;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Round::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Round::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Round::GameId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Round::Order)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Round::TestClassId).string().not_null())
                    .col(ColumnDef::new(Round::StartedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Round::ClosedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Round::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Round::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Round::Table, Round::GameId)
                            .to(Game::Table, Game::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Not unique: renumbering after a delete shifts orders one row at a time.
        manager
            .create_index(
                Index::create()
                    .name("idx_rounds_game_order")
                    .table(Round::Table)
                    .col(Round::GameId)
                    .col(Round::Order)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Round::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Round {
    #[sea_orm(iden = "rounds")]
    Table,
    Id,
    GameId,
    Order,
    TestClassId,
    StartedAt,
    ClosedAt,
    CreatedAt,
    UpdatedAt,
}
