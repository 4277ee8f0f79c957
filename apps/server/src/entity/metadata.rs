//! Artifact metadata entity for SeaORM.
//!
//! Catalogs the archive stored on disk for a turn. The turn reference is
//! nullable: deleting a turn sets it to NULL and leaves the row (and the
//! file) in place until the cleanup service reclaims it.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "metadata")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub turn_id: Option<i64>,
    #[sea_orm(unique)]
    pub path: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::turn::Entity",
        from = "Column::TurnId",
        to = "super::turn::Column::Id",
        on_delete = "SetNull"
    )]
    Turn,
}

impl Related<super::turn::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Turn.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
