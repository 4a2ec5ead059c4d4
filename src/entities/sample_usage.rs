use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Append-only consumption entry: a quantity of samples handed to a customer
/// against one allocation line.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "sample_usages")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub line_id: Uuid,
    pub customer_id: String,
    pub qty: i32,
    pub used_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::allocation_line::Entity",
        from = "Column::LineId",
        to = "super::allocation_line::Column::Id"
    )]
    AllocationLine,
}

impl Related<super::allocation_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AllocationLine.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
