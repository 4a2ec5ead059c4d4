use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Per-recipient quantity line of an allocation, ordered by `position`.
/// `used_qty` moves only through the usage recorder's conditional update and
/// never exceeds `qty`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "allocation_lines")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub allocation_id: Uuid,
    pub position: i32,
    pub emp_code: String,
    pub emp_name: String,
    pub qty: i32,
    pub used_qty: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::allocation::Entity",
        from = "Column::AllocationId",
        to = "super::allocation::Column::Id"
    )]
    Allocation,
    #[sea_orm(has_many = "super::sample_usage::Entity")]
    SampleUsage,
}

impl Related<super::allocation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Allocation.def()
    }
}

impl Related<super::sample_usage::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SampleUsage.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn available(&self) -> i32 {
        (self.qty - self.used_qty).max(0)
    }
}
