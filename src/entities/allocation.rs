use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Allocation header. One row per allocation document; re-allocations down the
/// hierarchy insert new rows carrying the ancestor chain ids forward. Rows are
/// never deleted, so the table doubles as the audit trail.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "allocations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Lineage id minted at the topmost allocation; immutable once set.
    pub root_id: String,
    pub rm_id: Option<String>,
    pub bm_id: Option<String>,
    pub manager_id: Option<String>,
    pub item: String,
    pub purpose: String,
    /// Closed classification of `purpose`; the dispatch gate reads this, not
    /// the free text.
    pub purpose_tag: String,
    pub assigned_by: String,
    pub assigned_role: String,
    pub region: String,
    pub branch: String,
    pub to_vendor: bool,
    pub dispatched_at: Option<DateTime>,
    pub lr_no: Option<String>,
    pub lr_updated_at: Option<DateTime>,
    pub allocated_on: Date,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::allocation_line::Entity")]
    AllocationLine,
}

impl Related<super::allocation_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AllocationLine.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
