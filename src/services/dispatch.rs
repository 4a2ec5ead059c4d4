use std::sync::Arc;

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder};
use tracing::instrument;

use crate::{
    db::DbPool,
    entities::allocation,
    errors::ServiceError,
    events::{Event, EventSender},
    purpose::PurposeTag,
    services::allocations::{AllocationRecord, AllocationService},
};

/// The single chain key a lineage-wide LR annotation applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineageKey {
    Bm(String),
    Rm(String),
    Root(String),
}

#[derive(Clone)]
pub struct DispatchService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
    allocations: AllocationService,
}

impl DispatchService {
    pub fn new(
        db_pool: Arc<DbPool>,
        event_sender: EventSender,
        allocations: AllocationService,
    ) -> Self {
        Self {
            db_pool,
            event_sender,
            allocations,
        }
    }

    /// All records whose lineage contains `chain_id`, whichever level the id
    /// was minted at.
    #[instrument(skip(self))]
    pub async fn resolve_lineage(
        &self,
        chain_id: &str,
    ) -> Result<Vec<allocation::Model>, ServiceError> {
        let db = &*self.db_pool;
        Ok(allocation::Entity::find()
            .filter(lineage_condition(chain_id))
            .order_by_desc(allocation::Column::CreatedAt)
            .all(db)
            .await?)
    }

    /// Mark a lineage as handed off to the vendor.
    ///
    /// All-or-nothing gate: at least one record in the resolved set must
    /// carry a project or marketing purpose, otherwise nothing is mutated.
    /// `to_vendor` is monotonic; re-dispatching an already dispatched
    /// lineage only refreshes the dispatch timestamp.
    #[instrument(skip(self))]
    pub async fn dispatch(&self, chain_id: &str) -> Result<u64, ServiceError> {
        let records = self.resolve_lineage(chain_id).await?;
        if records.is_empty() {
            return Err(ServiceError::NotFound(format!(
                "no allocation lineage found for {}",
                chain_id
            )));
        }

        if !records.iter().any(vendor_eligible) {
            return Err(ServiceError::Validation(
                "lineage has no allocation with a project or marketing purpose".into(),
            ));
        }

        let db = &*self.db_pool;
        let now = Utc::now().naive_utc();
        let result = allocation::Entity::update_many()
            .col_expr(allocation::Column::ToVendor, Expr::value(true))
            .col_expr(allocation::Column::DispatchedAt, Expr::value(now))
            .filter(lineage_condition(chain_id))
            .exec(db)
            .await?;

        self.event_sender
            .send(Event::LineageDispatched {
                chain_id: chain_id.to_string(),
                records: result.rows_affected,
            })
            .await;

        Ok(result.rows_affected)
    }

    /// Apply a vendor LR number to the finest-grained lineage level that
    /// exists under `root_id`. Sibling sub-lineages sharing only the common
    /// root are untouched when a finer key exists.
    #[instrument(skip(self))]
    pub async fn annotate_lr(&self, root_id: &str, lr_no: &str) -> Result<u64, ServiceError> {
        let lr_no = lr_no.trim();
        if lr_no.is_empty() {
            return Err(ServiceError::Validation("lr_no is required".into()));
        }

        let db = &*self.db_pool;
        let records = allocation::Entity::find()
            .filter(allocation::Column::RootId.eq(root_id))
            .order_by_desc(allocation::Column::CreatedAt)
            .all(db)
            .await?;
        if records.is_empty() {
            return Err(ServiceError::NotFound(format!(
                "no allocation lineage found for {}",
                root_id
            )));
        }

        let key = most_specific_key(&records);
        let key_filter = match &key {
            LineageKey::Bm(id) => allocation::Column::BmId.eq(id.as_str()),
            LineageKey::Rm(id) => allocation::Column::RmId.eq(id.as_str()),
            LineageKey::Root(id) => allocation::Column::RootId.eq(id.as_str()),
        };

        let now = Utc::now().naive_utc();
        let result = allocation::Entity::update_many()
            .col_expr(allocation::Column::LrNo, Expr::value(lr_no))
            .col_expr(allocation::Column::LrUpdatedAt, Expr::value(now))
            .filter(key_filter)
            .exec(db)
            .await?;

        self.event_sender
            .send(Event::LrAnnotated {
                chain_id: root_id.to_string(),
                lr_no: lr_no.to_string(),
                records: result.rows_affected,
            })
            .await;

        Ok(result.rows_affected)
    }

    /// Records eligible for vendor fulfillment: dispatched AND classified as
    /// project or marketing. Newest first.
    #[instrument(skip(self))]
    pub async fn vendor_list(&self) -> Result<Vec<AllocationRecord>, ServiceError> {
        let db = &*self.db_pool;
        let headers = allocation::Entity::find()
            .filter(allocation::Column::ToVendor.eq(true))
            .filter(
                allocation::Column::PurposeTag.is_in([
                    PurposeTag::Project.as_str(),
                    PurposeTag::Marketing.as_str(),
                ]),
            )
            .order_by_desc(allocation::Column::CreatedAt)
            .all(db)
            .await?;
        self.allocations.attach_lines(headers).await
    }
}

/// Union match over every chain column: a lineage member carries the queried
/// id at whichever level it was minted.
fn lineage_condition(chain_id: &str) -> Condition {
    Condition::any()
        .add(allocation::Column::RootId.eq(chain_id))
        .add(allocation::Column::RmId.eq(chain_id))
        .add(allocation::Column::BmId.eq(chain_id))
}

fn vendor_eligible(record: &allocation::Model) -> bool {
    record
        .purpose_tag
        .parse::<PurposeTag>()
        .map(PurposeTag::vendor_eligible)
        .unwrap_or(false)
}

/// Pick the finest-grained chain key present in a lineage. `records` must be
/// ordered newest first; the newest row carrying a given level wins, so the
/// key tracks the level created last in normal flow.
fn most_specific_key(records: &[allocation::Model]) -> LineageKey {
    if let Some(id) = records
        .iter()
        .filter_map(|r| r.bm_id.as_deref())
        .find(|id| !id.trim().is_empty())
    {
        return LineageKey::Bm(id.to_string());
    }
    if let Some(id) = records
        .iter()
        .filter_map(|r| r.rm_id.as_deref())
        .find(|id| !id.trim().is_empty())
    {
        return LineageKey::Rm(id.to_string());
    }
    LineageKey::Root(records[0].root_id.clone())
}
