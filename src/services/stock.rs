use std::collections::BTreeMap;
use std::sync::Arc;

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;

use crate::{
    db::DbPool,
    entities::{allocation, allocation_line},
    errors::ServiceError,
    services::allocations::{AllocationRecord, AllocationService},
};

/// Per-item stock position for one identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StockItem {
    pub name: String,
    pub total: i64,
    pub used: i64,
    pub stock: i64,
}

/// `{stock[], assignments[]}` payload of the stock endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StockOverview {
    pub stock: Vec<StockItem>,
    pub assignments: Vec<AllocationRecord>,
}

#[derive(Clone)]
pub struct StockService {
    db_pool: Arc<DbPool>,
    allocations: AllocationService,
}

impl StockService {
    pub fn new(db_pool: Arc<DbPool>, allocations: AllocationService) -> Self {
        Self {
            db_pool,
            allocations,
        }
    }

    /// Fold every allocation line addressed to `emp_code` into per-item
    /// totals. The same employee can appear in several records for the same
    /// item (separate top-ups); totals merge rather than overwrite.
    #[instrument(skip(self))]
    pub async fn stock_summary(&self, emp_code: &str) -> Result<Vec<StockItem>, ServiceError> {
        let db = &*self.db_pool;
        let rows = allocation_line::Entity::find()
            .filter(allocation_line::Column::EmpCode.eq(emp_code))
            .find_also_related(allocation::Entity)
            .all(db)
            .await?;

        Ok(fold_stock(rows.into_iter().filter_map(|(line, header)| {
            header.map(|h| (h.item, line.qty, line.used_qty))
        })))
    }

    /// Records addressed to `emp_code`, newest first.
    #[instrument(skip(self))]
    pub async fn assignments_for(
        &self,
        emp_code: &str,
    ) -> Result<Vec<AllocationRecord>, ServiceError> {
        let mut headers = self.headers_with_line_for(emp_code).await?;
        headers.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        self.allocations.attach_lines(headers).await
    }

    /// Records addressed to `emp_code` OR created by them — the branch
    /// manager view, which shows received stock next to its own
    /// re-allocations.
    #[instrument(skip(self))]
    pub async fn assignments_received_or_created(
        &self,
        emp_code: &str,
    ) -> Result<Vec<AllocationRecord>, ServiceError> {
        let db = &*self.db_pool;
        let mut headers = self.headers_with_line_for(emp_code).await?;

        let created = allocation::Entity::find()
            .filter(allocation::Column::AssignedBy.eq(emp_code))
            .all(db)
            .await?;
        for header in created {
            if !headers.iter().any(|h| h.id == header.id) {
                headers.push(header);
            }
        }

        headers.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        self.allocations.attach_lines(headers).await
    }

    /// Full stock view for one identity.
    #[instrument(skip(self))]
    pub async fn overview(&self, emp_code: &str) -> Result<StockOverview, ServiceError> {
        Ok(StockOverview {
            stock: self.stock_summary(emp_code).await?,
            assignments: self.assignments_for(emp_code).await?,
        })
    }

    /// Branch-manager variant of [`overview`](Self::overview).
    #[instrument(skip(self))]
    pub async fn overview_received_or_created(
        &self,
        emp_code: &str,
    ) -> Result<StockOverview, ServiceError> {
        Ok(StockOverview {
            stock: self.stock_summary(emp_code).await?,
            assignments: self.assignments_received_or_created(emp_code).await?,
        })
    }

    async fn headers_with_line_for(
        &self,
        emp_code: &str,
    ) -> Result<Vec<allocation::Model>, ServiceError> {
        let db = &*self.db_pool;
        let rows = allocation_line::Entity::find()
            .filter(allocation_line::Column::EmpCode.eq(emp_code))
            .find_also_related(allocation::Entity)
            .all(db)
            .await?;

        let mut headers: Vec<allocation::Model> = Vec::new();
        for (_, header) in rows {
            if let Some(header) = header {
                if !headers.iter().any(|h| h.id == header.id) {
                    headers.push(header);
                }
            }
        }
        Ok(headers)
    }
}

/// Fold `(item, qty, used_qty)` triples into ordered per-item totals.
/// Accumulates in i64 so pathological line values cannot overflow the sums.
fn fold_stock(rows: impl Iterator<Item = (String, i32, i32)>) -> Vec<StockItem> {
    let mut by_item: BTreeMap<String, (i64, i64)> = BTreeMap::new();
    for (item, qty, used_qty) in rows {
        let entry = by_item.entry(item).or_insert((0, 0));
        entry.0 += qty.max(0) as i64;
        entry.1 += used_qty.max(0) as i64;
    }
    by_item
        .into_iter()
        .map(|(name, (total, used))| StockItem {
            name,
            total,
            used,
            stock: total - used,
        })
        .collect()
}
