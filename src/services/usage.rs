use std::sync::Arc;

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionError,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    db::DbPool,
    entities::{allocation, allocation_line, sample_usage},
    errors::ServiceError,
    events::{Event, EventSender},
    ids::SharedIdGenerator,
    services::allocations::{AllocationRecord, AllocationService},
};

/// Request to deduct consumed samples from one allocation line.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecordUsageInput {
    pub allocation_id: Uuid,
    pub emp_code: String,
    pub customer_id: String,
    pub qty: i32,
}

#[derive(Clone)]
pub struct UsageService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
    ids: SharedIdGenerator,
    allocations: AllocationService,
}

impl UsageService {
    pub fn new(
        db_pool: Arc<DbPool>,
        event_sender: EventSender,
        ids: SharedIdGenerator,
        allocations: AllocationService,
    ) -> Self {
        Self {
            db_pool,
            event_sender,
            ids,
            allocations,
        }
    }

    /// Deduct `qty` from the line `(allocation_id, emp_code)` and append the
    /// audit entry.
    ///
    /// The availability check and the increment are one conditional UPDATE
    /// (`used_qty <= qty_allocated - requested` evaluated server-side), so
    /// two concurrent submissions against the same line cannot both pass and
    /// overdraw. The allocated `qty` of a line is immutable after creation,
    /// which is what makes the precomputed bound sound.
    #[instrument(skip(self))]
    pub async fn record_usage(
        &self,
        input: RecordUsageInput,
    ) -> Result<AllocationRecord, ServiceError> {
        if input.qty <= 0 {
            return Err(ServiceError::Validation("qty must be positive".into()));
        }
        if input.customer_id.trim().is_empty() {
            return Err(ServiceError::Validation("customer_id is required".into()));
        }

        let db = &*self.db_pool;

        allocation::Entity::find_by_id(input.allocation_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("allocation {} not found", input.allocation_id))
            })?;

        let line = allocation_line::Entity::find()
            .filter(allocation_line::Column::AllocationId.eq(input.allocation_id))
            .filter(allocation_line::Column::EmpCode.eq(input.emp_code.as_str()))
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "no allocation line for employee {} on allocation {}",
                    input.emp_code, input.allocation_id
                ))
            })?;

        if line.available() <= 0 {
            return Err(ServiceError::Validation(format!(
                "no available stock left on this line for {}",
                input.emp_code
            )));
        }
        if input.qty > line.available() {
            return Err(ServiceError::Validation(format!(
                "requested quantity {} exceeds available stock {}",
                input.qty,
                line.available()
            )));
        }

        let usage_id = self.ids.record_id();
        let line_id = line.id;
        let allocated = line.qty;
        let requested = input.qty;
        let customer_id = input.customer_id.trim().to_string();

        db.transaction::<_, (), ServiceError>(move |txn| {
            Box::pin(async move {
                // The race guard: increment only if the post-increment value
                // stays within the allocation.
                let update = allocation_line::Entity::update_many()
                    .col_expr(
                        allocation_line::Column::UsedQty,
                        Expr::col(allocation_line::Column::UsedQty).add(requested),
                    )
                    .filter(allocation_line::Column::Id.eq(line_id))
                    .filter(allocation_line::Column::UsedQty.lte(allocated - requested))
                    .exec(txn)
                    .await?;

                if update.rows_affected == 0 {
                    return Err(ServiceError::Validation(
                        "requested quantity exceeds available stock".into(),
                    ));
                }

                sample_usage::ActiveModel {
                    id: Set(usage_id),
                    line_id: Set(line_id),
                    customer_id: Set(customer_id),
                    qty: Set(requested),
                    used_at: Set(Utc::now().naive_utc()),
                }
                .insert(txn)
                .await?;

                Ok(())
            })
        })
        .await
        .map_err(|e| match e {
            TransactionError::Connection(db_err) => ServiceError::Database(db_err),
            TransactionError::Transaction(service_err) => service_err,
        })?;

        self.event_sender
            .send(Event::SampleUsageRecorded {
                allocation_id: input.allocation_id,
                emp_code: input.emp_code.clone(),
                customer_id: input.customer_id.trim().to_string(),
                qty: input.qty,
            })
            .await;

        self.allocations.get(input.allocation_id).await
    }

    /// Usage entries recorded against one line, oldest first.
    #[instrument(skip(self))]
    pub async fn usage_for_line(
        &self,
        line_id: Uuid,
    ) -> Result<Vec<sample_usage::Model>, ServiceError> {
        use sea_orm::QueryOrder;
        let db = &*self.db_pool;
        Ok(sample_usage::Entity::find()
            .filter(sample_usage::Column::LineId.eq(line_id))
            .order_by_asc(sample_usage::Column::UsedAt)
            .all(db)
            .await?)
    }
}
