use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, EntityTrait, LoaderTrait, QueryOrder, Set, TransactionError,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    db::DbPool,
    entities::{allocation, allocation_line},
    errors::ServiceError,
    events::{Event, EventSender},
    ids::{ChainLevel, SharedIdGenerator},
    purpose::PurposeTag,
};

/// One recipient line of an allocation request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmployeeLineInput {
    pub emp_code: String,
    #[serde(default)]
    pub name: String,
    pub qty: i32,
}

/// Fields shared by every allocation level.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewAllocation {
    pub item: String,
    #[serde(default)]
    pub purpose: String,
    pub employees: Vec<EmployeeLineInput>,
}

/// Chain ids carried forward from the parent allocation; read from the
/// request body, never looked up.
#[derive(Debug, Clone, Default)]
pub struct ChainIds {
    pub rm_id: Option<String>,
    pub bm_id: Option<String>,
}

/// Allocation header together with its ordered recipient lines — the wire
/// rendering of one allocation record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AllocationRecord {
    #[serde(flatten)]
    pub allocation: allocation::Model,
    pub employees: Vec<allocation_line::Model>,
}

#[derive(Clone)]
pub struct AllocationService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
    ids: SharedIdGenerator,
}

impl AllocationService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender, ids: SharedIdGenerator) -> Self {
        Self {
            db_pool,
            event_sender,
            ids,
        }
    }

    /// Root-level allocation by an admin; mints the lineage id.
    #[instrument(skip(self, input))]
    pub async fn create_root(
        &self,
        user: &AuthUser,
        input: NewAllocation,
    ) -> Result<AllocationRecord, ServiceError> {
        let root_id = self.ids.chain_id(ChainLevel::Root);
        self.insert_allocation(user, input, root_id, ChainIds::default(), None, None)
            .await
    }

    /// Regional manager re-allocation; carries the root id forward and mints
    /// a fresh `rm_id`.
    #[instrument(skip(self, input))]
    pub async fn create_regional(
        &self,
        user: &AuthUser,
        root_id: String,
        region: String,
        input: NewAllocation,
    ) -> Result<AllocationRecord, ServiceError> {
        require_chain_id("root_id", &root_id)?;
        let rm_id = self.ids.chain_id(ChainLevel::Regional);
        self.insert_allocation(
            user,
            input,
            root_id,
            ChainIds {
                rm_id: Some(rm_id),
                bm_id: None,
            },
            Some(region),
            None,
        )
        .await
    }

    /// Branch manager re-allocation; carries root and RM ids, mints `bm_id`.
    #[instrument(skip(self, input))]
    pub async fn create_branch(
        &self,
        user: &AuthUser,
        root_id: String,
        rm_id: String,
        input: NewAllocation,
    ) -> Result<AllocationRecord, ServiceError> {
        require_chain_id("root_id", &root_id)?;
        require_chain_id("rm_id", &rm_id)?;
        let bm_id = self.ids.chain_id(ChainLevel::Branch);
        self.insert_allocation(
            user,
            input,
            root_id,
            ChainIds {
                rm_id: Some(rm_id),
                bm_id: Some(bm_id),
            },
            None,
            None,
        )
        .await
    }

    /// Manager re-allocation; carries root, RM and BM ids, mints
    /// `manager_id`.
    #[instrument(skip(self, input))]
    pub async fn create_manager(
        &self,
        user: &AuthUser,
        root_id: String,
        rm_id: String,
        bm_id: String,
        input: NewAllocation,
    ) -> Result<AllocationRecord, ServiceError> {
        require_chain_id("root_id", &root_id)?;
        require_chain_id("rm_id", &rm_id)?;
        require_chain_id("bm_id", &bm_id)?;
        let manager_id = self.ids.chain_id(ChainLevel::Manager);
        self.insert_allocation(
            user,
            input,
            root_id,
            ChainIds {
                rm_id: Some(rm_id),
                bm_id: Some(bm_id),
            },
            None,
            Some(manager_id),
        )
        .await
    }

    /// All allocation records, newest first.
    #[instrument(skip(self))]
    pub async fn history(&self) -> Result<Vec<AllocationRecord>, ServiceError> {
        let db = &*self.db_pool;
        let headers = allocation::Entity::find()
            .order_by_desc(allocation::Column::CreatedAt)
            .all(db)
            .await?;
        self.attach_lines(headers).await
    }

    /// Fetch one record with its lines.
    #[instrument(skip(self))]
    pub async fn get(&self, allocation_id: Uuid) -> Result<AllocationRecord, ServiceError> {
        let db = &*self.db_pool;
        let header = allocation::Entity::find_by_id(allocation_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("allocation {} not found", allocation_id))
            })?;
        let mut records = self.attach_lines(vec![header]).await?;
        Ok(records.remove(0))
    }

    /// Amend the free-text purpose of a record; the classification tag is
    /// re-derived. Quantities are append-only, provenance text is not.
    #[instrument(skip(self))]
    pub async fn update_purpose(
        &self,
        allocation_id: Uuid,
        purpose: String,
    ) -> Result<AllocationRecord, ServiceError> {
        let db = &*self.db_pool;
        let header = allocation::Entity::find_by_id(allocation_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("allocation {} not found", allocation_id))
            })?;

        let tag = PurposeTag::classify(&purpose);
        let mut active: allocation::ActiveModel = header.into();
        active.purpose = Set(purpose);
        active.purpose_tag = Set(tag.as_str().to_string());
        let updated = active.update(db).await?;
        let mut records = self.attach_lines(vec![updated]).await?;
        Ok(records.remove(0))
    }

    /// Pair headers with their lines, preserving header order.
    pub(crate) async fn attach_lines(
        &self,
        headers: Vec<allocation::Model>,
    ) -> Result<Vec<AllocationRecord>, ServiceError> {
        let db = &*self.db_pool;
        let mut groups = headers.load_many(allocation_line::Entity, db).await?;
        for group in &mut groups {
            group.sort_by_key(|line| line.position);
        }

        Ok(headers
            .into_iter()
            .zip(groups)
            .map(|(allocation, employees)| AllocationRecord {
                allocation,
                employees,
            })
            .collect())
    }

    async fn insert_allocation(
        &self,
        user: &AuthUser,
        input: NewAllocation,
        root_id: String,
        chain: ChainIds,
        region_override: Option<String>,
        manager_id: Option<String>,
    ) -> Result<AllocationRecord, ServiceError> {
        validate_allocation_input(&input)?;

        let now = Utc::now().naive_utc();
        let tag = PurposeTag::classify(&input.purpose);
        let allocation_id = self.ids.record_id();
        let level = level_label(&chain, manager_id.as_deref());

        let header = allocation::ActiveModel {
            id: Set(allocation_id),
            root_id: Set(root_id.clone()),
            rm_id: Set(chain.rm_id),
            bm_id: Set(chain.bm_id),
            manager_id: Set(manager_id),
            item: Set(input.item.trim().to_string()),
            purpose: Set(input.purpose.clone()),
            purpose_tag: Set(tag.as_str().to_string()),
            assigned_by: Set(user.emp_code.clone()),
            assigned_role: Set(user.role.to_string()),
            region: Set(region_override.unwrap_or_else(|| user.region.clone())),
            branch: Set(user.branch.clone()),
            to_vendor: Set(false),
            dispatched_at: Set(None),
            lr_no: Set(None),
            lr_updated_at: Set(None),
            allocated_on: Set(now.date()),
            created_at: Set(now),
        };

        let line_models: Vec<allocation_line::ActiveModel> = input
            .employees
            .iter()
            .enumerate()
            .map(|(position, line)| allocation_line::ActiveModel {
                id: Set(self.ids.record_id()),
                allocation_id: Set(allocation_id),
                position: Set(position as i32),
                emp_code: Set(line.emp_code.trim().to_string()),
                emp_name: Set(line.name.trim().to_string()),
                qty: Set(line.qty),
                used_qty: Set(0),
            })
            .collect();

        let db = &*self.db_pool;
        db.transaction::<_, (), ServiceError>(move |txn| {
            Box::pin(async move {
                header.insert(txn).await?;
                allocation_line::Entity::insert_many(line_models)
                    .exec(txn)
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
            .send(Event::AllocationCreated {
                allocation_id,
                root_id,
                level: level.to_string(),
                item: input.item.trim().to_string(),
            })
            .await;

        self.get(allocation_id).await
    }
}

fn level_label(chain: &ChainIds, manager_id: Option<&str>) -> &'static str {
    if manager_id.is_some() {
        "manager"
    } else if chain.bm_id.is_some() {
        "branch"
    } else if chain.rm_id.is_some() {
        "regional"
    } else {
        "root"
    }
}

fn require_chain_id(field: &str, value: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

fn validate_allocation_input(input: &NewAllocation) -> Result<(), ServiceError> {
    if input.item.trim().is_empty() {
        return Err(ServiceError::Validation("item is required".into()));
    }
    if input.employees.is_empty() {
        return Err(ServiceError::Validation(
            "at least one employee line is required".into(),
        ));
    }
    for line in &input.employees {
        if line.emp_code.trim().is_empty() {
            return Err(ServiceError::Validation(
                "employee line is missing emp_code".into(),
            ));
        }
        if line.qty <= 0 {
            return Err(ServiceError::Validation(format!(
                "qty for {} must be positive",
                line.emp_code
            )));
        }
    }
    Ok(())
}
