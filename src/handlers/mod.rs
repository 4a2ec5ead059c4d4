pub mod allocations;
pub mod stock;
pub mod usage;
pub mod vendor;

use std::sync::Arc;

use crate::db::DbPool;
use crate::events::EventSender;
use crate::ids::SharedIdGenerator;
use crate::services::{AllocationService, DispatchService, StockService, UsageService};

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer wired up once at boot and shared by all HTTP handlers.
#[derive(Clone)]
pub struct AppServices {
    pub allocations: AllocationService,
    pub stock: StockService,
    pub usage: UsageService,
    pub dispatch: DispatchService,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender, ids: SharedIdGenerator) -> Self {
        let allocations =
            AllocationService::new(db_pool.clone(), event_sender.clone(), ids.clone());
        let stock = StockService::new(db_pool.clone(), allocations.clone());
        let usage = UsageService::new(
            db_pool.clone(),
            event_sender.clone(),
            ids,
            allocations.clone(),
        );
        let dispatch = DispatchService::new(db_pool, event_sender, allocations.clone());

        Self {
            allocations,
            stock,
            usage,
            dispatch,
        }
    }
}
