pub mod allocations;
pub mod dispatch;
pub mod stock;
pub mod usage;

pub use allocations::AllocationService;
pub use dispatch::DispatchService;
pub use stock::StockService;
pub use usage::UsageService;
