use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Sampletrack API",
        description = "Field-sales sample tracking: hierarchical stock allocation, \
consumption ledger, and vendor dispatch. All endpoints except /status and /health \
require a bearer token issued by the identity provider."
    ),
    paths(
        crate::handlers::allocations::create_root_allocation,
        crate::handlers::allocations::admin_history,
        crate::handlers::allocations::allocate_regional,
        crate::handlers::allocations::allocate_branch,
        crate::handlers::allocations::allocate_manager,
        crate::handlers::allocations::update_purpose,
        crate::handlers::stock::regional_stock,
        crate::handlers::stock::branch_stock,
        crate::handlers::stock::manager_stock,
        crate::handlers::stock::employee_stock,
        crate::handlers::usage::record_used_sample,
        crate::handlers::vendor::dispatch_lineage,
        crate::handlers::vendor::update_lr,
        crate::handlers::vendor::vendor_list,
    ),
    components(schemas(
        crate::entities::allocation::Model,
        crate::entities::allocation_line::Model,
        crate::entities::sample_usage::Model,
        crate::errors::ErrorResponse,
        crate::services::allocations::AllocationRecord,
        crate::services::allocations::EmployeeLineInput,
        crate::services::allocations::NewAllocation,
        crate::services::stock::StockItem,
        crate::services::stock::StockOverview,
        crate::services::usage::RecordUsageInput,
        crate::handlers::allocations::CreateRootAllocationRequest,
        crate::handlers::allocations::CreateRegionalAllocationRequest,
        crate::handlers::allocations::CreateBranchAllocationRequest,
        crate::handlers::allocations::CreateManagerAllocationRequest,
        crate::handlers::allocations::UpdatePurposeRequest,
        crate::handlers::vendor::UpdateLrRequest,
        crate::handlers::vendor::BulkUpdateResponse,
    )),
    tags(
        (name = "allocations", description = "Hierarchical sample allocation"),
        (name = "stock", description = "Stock ledger queries"),
        (name = "usage", description = "Sample consumption recording"),
        (name = "vendor", description = "Vendor dispatch and LR tracking"),
    )
)]
pub struct ApiDoc;

/// Swagger UI mount for development builds.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}
