use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::ServiceError;
use crate::services::allocations::AllocationRecord;
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateLrRequest {
    pub lr_no: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BulkUpdateResponse {
    pub success: bool,
    pub message: String,
    pub records: u64,
}

/// Mark a lineage as dispatched to the vendor.
#[utoipa::path(
    post,
    path = "/dispatch/{root_id}",
    params(("root_id" = String, Path, description = "Any chain id of the lineage")),
    responses(
        (status = 200, description = "Lineage dispatched", body = BulkUpdateResponse),
        (status = 400, description = "No project/marketing allocation in lineage", body = crate::errors::ErrorResponse),
        (status = 404, description = "Lineage not found", body = crate::errors::ErrorResponse)
    ),
    tag = "vendor"
)]
pub async fn dispatch_lineage(
    State(state): State<AppState>,
    Path(root_id): Path<String>,
) -> Result<Json<BulkUpdateResponse>, ServiceError> {
    let records = state.services.dispatch.dispatch(&root_id).await?;
    Ok(Json(BulkUpdateResponse {
        success: true,
        message: format!("lineage {} dispatched to vendor", root_id),
        records,
    }))
}

/// Apply a vendor LR number to the finest-grained lineage level.
#[utoipa::path(
    put,
    path = "/vendor/lr/{root_id}",
    params(("root_id" = String, Path, description = "Root chain id of the lineage")),
    request_body = UpdateLrRequest,
    responses(
        (status = 200, description = "LR number applied", body = BulkUpdateResponse),
        (status = 400, description = "Missing LR number", body = crate::errors::ErrorResponse),
        (status = 404, description = "Lineage not found", body = crate::errors::ErrorResponse)
    ),
    tag = "vendor"
)]
pub async fn update_lr(
    State(state): State<AppState>,
    Path(root_id): Path<String>,
    Json(payload): Json<UpdateLrRequest>,
) -> Result<Json<BulkUpdateResponse>, ServiceError> {
    let records = state
        .services
        .dispatch
        .annotate_lr(&root_id, &payload.lr_no)
        .await?;
    Ok(Json(BulkUpdateResponse {
        success: true,
        message: format!("LR number applied to lineage {}", root_id),
        records,
    }))
}

/// Dispatched records with a project or marketing purpose.
#[utoipa::path(
    get,
    path = "/vendor/list",
    responses(
        (status = 200, description = "Vendor-eligible dispatched records", body = [AllocationRecord]),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "vendor"
)]
pub async fn vendor_list(
    State(state): State<AppState>,
) -> Result<Json<Vec<AllocationRecord>>, ServiceError> {
    Ok(Json(state.services.dispatch.vendor_list().await?))
}
