use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::ServiceError;
use crate::services::allocations::{AllocationRecord, EmployeeLineInput, NewAllocation};
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRootAllocationRequest {
    pub item: String,
    #[serde(default)]
    pub purpose: String,
    pub employees: Vec<EmployeeLineInput>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRegionalAllocationRequest {
    pub root_id: String,
    pub item: String,
    #[serde(default)]
    pub purpose: String,
    #[serde(default)]
    pub region: String,
    pub employees: Vec<EmployeeLineInput>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBranchAllocationRequest {
    pub root_id: String,
    pub rm_id: String,
    pub item: String,
    #[serde(default)]
    pub purpose: String,
    pub employees: Vec<EmployeeLineInput>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateManagerAllocationRequest {
    pub root_id: String,
    pub rm_id: String,
    pub bm_id: String,
    pub item: String,
    #[serde(default)]
    pub purpose: String,
    pub employees: Vec<EmployeeLineInput>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePurposeRequest {
    pub purpose: String,
}

/// Root-level allocation by an admin.
#[utoipa::path(
    post,
    path = "/admin",
    request_body = CreateRootAllocationRequest,
    responses(
        (status = 201, description = "Allocation created", body = AllocationRecord),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "allocations"
)]
pub async fn create_root_allocation(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateRootAllocationRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let record = state
        .services
        .allocations
        .create_root(
            &user,
            NewAllocation {
                item: payload.item,
                purpose: payload.purpose,
                employees: payload.employees,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Every allocation record, newest first.
#[utoipa::path(
    get,
    path = "/history/admin",
    responses(
        (status = 200, description = "Allocation history", body = [AllocationRecord]),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "allocations"
)]
pub async fn admin_history(
    State(state): State<AppState>,
) -> Result<Json<Vec<AllocationRecord>>, ServiceError> {
    Ok(Json(state.services.allocations.history().await?))
}

/// Regional manager re-allocation.
#[utoipa::path(
    post,
    path = "/allocate/rm",
    request_body = CreateRegionalAllocationRequest,
    responses(
        (status = 201, description = "Allocation created", body = AllocationRecord),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "allocations"
)]
pub async fn allocate_regional(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateRegionalAllocationRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let record = state
        .services
        .allocations
        .create_regional(
            &user,
            payload.root_id,
            payload.region,
            NewAllocation {
                item: payload.item,
                purpose: payload.purpose,
                employees: payload.employees,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Branch manager re-allocation.
#[utoipa::path(
    post,
    path = "/allocate/bm",
    request_body = CreateBranchAllocationRequest,
    responses(
        (status = 201, description = "Allocation created", body = AllocationRecord),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "allocations"
)]
pub async fn allocate_branch(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateBranchAllocationRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let record = state
        .services
        .allocations
        .create_branch(
            &user,
            payload.root_id,
            payload.rm_id,
            NewAllocation {
                item: payload.item,
                purpose: payload.purpose,
                employees: payload.employees,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Manager re-allocation.
#[utoipa::path(
    post,
    path = "/allocate/manager",
    request_body = CreateManagerAllocationRequest,
    responses(
        (status = 201, description = "Allocation created", body = AllocationRecord),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "allocations"
)]
pub async fn allocate_manager(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateManagerAllocationRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let record = state
        .services
        .allocations
        .create_manager(
            &user,
            payload.root_id,
            payload.rm_id,
            payload.bm_id,
            NewAllocation {
                item: payload.item,
                purpose: payload.purpose,
                employees: payload.employees,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Amend a record's purpose text; re-derives the classification tag.
#[utoipa::path(
    put,
    path = "/allocations/{id}/purpose",
    params(("id" = Uuid, Path, description = "Allocation id")),
    request_body = UpdatePurposeRequest,
    responses(
        (status = 200, description = "Purpose updated", body = AllocationRecord),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "allocations"
)]
pub async fn update_purpose(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePurposeRequest>,
) -> Result<Json<AllocationRecord>, ServiceError> {
    Ok(Json(
        state
            .services
            .allocations
            .update_purpose(id, payload.purpose)
            .await?,
    ))
}
