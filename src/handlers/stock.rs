use axum::{
    extract::{Path, State},
    Json,
};

use crate::auth::AuthUser;
use crate::errors::ServiceError;
use crate::services::stock::StockOverview;
use crate::AppState;

/// Stock position of the calling regional manager.
#[utoipa::path(
    get,
    path = "/regional/stock",
    responses(
        (status = 200, description = "Stock and assignments", body = StockOverview),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "stock"
)]
pub async fn regional_stock(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<StockOverview>, ServiceError> {
    Ok(Json(state.services.stock.overview(&user.emp_code).await?))
}

/// Stock position of the calling branch manager: allocations received plus
/// the ones they created themselves.
#[utoipa::path(
    get,
    path = "/branch/stock",
    responses(
        (status = 200, description = "Stock and assignments", body = StockOverview),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "stock"
)]
pub async fn branch_stock(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<StockOverview>, ServiceError> {
    Ok(Json(
        state
            .services
            .stock
            .overview_received_or_created(&user.emp_code)
            .await?,
    ))
}

/// Stock position of the calling manager.
#[utoipa::path(
    get,
    path = "/manager/stock",
    responses(
        (status = 200, description = "Stock and assignments", body = StockOverview),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "stock"
)]
pub async fn manager_stock(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<StockOverview>, ServiceError> {
    Ok(Json(state.services.stock.overview(&user.emp_code).await?))
}

/// Stock position of an arbitrary employee code.
#[utoipa::path(
    get,
    path = "/employee/{emp_code}",
    params(("emp_code" = String, Path, description = "Employee code")),
    responses(
        (status = 200, description = "Stock and assignments", body = StockOverview),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "stock"
)]
pub async fn employee_stock(
    State(state): State<AppState>,
    Path(emp_code): Path<String>,
) -> Result<Json<StockOverview>, ServiceError> {
    Ok(Json(state.services.stock.overview(&emp_code).await?))
}
