use axum::{extract::State, Json};

use crate::errors::ServiceError;
use crate::services::allocations::AllocationRecord;
use crate::services::usage::RecordUsageInput;
use crate::AppState;

/// Record samples consumed against a customer, deducting from the matching
/// allocation line.
#[utoipa::path(
    post,
    path = "/assignments/used-sample",
    request_body = RecordUsageInput,
    responses(
        (status = 200, description = "Usage recorded; updated record returned", body = AllocationRecord),
        (status = 400, description = "Quantity exceeds availability", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unknown allocation or employee line", body = crate::errors::ErrorResponse)
    ),
    tag = "usage"
)]
pub async fn record_used_sample(
    State(state): State<AppState>,
    Json(payload): Json<RecordUsageInput>,
) -> Result<Json<AllocationRecord>, ServiceError> {
    Ok(Json(state.services.usage.record_usage(payload).await?))
}
