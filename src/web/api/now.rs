use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::feed::EpochRecord;
use crate::geo::LocationResult;
use crate::web::api::error::{ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct NowResponse {
    pub record: EpochRecord,
    pub speed_km_s: f64,
    pub location: LocationResult,
    /// Seconds between the request time and the epoch of `record`, negative for past epochs
    pub offset_seconds: f64,
}

#[utoipa::path(
    get,
    path = "/now",
    tag = "now",
    responses(
        (status = 200, description = "State vector closest to the current time", body = NowResponse),
        (status = 503, description = "No dataset loaded", body = ErrorResponse)
    )
)]
pub async fn now(State(state): State<AppState>) -> ApiResult<Json<NowResponse>> {
    Ok(Json(closest_report(&state, Utc::now()).await?))
}

async fn closest_report(state: &AppState, at: DateTime<Utc>) -> ApiResult<NowResponse> {
    let dataset = state.dataset.snapshot().await?;
    let record = dataset.closest_to(at)?.clone();
    let location = state.locator.locate(&record).await;
    let offset = record.epoch - at;

    Ok(NowResponse {
        speed_km_s: record.speed(),
        offset_seconds: offset.num_milliseconds() as f64 / 1000.0,
        record,
        location,
    })
}
