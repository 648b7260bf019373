use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::feed::epoch::format_epoch;
use crate::feed::FeedMetadata;
use crate::web::api::error::{ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct AverageSpeedResponse {
    pub average_speed_km_s: f64,
    pub epoch_count: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MetadataResponse {
    #[serde(flatten)]
    pub metadata: FeedMetadata,
    pub epoch_count: usize,
    pub first_epoch: Option<String>,
    pub last_epoch: Option<String>,
    pub loaded_at: DateTime<Utc>,
}

#[utoipa::path(
    get,
    path = "/speed/average",
    tag = "dataset",
    responses(
        (status = 200, description = "Mean speed over the whole dataset", body = AverageSpeedResponse),
        (status = 503, description = "No dataset loaded", body = ErrorResponse)
    )
)]
pub async fn average_speed(
    State(state): State<AppState>,
) -> ApiResult<Json<AverageSpeedResponse>> {
    let dataset = state.dataset.snapshot().await?;

    Ok(Json(AverageSpeedResponse {
        average_speed_km_s: dataset.average_speed()?,
        epoch_count: dataset.len(),
    }))
}

#[utoipa::path(
    get,
    path = "/metadata",
    tag = "dataset",
    responses(
        (status = 200, description = "Feed header, metadata and coverage", body = MetadataResponse),
        (status = 503, description = "No dataset loaded", body = ErrorResponse)
    )
)]
pub async fn metadata(State(state): State<AppState>) -> ApiResult<Json<MetadataResponse>> {
    let dataset = state.dataset.snapshot().await?;

    Ok(Json(MetadataResponse {
        metadata: dataset.metadata().clone(),
        epoch_count: dataset.len(),
        first_epoch: dataset.first().map(|r| format_epoch(&r.epoch)),
        last_epoch: dataset.last().map(|r| format_epoch(&r.epoch)),
        loaded_at: dataset.loaded_at(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::api::tests::test_state;

    #[tokio::test]
    async fn test_average_speed() {
        let Json(avg) = average_speed(State(test_state(None))).await.unwrap();

        assert_eq!(avg.epoch_count, 4);
        assert!((avg.average_speed_km_s - 7.86615965725).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_metadata() {
        let Json(meta) = metadata(State(test_state(None))).await.unwrap();

        assert_eq!(meta.epoch_count, 4);
        assert_eq!(meta.first_epoch.as_deref(), Some("2025-001T12:00:00.000Z"));
        assert_eq!(meta.last_epoch.as_deref(), Some("2025-004T12:00:00.000Z"));
    }
}
