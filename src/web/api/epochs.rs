use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::feed::epoch::{format_epoch, parse_epoch};
use crate::feed::EpochRecord;
use crate::geo::LocationResult;
use crate::query::{Dataset, Pagination};
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::state::AppState;

/// Raw pagination values; anything unparsable turns pagination off.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListEpochsQuery {
    /// Maximum number of epochs to return
    pub limit: Option<String>,
    /// Number of epochs to skip
    pub offset: Option<String>,
}

impl ListEpochsQuery {
    /// First value wins when a key is repeated.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let first = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        };
        Self {
            limit: first("limit"),
            offset: first("offset"),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SpeedResponse {
    #[schema(example = "2025-045T12:00:00.000Z")]
    pub epoch: String,
    pub speed_km_s: f64,
}

#[utoipa::path(
    get,
    path = "/epochs",
    tag = "epochs",
    params(ListEpochsQuery),
    responses(
        (status = 200, description = "State vectors in epoch order", body = Vec<EpochRecord>),
        (status = 503, description = "No dataset loaded", body = ErrorResponse)
    )
)]
pub async fn list_epochs(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ApiResult<Json<Vec<EpochRecord>>> {
    let query = ListEpochsQuery::from_pairs(&pairs);
    let dataset = state.dataset.snapshot().await?;
    let page = Pagination::from_raw(query.limit.as_deref(), query.offset.as_deref());
    Ok(Json(dataset.list(page).to_vec()))
}

#[utoipa::path(
    get,
    path = "/epochs/{epoch}",
    tag = "epochs",
    params(
        ("epoch" = String, Path, description = "Epoch, e.g. 2025-045T12:00:00.000Z")
    ),
    responses(
        (status = 200, description = "State vector", body = EpochRecord),
        (status = 404, description = "Unknown epoch", body = ErrorResponse),
        (status = 503, description = "No dataset loaded", body = ErrorResponse)
    )
)]
pub async fn get_epoch(
    State(state): State<AppState>,
    Path(epoch): Path<String>,
) -> ApiResult<Json<EpochRecord>> {
    let dataset = state.dataset.snapshot().await?;
    Ok(Json(find_epoch(&dataset, &epoch)?))
}

#[utoipa::path(
    get,
    path = "/epochs/{epoch}/speed",
    tag = "epochs",
    params(
        ("epoch" = String, Path, description = "Epoch, e.g. 2025-045T12:00:00.000Z")
    ),
    responses(
        (status = 200, description = "Instantaneous speed", body = SpeedResponse),
        (status = 404, description = "Unknown epoch", body = ErrorResponse),
        (status = 503, description = "No dataset loaded", body = ErrorResponse)
    )
)]
pub async fn get_epoch_speed(
    State(state): State<AppState>,
    Path(epoch): Path<String>,
) -> ApiResult<Json<SpeedResponse>> {
    let dataset = state.dataset.snapshot().await?;
    let record = find_epoch(&dataset, &epoch)?;

    Ok(Json(SpeedResponse {
        epoch: format_epoch(&record.epoch),
        speed_km_s: record.speed(),
    }))
}

#[utoipa::path(
    get,
    path = "/epochs/{epoch}/location",
    tag = "epochs",
    params(
        ("epoch" = String, Path, description = "Epoch, e.g. 2025-045T12:00:00.000Z")
    ),
    responses(
        (status = 200, description = "Ground location", body = LocationResult),
        (status = 404, description = "Unknown epoch", body = ErrorResponse),
        (status = 503, description = "No dataset loaded", body = ErrorResponse)
    )
)]
pub async fn get_epoch_location(
    State(state): State<AppState>,
    Path(epoch): Path<String>,
) -> ApiResult<Json<LocationResult>> {
    let dataset = state.dataset.snapshot().await?;
    let record = find_epoch(&dataset, &epoch)?;
    Ok(Json(state.locator.locate(&record).await))
}

fn find_epoch(dataset: &Dataset, raw: &str) -> Result<EpochRecord, ApiError> {
    let epoch = parse_epoch(raw).ok_or_else(|| ApiError::NotFound(raw.to_string()))?;
    Ok(dataset.get(&epoch)?.clone())
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    use super::*;
    use crate::web::api::tests::{status_of, test_state};

    fn query(limit: Option<&str>, offset: Option<&str>) -> Query<Vec<(String, String)>> {
        let pairs = [("limit", limit), ("offset", offset)]
            .into_iter()
            .filter_map(|(k, v)| v.map(|v| (k.to_string(), v.to_string())))
            .collect();
        Query(pairs)
    }

    #[test]
    fn test_query_pairs_first_value_wins() {
        let pairs = vec![
            ("limit".to_string(), "2".to_string()),
            ("other".to_string(), "x".to_string()),
            ("limit".to_string(), "3".to_string()),
        ];
        let query = ListEpochsQuery::from_pairs(&pairs);

        assert_eq!(query.limit.as_deref(), Some("2"));
        assert_eq!(query.offset, None);
    }

    #[tokio::test]
    async fn test_list_epochs_paginates() {
        let state = test_state(None);
        let Json(records) = list_epochs(State(state), query(Some("2"), Some("1")))
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(format_epoch(&records[0].epoch), "2025-002T12:00:00.000Z");
    }

    #[tokio::test]
    async fn test_list_epochs_bad_limit_returns_all() {
        let state = test_state(None);
        let Json(records) = list_epochs(State(state), query(Some("-1"), None))
            .await
            .unwrap();

        assert_eq!(records.len(), 4);
        assert!(records.windows(2).all(|w| w[0].epoch <= w[1].epoch));
    }

    #[tokio::test]
    async fn test_get_epoch() {
        let state = test_state(None);
        let Json(record) = get_epoch(State(state), Path("2025-003T12:00:00.000Z".into()))
            .await
            .unwrap();

        assert_eq!(record.velocity.z, 6.0);
    }

    #[tokio::test]
    async fn test_get_epoch_not_found() {
        let state = test_state(None);

        let missing = get_epoch(
            State(state.clone()),
            Path("2025-003T12:04:00.000Z".into()),
        )
        .await;
        assert_eq!(status_of(missing), StatusCode::NOT_FOUND);

        let garbage = get_epoch(State(state), Path("not-an-epoch".into())).await;
        assert_eq!(status_of(garbage), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_epoch_speed() {
        let state = test_state(None);
        let Json(speed) = get_epoch_speed(State(state), Path("2025-004T12:00:00.000Z".into()))
            .await
            .unwrap();

        assert_eq!(speed.epoch, "2025-004T12:00:00.000Z");
        assert!((speed.speed_km_s - 48f64.sqrt()).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_get_epoch_location() {
        let state = test_state(Some("Atlantic Ocean"));
        let Json(location) =
            get_epoch_location(State(state), Path("2025-001T12:00:00.000Z".into()))
                .await
                .unwrap();

        assert_eq!(location.place_name.as_deref(), Some("Atlantic Ocean"));
    }

    #[tokio::test]
    async fn test_unloaded_dataset_is_503() {
        let mut state = test_state(None);
        state.dataset = Default::default();

        let response = list_epochs(State(state), query(None, None)).await;
        assert_eq!(
            response.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
