use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::feed::{spawn_refresh, FeedLoader, FeedSource};
use crate::geo::{
    Geocoder, GeoError, LocationCache, Locator, NominatimGeocoder, TimedLocationCache,
};
use crate::query::DatasetHandle;

use super::api::epochs as epoch_handlers;
use super::api::now as now_handlers;
use super::api::summary as summary_handlers;
use super::api_doc::ApiDoc;
use super::config::Config;
use super::state::AppState;

pub async fn run_server(config: Config) -> std::io::Result<()> {
    let bind_addr = config.web.bind.clone();

    let loader = Arc::new(FeedLoader::new(FeedSource::parse(&config.feed.source)));
    let initial = match loader.load().await {
        Ok(dataset) => Some(dataset),
        Err(e) => {
            let what = if e.is_unavailable() { "unavailable" } else { "unusable" };
            log::error!(
                "Feed {} {}, serving 503 until a retry succeeds: {}",
                loader.source(),
                what,
                e
            );
            None
        }
    };
    let dataset = Arc::new(DatasetHandle::new(initial));

    if let Some(period) = config.feed.refresh_interval {
        log::info!("Refreshing feed every {}", humantime::format_duration(period));
    }
    spawn_refresh(loader, dataset.clone(), config.feed.refresh_interval);

    let locator = build_locator(&config).map_err(std::io::Error::other)?;

    let state = AppState {
        dataset,
        locator: Arc::new(locator),
    };

    let app = router(state);

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/epochs", get(epoch_handlers::list_epochs))
        .route("/epochs/{epoch}", get(epoch_handlers::get_epoch))
        .route("/epochs/{epoch}/speed", get(epoch_handlers::get_epoch_speed))
        .route(
            "/epochs/{epoch}/location",
            get(epoch_handlers::get_epoch_location),
        )
        .route("/now", get(now_handlers::now))
        .route("/speed/average", get(summary_handlers::average_speed))
        .route("/metadata", get(summary_handlers::metadata))
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn build_locator(config: &Config) -> Result<Locator, GeoError> {
    let geocoder: Option<Arc<dyn Geocoder>> = if config.geocoder.enabled {
        let nominatim = NominatimGeocoder::new(
            &config.geocoder.url,
            &config.geocoder.user_agent,
            config.geocoder.timeout,
        )?
        .zoom(config.geocoder.zoom)
        .language(&config.geocoder.language);
        Some(Arc::new(nominatim))
    } else {
        log::info!("Reverse geocoding disabled");
        None
    };

    let cache: Option<Arc<dyn LocationCache>> = if config.cache.enabled {
        Some(Arc::new(TimedLocationCache::new(
            config.cache.capacity,
            config.cache.ttl,
        )))
    } else {
        None
    };

    Ok(Locator::new(geocoder, cache))
}
