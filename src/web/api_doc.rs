use utoipa::OpenApi;

use super::api::epochs::SpeedResponse;
use super::api::error::ErrorResponse;
use super::api::now::NowResponse;
use super::api::summary::{AverageSpeedResponse, MetadataResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::epochs::list_epochs,
        super::api::epochs::get_epoch,
        super::api::epochs::get_epoch_speed,
        super::api::epochs::get_epoch_location,
        super::api::now::now,
        super::api::summary::average_speed,
        super::api::summary::metadata,
    ),
    components(
        schemas(
            crate::feed::EpochRecord,
            crate::feed::Vector3,
            crate::feed::FeedMetadata,
            crate::geo::LocationResult,
            SpeedResponse,
            NowResponse,
            AverageSpeedResponse,
            MetadataResponse,
            ErrorResponse,
        )
    ),
    info(
        title = "ISS Tracker API",
        description = "ISS state vectors from the NASA public ephemeris",
        version = "0.1.0"
    ),
    tags(
        (name = "epochs", description = "State vector lookup"),
        (name = "now", description = "Current position"),
        (name = "dataset", description = "Whole-dataset figures")
    )
)]
pub struct ApiDoc;
