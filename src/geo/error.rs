use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeoError {
    #[error("geocoder request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("geocoder answered with HTTP {0}")]
    HttpStatus(u16),
    #[error("invalid geocoder response: {0}")]
    Response(#[from] serde_json::Error),
}
