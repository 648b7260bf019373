use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::geo::error::GeoError;

pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/reverse";

/// Reverse geocoding: coordinates in, human readable place out.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// `Ok(None)` when the service has no place for these coordinates.
    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<Option<String>, GeoError>;
}

pub struct NominatimGeocoder {
    client: reqwest::Client,
    url: String,
    zoom: u8,
    language: String,
}

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    display_name: Option<String>,
    error: Option<String>,
}

impl NominatimGeocoder {
    pub fn new(url: &str, user_agent: &str, timeout: Duration) -> Result<Self, GeoError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            url: url.to_string(),
            zoom: 15,
            language: "en".to_string(),
        })
    }

    pub fn zoom(mut self, zoom: u8) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn language(mut self, language: &str) -> Self {
        self.language = language.to_string();
        self
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<Option<String>, GeoError> {
        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("format", "jsonv2".to_string()),
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("zoom", self.zoom.to_string()),
                ("accept-language", self.language.clone()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(GeoError::HttpStatus(status.as_u16()));
        }

        let body = response.text().await?;
        place_from_response(&body)
    }
}

fn place_from_response(body: &str) -> Result<Option<String>, GeoError> {
    let response: NominatimResponse = serde_json::from_str(body)?;
    if let Some(error) = response.error {
        log::debug!("Nominatim has no place: {}", error);
        return Ok(None);
    }
    Ok(response.display_name.filter(|name| !name.is_empty()))
}
