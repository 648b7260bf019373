use serde::Serialize;
use utoipa::ToSchema;

/// WGS-84 position of the sub-satellite point plus height above the ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geodetic {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_km: f64,
}

/// Where the station was at a given epoch.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct LocationResult {
    /// Degrees north
    pub latitude: f64,
    /// Degrees east, in [-180, 180]
    pub longitude: f64,
    /// Kilometres above the WGS-84 ellipsoid
    pub altitude: f64,
    /// Reverse-geocoded place, null over open water or when the geocoder is unavailable
    pub place_name: Option<String>,
}

impl LocationResult {
    pub fn new(position: Geodetic, place_name: Option<String>) -> Self {
        Self {
            latitude: position.latitude_deg,
            longitude: position.longitude_deg,
            altitude: position.altitude_km,
            place_name,
        }
    }
}
