mod cache;
mod error;
mod geocoder;
mod geodetic;
mod locator;
mod types;

pub use cache::{LocationCache, TimedLocationCache};
pub use error::GeoError;
pub use geocoder::{Geocoder, NominatimGeocoder, DEFAULT_NOMINATIM_URL};
pub use locator::Locator;
pub use types::LocationResult;

#[cfg(test)]
pub(crate) use locator::tests::StubGeocoder;
