use std::sync::Arc;

use crate::feed::{epoch::format_epoch, EpochRecord};
use crate::geo::cache::LocationCache;
use crate::geo::geocoder::Geocoder;
use crate::geo::geodetic::geodetic_position;
use crate::geo::types::LocationResult;

/// Turns state vectors into ground locations, going through the cache first.
#[derive(Default)]
pub struct Locator {
    geocoder: Option<Arc<dyn Geocoder>>,
    cache: Option<Arc<dyn LocationCache>>,
}

impl Locator {
    pub fn new(
        geocoder: Option<Arc<dyn Geocoder>>,
        cache: Option<Arc<dyn LocationCache>>,
    ) -> Self {
        Self { geocoder, cache }
    }

    pub async fn locate(&self, record: &EpochRecord) -> LocationResult {
        if let Some(hit) = self.cache.as_ref().and_then(|c| c.get(&record.epoch)) {
            log::debug!("Location cache hit for {}", format_epoch(&record.epoch));
            return hit;
        }

        let position = geodetic_position(record);

        let Some(geocoder) = &self.geocoder else {
            return LocationResult::new(position, None);
        };

        match geocoder
            .reverse(position.latitude_deg, position.longitude_deg)
            .await
        {
            Ok(place_name) => {
                let location = LocationResult::new(position, place_name);
                if let Some(cache) = &self.cache {
                    cache.put(record.epoch, location.clone());
                }
                location
            }
            Err(e) => {
                // not cached, the next request retries the lookup
                log::error!(
                    "Reverse geocoding failed for {}: {}",
                    format_epoch(&record.epoch),
                    e
                );
                LocationResult::new(position, None)
            }
        }
    }
}
