use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use cached::{Cached, TimedSizedCache};
use chrono::{DateTime, Utc};

use crate::geo::types::LocationResult;

/// Store of already resolved locations, keyed by epoch.
pub trait LocationCache: Send + Sync {
    fn get(&self, epoch: &DateTime<Utc>) -> Option<LocationResult>;
    fn put(&self, epoch: DateTime<Utc>, location: LocationResult);
}

/// In-memory cache bounded both in size and in entry lifetime.
pub struct TimedLocationCache {
    inner: Mutex<TimedSizedCache<DateTime<Utc>, LocationResult>>,
}

impl TimedLocationCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let lifespan = ttl.as_secs().max(1);
        Self {
            inner: Mutex::new(TimedSizedCache::with_size_and_lifespan(
                capacity.max(1),
                lifespan,
            )),
        }
    }
}

impl LocationCache for TimedLocationCache {
    fn get(&self, epoch: &DateTime<Utc>) -> Option<LocationResult> {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.cache_get(epoch).cloned()
    }

    fn put(&self, epoch: DateTime<Utc>, location: LocationResult) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.cache_set(epoch, location);
    }
}
