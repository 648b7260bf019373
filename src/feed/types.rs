use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::epoch::serde_oem;

/// Cartesian vector, km for positions and km/s for velocities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

/// A single state vector sample of the trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EpochRecord {
    #[serde(with = "serde_oem")]
    #[schema(value_type = String, example = "2025-001T12:00:00.000Z")]
    pub epoch: DateTime<Utc>,
    pub position: Vector3,
    pub velocity: Vector3,
}

impl EpochRecord {
    /// Instantaneous speed in km/s.
    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }
}

/// Header and metadata fields carried by the OEM feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct FeedMetadata {
    pub creation_date: Option<String>,
    pub originator: Option<String>,
    pub object_name: Option<String>,
    pub object_id: Option<String>,
    pub center_name: Option<String>,
    pub ref_frame: Option<String>,
    pub time_system: Option<String>,
    pub start_time: Option<String>,
    pub stop_time: Option<String>,
    pub comments: Vec<String>,
}

/// Output of a feed parser before the records are ordered into a dataset.
#[derive(Debug, Default)]
pub struct ParsedFeed {
    pub metadata: FeedMetadata,
    pub records: Vec<EpochRecord>,
    pub discarded: usize,
}
