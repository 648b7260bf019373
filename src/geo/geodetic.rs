use chrono::{DateTime, Utc};

use crate::feed::EpochRecord;
use crate::geo::types::Geodetic;

// WGS-84 constants
pub const WGS84_A_KM: f64 = 6378.137;
pub const WGS84_E2: f64 = 0.00669437999014;

const MAX_ITERATIONS: usize = 10;
const TOLERANCE_RAD: f64 = 1e-12;

/// Greenwich mean sidereal time at `epoch`, radians.
pub fn gmst(epoch: &DateTime<Utc>) -> f64 {
    sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&epoch.naive_utc()))
}

/// Rotate an inertial position into the Earth-fixed frame.
pub fn eci_to_ecef(pos: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    [
        pos[0] * cos_gmst + pos[1] * sin_gmst,
        -pos[0] * sin_gmst + pos[1] * cos_gmst,
        pos[2],
    ]
}

pub fn ecef_to_geodetic(ecef: [f64; 3]) -> Geodetic {
    let [x, y, z] = ecef;
    let p = x.hypot(y);
    let lon = y.atan2(x);

    let mut lat = z.atan2(p * (1.0 - WGS84_E2));
    let mut alt = 0.0;
    for _ in 0..MAX_ITERATIONS {
        let sin_lat = lat.sin();
        let n = WGS84_A_KM / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
        alt = p * lat.cos() + z * sin_lat - WGS84_A_KM * WGS84_A_KM / n;

        let next = z.atan2(p * (1.0 - WGS84_E2 * n / (n + alt)));
        let converged = (next - lat).abs() < TOLERANCE_RAD;
        lat = next;
        if converged {
            break;
        }
    }

    Geodetic {
        latitude_deg: lat.to_degrees(),
        longitude_deg: lon.to_degrees(),
        altitude_km: alt,
    }
}

/// Sub-satellite point of a state vector given in an Earth-centred inertial frame.
pub fn geodetic_position(record: &EpochRecord) -> Geodetic {
    let ecef = eci_to_ecef(record.position.as_array(), gmst(&record.epoch));
    ecef_to_geodetic(ecef)
}
