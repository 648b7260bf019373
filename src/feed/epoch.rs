use chrono::{DateTime, NaiveDateTime, Utc};

/// Day-of-year notation used by CCSDS OEM files, e.g. `2025-001T12:00:00.000Z`.
const OEM_FORMAT: &str = "%Y-%jT%H:%M:%S%.f";
const OEM_DISPLAY_FORMAT: &str = "%Y-%jT%H:%M:%S%.3fZ";

/// Parse an epoch in OEM day-of-year notation, falling back to RFC 3339.
pub fn parse_epoch(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    let bare = s.strip_suffix('Z').unwrap_or(s);

    if let Ok(naive) = NaiveDateTime::parse_from_str(bare, OEM_FORMAT) {
        return Some(naive.and_utc());
    }

    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

pub fn format_epoch(epoch: &DateTime<Utc>) -> String {
    epoch.format(OEM_DISPLAY_FORMAT).to_string()
}

/// Serde adapter keeping epochs in OEM notation on the wire.
pub mod serde_oem {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(epoch: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_epoch(epoch))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::parse_epoch(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid epoch: {}", s)))
    }
}
