use serde::Deserialize;

use super::epoch::parse_epoch;
use crate::feed::FeedError;
use super::types::{EpochRecord, FeedMetadata, ParsedFeed, Vector3};

#[derive(Debug, Deserialize)]
struct Ndm {
    oem: Oem,
}

#[derive(Debug, Deserialize)]
struct Oem {
    #[serde(default)]
    header: Option<Header>,
    body: Body,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct Header {
    creation_date: Option<String>,
    originator: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Body {
    segment: Segment,
}

#[derive(Debug, Deserialize)]
struct Segment {
    #[serde(default)]
    metadata: Option<Metadata>,
    data: Data,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct Metadata {
    object_name: Option<String>,
    object_id: Option<String>,
    center_name: Option<String>,
    ref_frame: Option<String>,
    time_system: Option<String>,
    start_time: Option<String>,
    stop_time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Data {
    #[serde(rename = "COMMENT", default)]
    comments: Vec<String>,
    #[serde(rename = "stateVector", default)]
    state_vectors: Vec<RawStateVector>,
}

/// Children are collected as lists so a repeated element only spoils its
/// own state vector, not the whole document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct RawStateVector {
    #[serde(default)]
    epoch: Vec<String>,
    #[serde(default)]
    x: Vec<Component>,
    #[serde(default)]
    y: Vec<Component>,
    #[serde(default)]
    z: Vec<Component>,
    #[serde(default)]
    x_dot: Vec<Component>,
    #[serde(default)]
    y_dot: Vec<Component>,
    #[serde(default)]
    z_dot: Vec<Component>,
}

#[derive(Debug, Deserialize)]
struct Component {
    #[serde(rename = "$text", default)]
    value: String,
}

fn single<'a, T>(name: &str, items: &'a [T]) -> Result<&'a T, String> {
    match items {
        [item] => Ok(item),
        [] => Err(format!("missing {}", name)),
        _ => Err(format!("{} given {} times", name, items.len())),
    }
}

fn component(name: &str, c: &[Component]) -> Result<f64, String> {
    let c = single(name, c)?;
    c.value
        .trim()
        .parse()
        .map_err(|_| format!("non-numeric {}: {:?}", name, c.value))
}

impl TryFrom<&RawStateVector> for EpochRecord {
    type Error = String;

    fn try_from(raw: &RawStateVector) -> Result<Self, Self::Error> {
        let epoch_str = single("EPOCH", &raw.epoch)?;
        let epoch =
            parse_epoch(epoch_str).ok_or_else(|| format!("invalid EPOCH: {:?}", epoch_str))?;

        Ok(EpochRecord {
            epoch,
            position: Vector3::new(
                component("X", &raw.x)?,
                component("Y", &raw.y)?,
                component("Z", &raw.z)?,
            ),
            velocity: Vector3::new(
                component("X_DOT", &raw.x_dot)?,
                component("Y_DOT", &raw.y_dot)?,
                component("Z_DOT", &raw.z_dot)?,
            ),
        })
    }
}

/// Parse an OEM document in its XML encoding (`ndm/oem/body/segment`).
pub fn parse_xml(content: &str) -> Result<ParsedFeed, FeedError> {
    let ndm: Ndm = quick_xml::de::from_str(content)?;
    let header = ndm.oem.header.unwrap_or_default();
    let segment = ndm.oem.body.segment;
    let meta = segment.metadata.unwrap_or_default();

    let mut parsed = ParsedFeed {
        metadata: FeedMetadata {
            creation_date: header.creation_date,
            originator: header.originator,
            object_name: meta.object_name,
            object_id: meta.object_id,
            center_name: meta.center_name,
            ref_frame: meta.ref_frame,
            time_system: meta.time_system,
            start_time: meta.start_time,
            stop_time: meta.stop_time,
            comments: segment
                .data
                .comments
                .iter()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect(),
        },
        ..Default::default()
    };

    for (i, raw) in segment.data.state_vectors.iter().enumerate() {
        match EpochRecord::try_from(raw) {
            Ok(record) => parsed.records.push(record),
            Err(e) => {
                log::warn!("Skipping state vector {}: {}", i, e);
                parsed.discarded += 1;
            }
        }
    }

    Ok(parsed)
}
