use super::epoch::parse_epoch;
use super::types::{EpochRecord, FeedMetadata, ParsedFeed, Vector3};

/// Parse an OEM document in its KVN text encoding.
///
/// Header and metadata are `KEY = VALUE` lines, `COMMENT` lines are kept as
/// comments, covariance blocks are skipped and every other non-empty line is
/// taken as an ephemeris data line.
pub fn parse_kvn(content: &str) -> ParsedFeed {
    let mut parsed = ParsedFeed::default();
    let mut in_covariance = false;

    for (lineno, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line {
            "COVARIANCE_START" => {
                in_covariance = true;
                continue;
            }
            "COVARIANCE_STOP" => {
                in_covariance = false;
                continue;
            }
            "META_START" | "META_STOP" => continue,
            _ => {}
        }
        if in_covariance {
            continue;
        }

        if let Some(comment) = line.strip_prefix("COMMENT") {
            let comment = comment.trim();
            if !comment.is_empty() {
                parsed.metadata.comments.push(comment.to_string());
            }
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            set_metadata(&mut parsed.metadata, key.trim(), value.trim());
            continue;
        }

        match parse_data_line(line) {
            Ok(record) => parsed.records.push(record),
            Err(e) => {
                log::warn!("Skipping line {}: {}", lineno + 1, e);
                parsed.discarded += 1;
            }
        }
    }

    parsed
}

fn set_metadata(meta: &mut FeedMetadata, key: &str, value: &str) {
    let slot = match key {
        "CREATION_DATE" => &mut meta.creation_date,
        "ORIGINATOR" => &mut meta.originator,
        "OBJECT_NAME" => &mut meta.object_name,
        "OBJECT_ID" => &mut meta.object_id,
        "CENTER_NAME" => &mut meta.center_name,
        "REF_FRAME" => &mut meta.ref_frame,
        "TIME_SYSTEM" => &mut meta.time_system,
        "START_TIME" => &mut meta.start_time,
        "STOP_TIME" => &mut meta.stop_time,
        _ => return,
    };
    *slot = Some(value.to_string());
}

fn parse_data_line(line: &str) -> Result<EpochRecord, String> {
    let fields: Vec<&str> = line.split_whitespace().collect();

    // epoch + state, optionally followed by three acceleration components
    if fields.len() != 7 && fields.len() != 10 {
        return Err(format!("expected 7 or 10 fields, got {}", fields.len()));
    }

    let epoch = parse_epoch(fields[0]).ok_or_else(|| format!("invalid epoch: {:?}", fields[0]))?;
    let values = fields[1..7]
        .iter()
        .map(|f| f.parse::<f64>().map_err(|_| format!("non-numeric value: {:?}", f)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(EpochRecord {
        epoch,
        position: Vector3::new(values[0], values[1], values[2]),
        velocity: Vector3::new(values[3], values[4], values[5]),
    })
}
