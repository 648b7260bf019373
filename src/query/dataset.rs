use chrono::{DateTime, Utc};

use crate::feed::epoch::format_epoch;
use crate::feed::{EpochRecord, FeedMetadata};

use super::error::QueryError;

/// Slice of the dataset requested by a client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl Pagination {
    pub fn all() -> Self {
        Self::default()
    }

    /// Build from raw query values. Any value that is present but not a
    /// non-negative integer disables pagination altogether.
    pub fn from_raw(limit: Option<&str>, offset: Option<&str>) -> Self {
        let parse = |v: Option<&str>| v.map(|s| s.trim().parse::<usize>()).transpose();

        match (parse(limit), parse(offset)) {
            (Ok(limit), Ok(offset)) => Pagination { limit, offset },
            _ => {
                log::debug!(
                    "Ignoring invalid pagination limit={:?} offset={:?}",
                    limit,
                    offset
                );
                Pagination::all()
            }
        }
    }
}

/// Immutable, epoch-ordered set of state vectors from one feed load.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<EpochRecord>,
    metadata: FeedMetadata,
    loaded_at: DateTime<Utc>,
}

impl Dataset {
    /// Orders the records by epoch and drops repeated epochs (first one wins).
    pub fn new(mut records: Vec<EpochRecord>, metadata: FeedMetadata) -> Self {
        records.sort_by_key(|r| r.epoch);

        let before = records.len();
        records.dedup_by_key(|r| r.epoch);
        if records.len() != before {
            log::warn!(
                "Dropped {} state vectors with duplicate epochs",
                before - records.len()
            );
        }

        Self {
            records,
            metadata,
            loaded_at: Utc::now(),
        }
    }

    pub fn records(&self) -> &[EpochRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn metadata(&self) -> &FeedMetadata {
        &self.metadata
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn first(&self) -> Option<&EpochRecord> {
        self.records.first()
    }

    pub fn last(&self) -> Option<&EpochRecord> {
        self.records.last()
    }

    pub fn list(&self, page: Pagination) -> &[EpochRecord] {
        let len = self.records.len();
        let start = page.offset.unwrap_or(0).min(len);
        let end = page
            .limit
            .map(|limit| start.saturating_add(limit).min(len))
            .unwrap_or(len);
        &self.records[start..end]
    }

    pub fn get(&self, epoch: &DateTime<Utc>) -> Result<&EpochRecord, QueryError> {
        self.records
            .binary_search_by_key(epoch, |r| r.epoch)
            .map(|i| &self.records[i])
            .map_err(|_| QueryError::NotFound(format_epoch(epoch)))
    }

    /// Record whose epoch is nearest to `time`; on a tie the earlier one.
    pub fn closest_to(&self, time: DateTime<Utc>) -> Result<&EpochRecord, QueryError> {
        let idx = self.records.partition_point(|r| r.epoch < time);
        let before = idx.checked_sub(1).and_then(|i| self.records.get(i));
        let after = self.records.get(idx);

        match (before, after) {
            (Some(b), Some(a)) => {
                if a.epoch - time < time - b.epoch {
                    Ok(a)
                } else {
                    Ok(b)
                }
            }
            (Some(b), None) => Ok(b),
            (None, Some(a)) => Ok(a),
            (None, None) => Err(QueryError::EmptyDataset),
        }
    }

    /// Mean instantaneous speed over every record, km/s.
    pub fn average_speed(&self) -> Result<f64, QueryError> {
        if self.records.is_empty() {
            return Err(QueryError::EmptyDataset);
        }
        let total: f64 = self.records.iter().map(EpochRecord::speed).sum();
        Ok(total / self.records.len() as f64)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::{Duration, TimeZone};
    use rstest::rstest;

    use crate::feed::Vector3;

    use super::*;

    pub(crate) fn record(day: u32, velocity: (f64, f64, f64)) -> EpochRecord {
        EpochRecord {
            epoch: Utc.with_ymd_and_hms(2025, 1, day, 12, 0, 0).unwrap(),
            position: Vector3::new(6778.0, 0.0, day as f64),
            velocity: Vector3::new(velocity.0, velocity.1, velocity.2),
        }
    }

    pub(crate) fn reference_dataset() -> Dataset {
        Dataset::new(
            vec![
                record(1, (7.0, 3.0, 5.0)),
                record(2, (5.0, 2.0, 4.0)),
                record(3, (6.0, 2.0, 6.0)),
                record(4, (4.0, 4.0, 4.0)),
            ],
            FeedMetadata::default(),
        )
    }

    fn five_records() -> Dataset {
        Dataset::new(
            (1..=5).map(|d| record(d, (1.0, 0.0, 0.0))).collect(),
            FeedMetadata::default(),
        )
    }

    #[test]
    fn test_new_sorts_and_dedups() {
        let mut dup = record(2, (9.0, 9.0, 9.0));
        dup.position.x = -1.0;
        let ds = Dataset::new(
            vec![
                record(3, (1.0, 0.0, 0.0)),
                record(1, (1.0, 0.0, 0.0)),
                record(2, (1.0, 0.0, 0.0)),
                dup,
            ],
            FeedMetadata::default(),
        );

        assert_eq!(ds.len(), 3);
        assert!(ds.records().windows(2).all(|w| w[0].epoch < w[1].epoch));
        assert_eq!(ds.records()[1].position.x, 6778.0);
    }

    #[rstest]
    #[case(Some("2"), Some("1"), 1..3)]
    #[case(Some("-1"), None, 0..5)]
    #[case(Some("2"), Some("-3"), 0..5)]
    #[case(Some("two"), Some("1"), 0..5)]
    #[case(None, None, 0..5)]
    #[case(None, Some("3"), 3..5)]
    #[case(Some("3"), None, 0..3)]
    #[case(Some("10"), Some("4"), 4..5)]
    #[case(Some("2"), Some("9"), 5..5)]
    #[case(Some("0"), Some("0"), 0..0)]
    fn test_list_pagination(
        #[case] limit: Option<&str>,
        #[case] offset: Option<&str>,
        #[case] expected: std::ops::Range<usize>,
    ) {
        let ds = five_records();
        let page = Pagination::from_raw(limit, offset);
        assert_eq!(ds.list(page), &ds.records()[expected]);
    }

    #[test]
    fn test_get_round_trip() {
        let ds = five_records();
        for r in ds.list(Pagination::all()) {
            assert_eq!(ds.get(&r.epoch).unwrap(), r);
        }
    }

    #[test]
    fn test_get_not_found() {
        let ds = five_records();
        let missing = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 1).unwrap();
        assert_eq!(
            ds.get(&missing),
            Err(QueryError::NotFound("2025-001T12:00:01.000Z".into()))
        );
    }

    #[rstest]
    #[case(Duration::zero(), 2)]
    #[case(Duration::hours(5), 2)]
    #[case(Duration::hours(13), 3)]
    #[case(Duration::hours(12), 2)]
    #[case(Duration::days(30), 5)]
    #[case(Duration::days(-30), 1)]
    fn test_closest_to(#[case] from_day2: Duration, #[case] expected_day: u32) {
        let ds = five_records();
        let t = Utc.with_ymd_and_hms(2025, 1, 2, 12, 0, 0).unwrap() + from_day2;
        let closest = ds.closest_to(t).unwrap();
        assert_eq!(closest, &record(expected_day, (1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_closest_to_empty() {
        let ds = Dataset::new(vec![], FeedMetadata::default());
        assert_eq!(ds.closest_to(Utc::now()), Err(QueryError::EmptyDataset));
    }

    #[test]
    fn test_average_speed() {
        let avg = reference_dataset().average_speed().unwrap();
        assert!((avg - 7.86615965725).abs() < 1e-6);
    }

    #[test]
    fn test_average_speed_empty() {
        let ds = Dataset::new(vec![], FeedMetadata::default());
        assert_eq!(ds.average_speed(), Err(QueryError::EmptyDataset));
    }
}
