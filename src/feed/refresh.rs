use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::feed::loader::FeedLoader;
use crate::query::DatasetHandle;

const MIN_PERIOD: Duration = Duration::from_secs(60);
const RETRY_PERIOD: Duration = Duration::from_secs(30);

/// Reload the feed every `period` and swap in the new dataset.
///
/// While nothing is loaded yet the feed is retried every 30 seconds, with or
/// without a period. A failed reload keeps serving the previous snapshot.
pub fn spawn_refresh(
    loader: Arc<FeedLoader>,
    handle: Arc<DatasetHandle>,
    period: Option<Duration>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(wait) = next_wait(handle.is_loaded().await, period) {
            sleep(wait).await;
            refresh_once(&loader, &handle).await;
        }
        log::debug!("Feed refresh task done");
    })
}

fn next_wait(loaded: bool, period: Option<Duration>) -> Option<Duration> {
    match (loaded, period) {
        (false, _) => Some(RETRY_PERIOD),
        (true, Some(period)) => Some(period.max(MIN_PERIOD)),
        (true, None) => None,
    }
}

pub async fn refresh_once(loader: &FeedLoader, handle: &DatasetHandle) -> bool {
    match loader.load().await {
        Ok(dataset) => {
            let count = dataset.len();
            let previous = handle.replace(dataset).await;
            log::info!(
                "Dataset refreshed: {} -> {} state vectors",
                previous.map(|d| d.len()).unwrap_or(0),
                count
            );
            true
        }
        Err(e) => {
            log::warn!("Feed refresh from {} failed: {}", loader.source(), e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rstest::rstest;

    use super::*;
    use crate::feed::FeedSource;
    use crate::query::fixtures::reference_dataset;

    #[rstest]
    #[case(false, None, Some(RETRY_PERIOD))]
    #[case(false, Some(Duration::from_secs(3600)), Some(RETRY_PERIOD))]
    #[case(true, Some(Duration::from_secs(3600)), Some(Duration::from_secs(3600)))]
    #[case(true, Some(Duration::ZERO), Some(MIN_PERIOD))]
    #[case(true, None, None)]
    fn test_next_wait(
        #[case] loaded: bool,
        #[case] period: Option<Duration>,
        #[case] expected: Option<Duration>,
    ) {
        assert_eq!(next_wait(loaded, period), expected);
    }

    #[tokio::test]
    async fn test_refresh_task_ends_when_loaded_without_period() {
        let handle = Arc::new(DatasetHandle::new(Some(reference_dataset())));
        let loader = Arc::new(FeedLoader::new(FeedSource::Path("/nonexistent".into())));

        spawn_refresh(loader, handle, None).await.unwrap();
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_snapshot() {
        let handle = DatasetHandle::new(Some(reference_dataset()));
        let loader = FeedLoader::new(FeedSource::Path("/nonexistent/iss.txt".into()));

        assert!(!refresh_once(&loader, &handle).await);
        assert_eq!(handle.snapshot().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_refresh_swaps_dataset() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "2025-045T12:00:00.000 -4732.36 -2394.12 4265.27 -1.95 -6.02 -5.54"
        )
        .unwrap();

        let handle = DatasetHandle::new(Some(reference_dataset()));
        let loader = FeedLoader::new(FeedSource::Path(file.path().to_path_buf()));

        assert!(refresh_once(&loader, &handle).await);
        assert_eq!(handle.snapshot().await.unwrap().len(), 1);
    }
}
