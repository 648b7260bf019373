use std::sync::Arc;
use tokio::sync::RwLock;

use super::dataset::Dataset;
use super::error::QueryError;

/// Process-wide holder of the current dataset snapshot.
///
/// Readers clone the `Arc` and keep working on it; a refresh swaps the
/// pointer, so nobody ever sees a partially replaced dataset.
#[derive(Default)]
pub struct DatasetHandle {
    current: RwLock<Option<Arc<Dataset>>>,
}

impl DatasetHandle {
    pub fn new(dataset: Option<Dataset>) -> Self {
        Self {
            current: RwLock::new(dataset.map(Arc::new)),
        }
    }

    pub async fn snapshot(&self) -> Result<Arc<Dataset>, QueryError> {
        self.current
            .read()
            .await
            .clone()
            .ok_or(QueryError::DataUnavailable)
    }

    pub async fn is_loaded(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// Install a new dataset, returning the one it replaced.
    pub async fn replace(&self, dataset: Dataset) -> Option<Arc<Dataset>> {
        let mut current = self.current.write().await;
        current.replace(Arc::new(dataset))
    }
}
