use std::sync::Arc;

use crate::geo::Locator;
use crate::query::DatasetHandle;

#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<DatasetHandle>,
    pub locator: Arc<Locator>,
}
