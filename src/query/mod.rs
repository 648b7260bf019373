mod dataset;
mod error;
mod handle;

pub use dataset::{Dataset, Pagination};
pub use error::QueryError;
pub use handle::DatasetHandle;

#[cfg(test)]
pub(crate) use dataset::tests as fixtures;
