use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum QueryError {
    #[error("no state vector at epoch {0}")]
    NotFound(String),
    #[error("dataset is empty")]
    EmptyDataset,
    #[error("no dataset has been loaded")]
    DataUnavailable,
}
