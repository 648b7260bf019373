use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("feed server answered with HTTP {0}")]
    HttpStatus(u16),
    #[error("feed file read error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid OEM XML document: {0}")]
    Xml(#[from] quick_xml::de::DeError),
    #[error("feed contains no valid state vectors")]
    EmptyDataset,
}

impl FeedError {
    /// Everything except an empty feed means the data could not be obtained at all.
    pub fn is_unavailable(&self) -> bool {
        !matches!(self, FeedError::EmptyDataset)
    }
}
