pub mod epoch;
mod error;
mod kvn;
mod loader;
mod refresh;
mod types;
mod xml;

pub use error::FeedError;
pub use loader::{FeedLoader, FeedSource, DEFAULT_FEED_URL};
pub use refresh::spawn_refresh;
pub use types::{EpochRecord, FeedMetadata, Vector3};
