use std::fmt;
use std::path::PathBuf;

use reqwest::StatusCode;
use strum_macros::Display;

use crate::feed::FeedError;
use crate::feed::kvn::parse_kvn;
use crate::feed::types::ParsedFeed;
use crate::feed::xml::parse_xml;
use crate::query::Dataset;

/// NASA's public ISS ephemeris in OEM XML form.
pub const DEFAULT_FEED_URL: &str =
    "https://nasa-public-data.s3.amazonaws.com/iss-coords/current/ISS_OEM/ISS.OEM_J2K_EPH.xml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    Url(String),
    Path(PathBuf),
}

impl FeedSource {
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.starts_with("http://") || s.starts_with("https://") {
            FeedSource::Url(s.to_string())
        } else {
            FeedSource::Path(PathBuf::from(s.strip_prefix("file://").unwrap_or(s)))
        }
    }
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedSource::Url(url) => write!(f, "{}", url),
            FeedSource::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum FeedFormat {
    Xml,
    Kvn,
}

impl FeedFormat {
    pub fn detect(content: &str) -> Self {
        if content.trim_start().starts_with('<') {
            FeedFormat::Xml
        } else {
            FeedFormat::Kvn
        }
    }
}

pub struct FeedLoader {
    source: FeedSource,
    client: reqwest::Client,
}

impl FeedLoader {
    pub fn new(source: FeedSource) -> Self {
        Self {
            source,
            client: reqwest::Client::new(),
        }
    }

    pub fn source(&self) -> &FeedSource {
        &self.source
    }

    /// Fetch and parse the feed into a fresh dataset.
    pub async fn load(&self) -> Result<Dataset, FeedError> {
        log::info!("Fetching trajectory feed from {}", self.source);
        let content = self.fetch().await?;
        let dataset = parse_feed(&content)?;
        log::info!(
            "Loaded {} state vectors from {}",
            dataset.len(),
            self.source
        );
        Ok(dataset)
    }

    async fn fetch(&self) -> Result<String, FeedError> {
        match &self.source {
            FeedSource::Url(url) => {
                let response = self.client.get(url).send().await?;
                let status = response.status();
                log::debug!("Feed response status: {}", status);
                if status != StatusCode::OK {
                    return Err(FeedError::HttpStatus(status.as_u16()));
                }
                Ok(response.text().await?)
            }
            FeedSource::Path(path) => Ok(tokio::fs::read_to_string(path).await?),
        }
    }
}

/// Parse raw feed text in either OEM encoding.
pub fn parse_feed(content: &str) -> Result<Dataset, FeedError> {
    let format = FeedFormat::detect(content);
    log::debug!("Parsing feed as {}", format);

    let ParsedFeed {
        metadata,
        records,
        discarded,
    } = match format {
        FeedFormat::Xml => parse_xml(content)?,
        FeedFormat::Kvn => parse_kvn(content),
    };

    if discarded > 0 {
        log::warn!("Discarded {} malformed state vectors", discarded);
    }
    if records.is_empty() {
        log::error!("No valid state vectors in feed");
        return Err(FeedError::EmptyDataset);
    }

    Ok(Dataset::new(records, metadata))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rstest::rstest;

    use super::*;

    const XML: &str = r#"<ndm><oem><body><segment><data>
<stateVector><EPOCH>2025-045T12:08:00.000Z</EPOCH><X>1</X><Y>2</Y><Z>3</Z><X_DOT>1</X_DOT><Y_DOT>0</Y_DOT><Z_DOT>0</Z_DOT></stateVector>
<stateVector><EPOCH>2025-045T12:00:00.000Z</EPOCH><X>1</X><Y>2</Y><Z>3</Z><X_DOT>0</X_DOT><Y_DOT>2</Y_DOT><Z_DOT>0</Z_DOT></stateVector>
<stateVector><EPOCH>2025-045T12:04:00.000Z</EPOCH><X>1</X><Y>2</Y><Z>3</Z><X_DOT>0</X_DOT><Y_DOT>0</Y_DOT><Z_DOT>3</Z_DOT></stateVector>
<stateVector><EPOCH>2025-045T12:04:00.000Z</EPOCH><X>9</X><Y>9</Y><Z>9</Z><X_DOT>9</X_DOT><Y_DOT>9</Y_DOT><Z_DOT>9</Z_DOT></stateVector>
</data></segment></body></oem></ndm>"#;

    #[rstest]
    #[case("https://example.com/iss.xml", FeedSource::Url("https://example.com/iss.xml".into()))]
    #[case("http://localhost:8000/x", FeedSource::Url("http://localhost:8000/x".into()))]
    #[case("/data/iss.xml", FeedSource::Path("/data/iss.xml".into()))]
    #[case("file:///data/iss.txt", FeedSource::Path("/data/iss.txt".into()))]
    fn test_feed_source_parse(#[case] inp: &str, #[case] expected: FeedSource) {
        assert_eq!(FeedSource::parse(inp), expected);
    }

    #[test]
    fn test_format_detect() {
        assert_eq!(FeedFormat::detect("  \n<?xml version=\"1.0\"?>"), FeedFormat::Xml);
        assert_eq!(FeedFormat::detect("CCSDS_OEM_VERS = 2.0"), FeedFormat::Kvn);
        assert_eq!(FeedFormat::Kvn.to_string(), "kvn");
    }

    #[test]
    fn test_parse_feed_orders_records() {
        let ds = parse_feed(XML).unwrap();

        assert_eq!(ds.len(), 3);
        let speeds: Vec<f64> = ds.records().iter().map(|r| r.speed()).collect();
        assert_eq!(speeds, vec![2.0, 3.0, 1.0]);
    }

    #[rstest]
    #[case("")]
    #[case("COMMENT nothing here\n")]
    #[case("<ndm><oem><body><segment><data></data></segment></body></oem></ndm>")]
    fn test_parse_feed_empty(#[case] content: &str) {
        assert!(matches!(parse_feed(content), Err(FeedError::EmptyDataset)));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(XML.as_bytes()).unwrap();

        let loader = FeedLoader::new(FeedSource::Path(file.path().to_path_buf()));
        let ds = loader.load().await.unwrap();
        assert_eq!(ds.len(), 3);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let loader = FeedLoader::new(FeedSource::Path("/nonexistent/iss.xml".into()));
        let err = loader.load().await.unwrap_err();
        assert!(matches!(err, FeedError::Io(_)));
        assert!(err.is_unavailable());
    }
}
