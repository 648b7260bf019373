use serde::{Deserialize, Deserializer};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::feed::DEFAULT_FEED_URL;
use crate::geo::DEFAULT_NOMINATIM_URL;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub web: WebConfig,
    pub feed: FeedConfig,
    pub geocoder: GeocoderConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:5000".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// URL or local path of the OEM file
    #[serde(default = "default_feed_source")]
    pub source: String,
    #[serde(default, deserialize_with = "deserialize_option_duration")]
    pub refresh_interval: Option<Duration>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            source: default_feed_source(),
            refresh_interval: None,
        }
    }
}

fn default_feed_source() -> String {
    DEFAULT_FEED_URL.to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    pub enabled: bool,
    pub url: String,
    pub user_agent: String,
    pub zoom: u8,
    pub language: String,
    #[serde(deserialize_with = "deserialize_duration")]
    pub timeout: Duration,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: DEFAULT_NOMINATIM_URL.to_string(),
            user_agent: "iss_tracker".to_string(),
            zoom: 15,
            language: "en".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    #[serde(deserialize_with = "deserialize_duration")]
    pub ttl: Duration,
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: Duration::from_secs(3600),
            capacity: 4096,
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        content.parse()
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        let config: Config = serde_yaml::from_str(content)?;
        Ok(config)
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(s.trim()).map_err(serde::de::Error::custom)
}

fn deserialize_option_duration<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => humantime::parse_duration(raw.trim())
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}
