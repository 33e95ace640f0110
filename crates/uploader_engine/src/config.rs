use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uploader_logging::{uploader_debug, uploader_info};
use url::Url;

use crate::client::map_reqwest_error;

/// Wire shape of the configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigDocument {
    /// Object-store base URL uploads are PUT under.
    #[serde(rename = "UPLOAD_BUCKET", alias = "upload_bucket")]
    pub upload_bucket: String,
    /// Extraction API base URL.
    #[serde(rename = "API_URL", alias = "api_url")]
    pub api_url: String,
}

/// Where the configuration document is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigLocation {
    Path(PathBuf),
    Url(Url),
}

impl ConfigLocation {
    /// `http://` and `https://` locations are fetched, anything else is a local path.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            let url = Url::parse(trimmed).map_err(|err| ConfigError::InvalidLocation {
                location: trimmed.to_string(),
                message: err.to_string(),
            })?;
            Ok(ConfigLocation::Url(url))
        } else if trimmed.is_empty() {
            Err(ConfigError::InvalidLocation {
                location: raw.to_string(),
                message: "empty location".to_string(),
            })
        } else {
            Ok(ConfigLocation::Path(PathBuf::from(trimmed)))
        }
    }
}

impl fmt::Display for ConfigLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigLocation::Path(path) => write!(f, "{}", path.display()),
            ConfigLocation::Url(url) => write!(f, "{url}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid config location {location:?}: {message}")]
    InvalidLocation { location: String, message: String },
    #[error("failed to read config from {location}: {message}")]
    Read { location: String, message: String },
    #[error("config request to {location} returned http status {status}")]
    HttpStatus { location: String, status: u16 },
    #[error("failed to fetch config from {location}: {message}")]
    Network { location: String, message: String },
    #[error("invalid config document from {location}: {message}")]
    Parse { location: String, message: String },
}

/// Reads or fetches the configuration document and parses it.
pub async fn load_config(
    location: &ConfigLocation,
    client: &reqwest::Client,
) -> Result<ConfigDocument, ConfigError> {
    uploader_info!("Loading configuration from {}", location);
    let bytes = match location {
        ConfigLocation::Path(path) => {
            tokio::fs::read(path)
                .await
                .map_err(|err| ConfigError::Read {
                    location: location.to_string(),
                    message: err.to_string(),
                })?
        }
        ConfigLocation::Url(url) => fetch_document(url, client).await?,
    };
    uploader_debug!("Configuration document is {} bytes", bytes.len());
    parse_config(&bytes, &location.to_string())
}

/// Parses a configuration document; `location` only labels errors.
pub fn parse_config(bytes: &[u8], location: &str) -> Result<ConfigDocument, ConfigError> {
    serde_json::from_slice(bytes).map_err(|err| ConfigError::Parse {
        location: location.to_string(),
        message: err.to_string(),
    })
}

async fn fetch_document(url: &Url, client: &reqwest::Client) -> Result<Vec<u8>, ConfigError> {
    let network = |err: reqwest::Error| ConfigError::Network {
        location: url.to_string(),
        message: map_reqwest_error(err).to_string(),
    };
    let response = client.get(url.clone()).send().await.map_err(network)?;
    let status = response.status();
    if !status.is_success() {
        return Err(ConfigError::HttpStatus {
            location: url.to_string(),
            status: status.as_u16(),
        });
    }
    let bytes = response.bytes().await.map_err(network)?;
    Ok(bytes.to_vec())
}
