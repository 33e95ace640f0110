use serde::Deserialize;
use uploader_logging::uploader_debug;
use url::Url;

use crate::client::map_reqwest_error;
use crate::{ExtractionOutcome, FailureKind, TransferError};

/// Body of an extraction response; only `extracted_text` is read.
#[derive(Debug, Deserialize)]
struct ExtractionResponse {
    #[serde(default)]
    extracted_text: Option<String>,
}

#[async_trait::async_trait]
pub trait ExtractionApi: Send + Sync {
    /// GETs `url` and reads the extracted text from its JSON body.
    async fn fetch_text(&self, url: &Url) -> Result<ExtractionOutcome, TransferError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestExtractionApi {
    client: reqwest::Client,
}

impl ReqwestExtractionApi {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl ExtractionApi for ReqwestExtractionApi {
    async fn fetch_text(&self, url: &Url) -> Result<ExtractionOutcome, TransferError> {
        uploader_debug!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransferError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let body = response.bytes().await.map_err(map_reqwest_error)?;
        let parsed: ExtractionResponse = serde_json::from_slice(&body)
            .map_err(|err| TransferError::new(FailureKind::Parse, err.to_string()))?;

        Ok(ExtractionOutcome {
            text: parsed.extracted_text,
        })
    }
}
