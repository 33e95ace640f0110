use std::path::PathBuf;

use bytes::Bytes;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use tokio_util::io::ReaderStream;
use uploader_logging::uploader_debug;
use url::Url;

use crate::client::map_reqwest_error;
use crate::{FailureKind, TransferError, UploadReceipt};

/// Bytes to PUT: held in memory or streamed from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadBody {
    Bytes(Bytes),
    File(PathBuf),
}

impl UploadBody {
    async fn into_request_body(self) -> Result<(reqwest::Body, u64), TransferError> {
        match self {
            UploadBody::Bytes(bytes) => {
                let len = bytes.len() as u64;
                Ok((reqwest::Body::from(bytes), len))
            }
            UploadBody::File(path) => {
                let io_error = |err: std::io::Error| {
                    TransferError::new(FailureKind::Io, format!("{}: {err}", path.display()))
                };
                let file = tokio::fs::File::open(&path).await.map_err(io_error)?;
                let len = file.metadata().await.map_err(io_error)?.len();
                Ok((reqwest::Body::wrap_stream(ReaderStream::new(file)), len))
            }
        }
    }
}

#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// PUTs `body` to `url`. Any 2xx status is success; the response body is ignored.
    async fn put(
        &self,
        url: &Url,
        body: UploadBody,
        content_type: &str,
    ) -> Result<UploadReceipt, TransferError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestObjectStore {
    client: reqwest::Client,
}

impl ReqwestObjectStore {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl ObjectStore for ReqwestObjectStore {
    async fn put(
        &self,
        url: &Url,
        body: UploadBody,
        content_type: &str,
    ) -> Result<UploadReceipt, TransferError> {
        let (body, len) = body.into_request_body().await?;
        // Object stores reject chunked PUTs, so the length is always explicit.
        let mut request = self
            .client
            .put(url.clone())
            .header(CONTENT_LENGTH, len)
            .body(body);
        if !content_type.is_empty() {
            request = request.header(CONTENT_TYPE, content_type);
        }

        uploader_debug!("PUT {} ({} bytes, type {:?})", url, len, content_type);
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransferError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        Ok(UploadReceipt {
            status: status.as_u16(),
            bytes_sent: len,
        })
    }
}
