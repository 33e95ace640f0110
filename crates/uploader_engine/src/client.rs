use std::time::Duration;

use crate::{FailureKind, TransferError};

/// Transport settings shared by every request the engine makes.
///
/// Both timeouts default to `None`: requests wait as long as the transport does.
#[derive(Debug, Clone, Default)]
pub struct ClientSettings {
    pub connect_timeout: Option<Duration>,
    pub request_timeout: Option<Duration>,
}

pub fn build_client(settings: &ClientSettings) -> Result<reqwest::Client, TransferError> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = settings.connect_timeout {
        builder = builder.connect_timeout(timeout);
    }
    if let Some(timeout) = settings.request_timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|err| TransferError::new(FailureKind::Network, err.to_string()))
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> TransferError {
    if err.is_timeout() {
        return TransferError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_builder() {
        return TransferError::new(FailureKind::InvalidUrl, err.to_string());
    }
    TransferError::new(FailureKind::Network, err.to_string())
}
