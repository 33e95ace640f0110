use url::Url;

pub const CONFIG_FAILED_ALERT: &str = "Failed to load configuration. Please try again later.";
pub const CONFIG_PENDING_ALERT: &str = "Configuration is still loading. Please try again shortly.";
pub const NO_FILE_ALERT: &str = "Please select a file!";
pub const BUSY_ALERT: &str = "An upload is already in progress.";
pub const GENERIC_FAILURE_ALERT: &str = "An error occurred. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// PUT the file body to `url`.
    Upload {
        id: crate::SubmissionId,
        url: Url,
        object_key: String,
        file: crate::SelectedFile,
    },
    /// GET the extracted text from `url`.
    Extract { id: crate::SubmissionId, url: Url },
    /// Show `message` to the user; `diagnostic` is for the log only.
    Alert {
        message: String,
        diagnostic: Option<String>,
    },
}

impl Effect {
    pub(crate) fn alert(message: &str) -> Self {
        Effect::Alert {
            message: message.to_string(),
            diagnostic: None,
        }
    }

    pub(crate) fn alert_with(message: &str, diagnostic: impl Into<String>) -> Self {
        Effect::Alert {
            message: message.to_string(),
            diagnostic: Some(diagnostic.into()),
        }
    }
}
