use crate::{Stage, SubmissionId};

/// Shown when the extraction response carries no text.
pub const NO_TEXT_PLACEHOLDER: &str = "No text found.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigStatus {
    #[default]
    NotLoaded,
    Loaded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub config: ConfigStatus,
    /// Content of the output element; `None` until the first render.
    pub output: Option<String>,
    /// Bumped on every write to the output, even when the text is unchanged.
    pub output_revision: u64,
    pub in_flight: usize,
    /// In-flight submissions, oldest first.
    pub submissions: Vec<SubmissionRowView>,
    pub done: usize,
    pub failed: usize,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRowView {
    pub id: SubmissionId,
    pub file_name: String,
    pub object_key: String,
    pub stage: Stage,
}
