use std::path::PathBuf;

/// Where the bytes of a selected file live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileBody {
    InMemory(Vec<u8>),
    OnDisk(PathBuf),
}

/// A file chosen in the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// Original file name, without directories.
    pub name: String,
    /// Declared MIME type; empty when unknown.
    pub content_type: String,
    pub body: FileBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Configuration document loaded and parsed.
    ConfigLoaded(crate::RemoteConfig),
    /// Configuration could not be fetched or parsed.
    ConfigLoadFailed(String),
    /// User submitted the form, with or without a file selected.
    FormSubmitted {
        file: Option<SelectedFile>,
        /// Unix time of the submission in milliseconds.
        submitted_at_ms: i64,
    },
    /// Engine started working on a step of a submission.
    SubmissionProgress {
        id: crate::SubmissionId,
        stage: crate::Stage,
    },
    /// Object-store PUT finished; `Err` carries the diagnostic.
    UploadFinished {
        id: crate::SubmissionId,
        result: Result<(), String>,
    },
    /// Extraction GET finished; `Ok(None)` means the text field was absent.
    ExtractionFinished {
        id: crate::SubmissionId,
        result: Result<Option<String>, String>,
    },
}
