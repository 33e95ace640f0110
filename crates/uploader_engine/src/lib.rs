//! Uploader engine: IO pipeline and effect execution.
mod client;
mod config;
mod engine;
mod extract;
mod store;
mod types;

pub use client::{build_client, ClientSettings};
pub use config::{load_config, parse_config, ConfigDocument, ConfigError, ConfigLocation};
pub use engine::{EngineError, EngineHandle};
pub use extract::{ExtractionApi, ReqwestExtractionApi};
pub use store::{ObjectStore, ReqwestObjectStore, UploadBody};
pub use types::{
    EngineEvent, ExtractionOutcome, FailureKind, Stage, SubmissionId, SubmissionProgress,
    TransferError, UploadReceipt,
};
