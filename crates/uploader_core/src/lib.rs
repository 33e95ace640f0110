//! Uploader core: pure state machine and view-model helpers.
mod config;
mod effect;
mod key;
mod msg;
mod state;
mod update;
mod urls;
mod view_model;

pub use config::{ConfigState, RemoteConfig};
pub use effect::{
    Effect, BUSY_ALERT, CONFIG_FAILED_ALERT, CONFIG_PENDING_ALERT, GENERIC_FAILURE_ALERT,
    NO_FILE_ALERT,
};
pub use key::{derive_object_key, KeyStrategy};
pub use msg::{FileBody, Msg, SelectedFile};
pub use state::{AppState, ConcurrencyPolicy, ControllerOptions, DisplayPolicy, Stage, SubmissionId};
pub use update::update;
pub use urls::{extract_url, upload_url, UrlError, FILE_KEY_PARAM};
pub use view_model::{AppViewModel, ConfigStatus, SubmissionRowView, NO_TEXT_PLACEHOLDER};
