use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use thiserror::Error;
use uploader_logging::{uploader_debug, uploader_warn};
use url::Url;

use crate::client::{build_client, ClientSettings};
use crate::config::{load_config, ConfigLocation};
use crate::extract::{ExtractionApi, ReqwestExtractionApi};
use crate::store::{ObjectStore, ReqwestObjectStore, UploadBody};
use crate::{EngineEvent, Stage, SubmissionId, SubmissionProgress, TransferError};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to build http client: {0}")]
    Client(#[from] TransferError),
    #[error("failed to start engine: {0}")]
    Runtime(#[from] std::io::Error),
}

enum EngineCommand {
    LoadConfig {
        location: ConfigLocation,
    },
    Upload {
        id: SubmissionId,
        url: Url,
        content_type: String,
        body: UploadBody,
    },
    Extract {
        id: SubmissionId,
        url: Url,
    },
}

struct Backends {
    client: reqwest::Client,
    store: Arc<dyn ObjectStore>,
    api: Arc<dyn ExtractionApi>,
}

/// Handle to the background engine thread.
///
/// Every command runs as its own task; events arrive in completion order.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings) -> Result<Self, EngineError> {
        let client = build_client(&settings)?;
        let store = Arc::new(ReqwestObjectStore::new(client.clone()));
        let api = Arc::new(ReqwestExtractionApi::new(client.clone()));
        Self::with_backends(client, store, api)
    }

    /// Starts an engine over caller-provided backends.
    pub fn with_backends(
        client: reqwest::Client,
        store: Arc<dyn ObjectStore>,
        api: Arc<dyn ExtractionApi>,
    ) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;
        let backends = Arc::new(Backends { client, store, api });

        thread::Builder::new()
            .name("uploader-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let backends = backends.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        handle_command(&backends, command, event_tx).await;
                    });
                }
                uploader_debug!("Engine command channel closed");
            })?;

        Ok(Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        })
    }

    pub fn load_config(&self, location: ConfigLocation) {
        self.send(EngineCommand::LoadConfig { location });
    }

    pub fn upload(
        &self,
        id: SubmissionId,
        url: Url,
        content_type: impl Into<String>,
        body: UploadBody,
    ) {
        self.send(EngineCommand::Upload {
            id,
            url,
            content_type: content_type.into(),
            body,
        });
    }

    pub fn extract(&self, id: SubmissionId, url: Url) {
        self.send(EngineCommand::Extract { id, url });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }

    /// Blocks until the next event. `None` once the engine is gone or the
    /// event receiver is poisoned.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.recv().ok()
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            uploader_warn!("Engine thread is gone; command dropped");
        }
    }
}

async fn handle_command(
    backends: &Backends,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::LoadConfig { location } => {
            EngineEvent::ConfigLoaded(load_config(&location, &backends.client).await)
        }
        EngineCommand::Upload {
            id,
            url,
            content_type,
            body,
        } => {
            let _ = event_tx.send(EngineEvent::Progress(SubmissionProgress {
                id,
                stage: Stage::Uploading,
            }));
            let result = backends.store.put(&url, body, &content_type).await;
            EngineEvent::UploadCompleted { id, result }
        }
        EngineCommand::Extract { id, url } => {
            let _ = event_tx.send(EngineEvent::Progress(SubmissionProgress {
                id,
                stage: Stage::Extracting,
            }));
            let result = backends.api.fetch_text(&url).await;
            EngineEvent::ExtractionCompleted { id, result }
        }
    };
    let _ = event_tx.send(event);
}
