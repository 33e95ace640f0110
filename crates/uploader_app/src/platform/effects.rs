use std::sync::mpsc;
use std::thread;

use bytes::Bytes;
use uploader_core::{Effect, FileBody, Msg, RemoteConfig, Stage};
use uploader_engine::{
    ClientSettings, ConfigLocation, EngineError, EngineEvent, EngineHandle, UploadBody,
};
use uploader_logging::{uploader_debug, uploader_info, uploader_warn};

use super::app::LoopEvent;

/// Executes core effects on the engine and feeds engine events back as messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: ClientSettings, tx: mpsc::Sender<LoopEvent>) -> Result<Self, EngineError> {
        let engine = EngineHandle::new(settings)?;
        let runner = Self { engine };
        runner.spawn_event_loop(tx);
        Ok(runner)
    }

    pub fn load_config(&self, location: ConfigLocation) {
        self.engine.load_config(location);
    }

    /// Runs network effects and returns the alert messages to show.
    pub fn enqueue(&self, effects: Vec<Effect>) -> Vec<String> {
        let mut alerts = Vec::new();
        for effect in effects {
            match effect {
                Effect::Upload {
                    id,
                    url,
                    object_key,
                    file,
                } => {
                    uploader_info!(
                        "Upload submission={} key={:?} type={:?}",
                        id,
                        object_key,
                        file.content_type
                    );
                    let body = match file.body {
                        FileBody::InMemory(bytes) => UploadBody::Bytes(Bytes::from(bytes)),
                        FileBody::OnDisk(path) => UploadBody::File(path),
                    };
                    self.engine.upload(id, url, file.content_type, body);
                }
                Effect::Extract { id, url } => {
                    uploader_info!("Extract submission={} url={}", id, url);
                    self.engine.extract(id, url);
                }
                Effect::Alert {
                    message,
                    diagnostic,
                } => {
                    if let Some(diagnostic) = diagnostic {
                        uploader_warn!("{}", diagnostic);
                    }
                    alerts.push(message);
                }
            }
        }
        alerts
    }

    fn spawn_event_loop(&self, tx: mpsc::Sender<LoopEvent>) {
        let engine = self.engine.clone();
        thread::spawn(move || {
            while let Some(event) = engine.recv() {
                if tx.send(LoopEvent::Core(to_msg(event))).is_err() {
                    uploader_debug!("Event loop receiver gone; stopping");
                    return;
                }
            }
            uploader_debug!("Engine events unavailable; stopping");
        });
    }
}

fn to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::ConfigLoaded(Ok(doc)) => {
            uploader_info!(
                "Configuration loaded: store={} api={}",
                doc.upload_bucket,
                doc.api_url
            );
            Msg::ConfigLoaded(RemoteConfig::new(doc.upload_bucket, doc.api_url))
        }
        EngineEvent::ConfigLoaded(Err(err)) => Msg::ConfigLoadFailed(err.to_string()),
        EngineEvent::Progress(progress) => Msg::SubmissionProgress {
            id: progress.id,
            stage: map_stage(progress.stage),
        },
        EngineEvent::UploadCompleted { id, result } => Msg::UploadFinished {
            id,
            result: match result {
                Ok(receipt) => {
                    uploader_debug!(
                        "Submission {} uploaded {} bytes (status {})",
                        id,
                        receipt.bytes_sent,
                        receipt.status
                    );
                    Ok(())
                }
                Err(err) => Err(err.to_string()),
            },
        },
        EngineEvent::ExtractionCompleted { id, result } => Msg::ExtractionFinished {
            id,
            result: result
                .map(|outcome| outcome.text)
                .map_err(|err| err.to_string()),
        },
    }
}

fn map_stage(stage: uploader_engine::Stage) -> Stage {
    match stage {
        uploader_engine::Stage::Uploading => Stage::Uploading,
        uploader_engine::Stage::Extracting => Stage::Extracting,
    }
}
