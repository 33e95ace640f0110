use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use pretty_assertions::assert_eq;
use uploader_engine::{
    ClientSettings, ConfigLocation, EngineEvent, EngineHandle, ExtractionApi, ExtractionOutcome,
    FailureKind, ObjectStore, Stage, SubmissionProgress, TransferError, UploadBody, UploadReceipt,
};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Collects events until `done` says stop or the deadline passes.
async fn collect_until(
    engine: &EngineHandle,
    mut done: impl FnMut(&[EngineEvent]) -> bool,
) -> Vec<EngineEvent> {
    let deadline = Instant::now() + Duration::from_secs(5);
    let mut events = Vec::new();
    while Instant::now() < deadline {
        match engine.try_recv() {
            Some(event) => {
                events.push(event);
                if done(&events) {
                    break;
                }
            }
            None => tokio::time::sleep(Duration::from_millis(10)).await,
        }
    }
    events
}

#[tokio::test(flavor = "multi_thread")]
async fn engine_reports_progress_then_upload_completion() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/uploads/a.txt"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let engine = EngineHandle::new(ClientSettings::default()).expect("engine");
    let url = Url::parse(&format!("{}/uploads/a.txt", server.uri())).unwrap();
    engine.upload(9, url, "text/plain", UploadBody::Bytes(Bytes::from_static(b"hi")));

    let events = collect_until(&engine, |events| {
        events
            .iter()
            .any(|e| matches!(e, EngineEvent::UploadCompleted { .. }))
    })
    .await;

    assert_eq!(
        events[0],
        EngineEvent::Progress(SubmissionProgress {
            id: 9,
            stage: Stage::Uploading,
        })
    );
    match &events[1] {
        EngineEvent::UploadCompleted { id, result } => {
            assert_eq!(*id, 9);
            let receipt = result.as_ref().expect("upload ok");
            assert_eq!(receipt.bytes_sent, 2);
        }
        other => panic!("expected upload completion, got {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn engine_reports_extraction_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let engine = EngineHandle::new(ClientSettings::default()).expect("engine");
    let url = Url::parse(&format!("{}/prod/?fileKey=a", server.uri())).unwrap();
    engine.extract(3, url);

    let events = collect_until(&engine, |events| {
        events
            .iter()
            .any(|e| matches!(e, EngineEvent::ExtractionCompleted { .. }))
    })
    .await;

    let failure = events.iter().find_map(|event| match event {
        EngineEvent::ExtractionCompleted { id: 3, result } => result.clone().err(),
        _ => None,
    });
    assert_eq!(failure.map(|err| err.kind), Some(FailureKind::HttpStatus(500)));
}

#[tokio::test(flavor = "multi_thread")]
async fn engine_loads_config() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/config.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"UPLOAD_BUCKET": "https://s/", "API_URL": "https://a/"}"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let engine = EngineHandle::new(ClientSettings::default()).expect("engine");
    engine.load_config(ConfigLocation::parse(&format!("{}/config.json", server.uri())).unwrap());

    let events = collect_until(&engine, |events| !events.is_empty()).await;
    match events.first() {
        Some(EngineEvent::ConfigLoaded(Ok(doc))) => {
            assert_eq!(doc.upload_bucket, "https://s/");
            assert_eq!(doc.api_url, "https://a/");
        }
        other => panic!("expected loaded config, got {other:?}"),
    }
}

/// Store that keeps every PUT in memory.
#[derive(Default)]
struct MemoryStore {
    puts: Mutex<Vec<(String, UploadBody, String)>>,
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put(
        &self,
        url: &Url,
        body: UploadBody,
        content_type: &str,
    ) -> Result<UploadReceipt, TransferError> {
        let bytes_sent = match &body {
            UploadBody::Bytes(bytes) => bytes.len() as u64,
            UploadBody::File(_) => 0,
        };
        self.puts
            .lock()
            .unwrap()
            .push((url.to_string(), body, content_type.to_string()));
        Ok(UploadReceipt {
            status: 201,
            bytes_sent,
        })
    }
}

/// Extraction API that answers with the requested key.
struct EchoKeyApi;

#[async_trait]
impl ExtractionApi for EchoKeyApi {
    async fn fetch_text(&self, url: &Url) -> Result<ExtractionOutcome, TransferError> {
        let key = url
            .query_pairs()
            .find(|(name, _)| name == "fileKey")
            .map(|(_, value)| format!("text of {value}"));
        Ok(ExtractionOutcome { text: key })
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn engine_runs_commands_on_provided_backends() {
    let store = Arc::new(MemoryStore::default());
    let engine =
        EngineHandle::with_backends(reqwest::Client::new(), store.clone(), Arc::new(EchoKeyApi))
            .unwrap();

    let upload_url = Url::parse("memory://bucket/uploads/a.txt").unwrap();
    engine.upload(
        3,
        upload_url,
        "text/plain",
        UploadBody::Bytes(Bytes::from_static(b"hello")),
    );
    let events = collect_until(&engine, |events| {
        events
            .iter()
            .any(|event| matches!(event, EngineEvent::UploadCompleted { .. }))
    })
    .await;
    assert_eq!(
        events.last(),
        Some(&EngineEvent::UploadCompleted {
            id: 3,
            result: Ok(UploadReceipt {
                status: 201,
                bytes_sent: 5,
            }),
        })
    );

    engine.extract(3, Url::parse("memory://api/?fileKey=a.txt").unwrap());
    let events = collect_until(&engine, |events| {
        events
            .iter()
            .any(|event| matches!(event, EngineEvent::ExtractionCompleted { .. }))
    })
    .await;
    assert_eq!(
        events,
        vec![
            EngineEvent::Progress(SubmissionProgress {
                id: 3,
                stage: Stage::Extracting,
            }),
            EngineEvent::ExtractionCompleted {
                id: 3,
                result: Ok(ExtractionOutcome {
                    text: Some("text of a.txt".to_string()),
                }),
            },
        ]
    );

    let puts = store.puts.lock().unwrap();
    assert_eq!(
        *puts,
        vec![(
            "memory://bucket/uploads/a.txt".to_string(),
            UploadBody::Bytes(Bytes::from_static(b"hello")),
            "text/plain".to_string(),
        )]
    );
}
