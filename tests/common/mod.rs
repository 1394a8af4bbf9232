//! Shared test doubles: a recording shell, a scripted HTTP client and a
//! fully wired runtime over in-memory stores.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use quotedeck::app::ViewModel;
use quotedeck::runtime::{HttpClient, KeyValueStore, Runtime, Shell};
use quotedeck::storage::MemoryStore;
use quotedeck::{App, Config, ExportFile, HttpError, HttpRequest, HttpResponse};

#[derive(Clone, Default)]
pub struct RecordingShell {
    views: Arc<Mutex<Vec<ViewModel>>>,
    exports: Arc<Mutex<Vec<ExportFile>>>,
}

impl RecordingShell {
    pub fn last_view(&self) -> ViewModel {
        self.views
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("nothing was rendered")
    }

    pub fn render_count(&self) -> usize {
        self.views.lock().unwrap().len()
    }

    pub fn exports(&self) -> Vec<ExportFile> {
        self.exports.lock().unwrap().clone()
    }
}

impl Shell for RecordingShell {
    fn render(&self, view: ViewModel) {
        self.views.lock().unwrap().push(view);
    }

    fn deliver_export(&self, file: ExportFile) {
        self.exports.lock().unwrap().push(file);
    }
}

/// Replays a fixed sequence of fetch results; anything past the script fails
/// as a transport error.
#[derive(Default)]
pub struct ScriptedHttp {
    responses: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedHttp {
    pub fn new(responses: impl IntoIterator<Item = Result<HttpResponse, HttpError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpClient for ScriptedHttp {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(HttpError::Transport {
                    message: "script exhausted".to_string(),
                })
            })
    }
}

pub struct Harness {
    pub runtime: Runtime<RecordingShell>,
    pub shell: RecordingShell,
    pub http: Arc<ScriptedHttp>,
    pub durable: Arc<MemoryStore>,
    pub session: Arc<MemoryStore>,
}

pub fn harness(responses: Vec<Result<HttpResponse, HttpError>>) -> Harness {
    harness_with_stores(
        Arc::new(MemoryStore::new()),
        Arc::new(MemoryStore::new()),
        responses,
    )
}

pub fn harness_with_stores(
    durable: Arc<MemoryStore>,
    session: Arc<MemoryStore>,
    responses: Vec<Result<HttpResponse, HttpError>>,
) -> Harness {
    let shell = RecordingShell::default();
    let http = Arc::new(ScriptedHttp::new(responses));
    let durable_dyn: Arc<dyn KeyValueStore> = durable.clone();
    let session_dyn: Arc<dyn KeyValueStore> = session.clone();
    let http_dyn: Arc<dyn HttpClient> = http.clone();
    let runtime = Runtime::new(
        App::new(Config::default()),
        durable_dyn,
        session_dyn,
        http_dyn,
        shell.clone(),
    );
    Harness {
        runtime,
        shell,
        http,
        durable,
        session,
    }
}

/// A feed body shaped like the remote endpoint's, with `count` posts.
pub fn posts_body(count: usize) -> Vec<u8> {
    let posts: Vec<serde_json::Value> = (1..=count)
        .map(|i| serde_json::json!({ "userId": 1, "id": i, "title": format!("post {i}"), "body": "..." }))
        .collect();
    serde_json::to_vec(&posts).unwrap()
}

pub fn ok_posts(count: usize) -> Result<HttpResponse, HttpError> {
    Ok(HttpResponse::new(200, posts_body(count)))
}
