//! Drives the pure core from an async shell.
//!
//! The runtime owns the model and executes effects one at a time, feeding
//! each capability result straight back into [`App::update`] before the next
//! effect runs. Mutating flows therefore complete before the next scheduled
//! operation starts, which is the whole concurrency story: one logical
//! thread of control plus a single-slot in-flight guard for sync.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::app::{App, ViewModel};
use crate::capabilities::http::{HttpRequest, HttpResult};
use crate::capabilities::kv::{KvError, KvOperation, StoreKey, StoreNamespace};
use crate::capabilities::{Effect, ExportFile};
use crate::event::Event;
use crate::model::Model;
use crate::{KEY_LAST_VIEWED_INDEX, KEY_QUOTES, KEY_SELECTED_CATEGORY};

/// Byte-oriented store backing one namespace.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KvError>;
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), KvError>;
}

/// Executes the GET requests the core asks for.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> HttpResult;
}

/// The presentation side of the shell. Called synchronously from the
/// dispatch loop.
pub trait Shell: Send + Sync {
    fn render(&self, view: ViewModel);
    fn deliver_export(&self, file: ExportFile);
}

pub struct Runtime<S: Shell> {
    app: App,
    model: Model,
    durable: Arc<dyn KeyValueStore>,
    session: Arc<dyn KeyValueStore>,
    http: Arc<dyn HttpClient>,
    shell: S,
}

impl<S: Shell> Runtime<S> {
    pub fn new(
        app: App,
        durable: Arc<dyn KeyValueStore>,
        session: Arc<dyn KeyValueStore>,
        http: Arc<dyn HttpClient>,
        shell: S,
    ) -> Self {
        Self {
            app,
            model: Model::default(),
            durable,
            session,
            http,
            shell,
        }
    }

    #[must_use]
    pub fn model(&self) -> &Model {
        &self.model
    }

    #[must_use]
    pub fn view(&self) -> ViewModel {
        self.app.view(&self.model)
    }

    /// Feeds one event into the core and runs the resulting effects to
    /// completion, including every follow-up event they produce.
    pub async fn dispatch(&mut self, event: Event) {
        let mut pending = VecDeque::from([event]);
        while let Some(event) = pending.pop_front() {
            let effects = self.app.update(event, &mut self.model);
            for effect in effects {
                if let Some(follow_up) = self.execute(effect).await {
                    pending.push_back(follow_up);
                }
            }
        }
    }

    /// Runs the full lifecycle: startup, then external events and sync ticks
    /// until the event channel closes.
    pub async fn run(&mut self, mut events: mpsc::UnboundedReceiver<Event>) {
        self.dispatch(Event::Start).await;

        let mut ticker = tokio::time::interval(self.app.config().sync_interval);
        // The first tick fires immediately and startup already fetches.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.dispatch(Event::SyncTick).await;
                }
                event = events.recv() => {
                    match event {
                        Some(event) => self.dispatch(event).await,
                        None => {
                            debug!("event channel closed, shutting down");
                            break;
                        }
                    }
                }
            }
        }
    }

    async fn execute(&mut self, effect: Effect) -> Option<Event> {
        match effect {
            Effect::KeyValue(op) => self.execute_kv(op).await,
            Effect::Http(request) => {
                let result = self.http.execute(request).await;
                Some(Event::RemoteFetched(Box::new(result)))
            }
            Effect::Render => {
                self.shell.render(self.app.view(&self.model));
                None
            }
            Effect::Export(file) => {
                self.shell.deliver_export(file);
                None
            }
        }
    }

    async fn execute_kv(&self, op: KvOperation) -> Option<Event> {
        match op {
            KvOperation::Get { key } => {
                let result = self.store_for(&key).get(key.key()).await;
                match key.key() {
                    KEY_QUOTES => Some(Event::QuotesLoaded(result)),
                    KEY_SELECTED_CATEGORY => Some(Event::SelectedCategoryLoaded(result)),
                    KEY_LAST_VIEWED_INDEX => Some(Event::LastViewedLoaded(result)),
                    other => {
                        warn!(key = other, "read of unrecognized store key");
                        None
                    }
                }
            }
            KvOperation::Set { key, value } => {
                let result = self.store_for(&key).set(key.key(), value).await;
                Some(Event::StoreWritten(result))
            }
        }
    }

    fn store_for(&self, key: &StoreKey) -> &dyn KeyValueStore {
        match key.namespace() {
            StoreNamespace::Durable => self.durable.as_ref(),
            StoreNamespace::Session => self.session.as_ref(),
        }
    }
}
