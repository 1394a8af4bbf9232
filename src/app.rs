//! The event-driven core.
//!
//! `update` consumes one event, mutates the model, and returns the effects
//! the shell must execute. It performs no I/O itself, which is what makes
//! the whole quote lifecycle testable without a shell.

use tracing::{debug, error, info, warn};

use crate::capabilities::http::HttpRequest;
use crate::capabilities::kv::{KvOperation, StoreKey};
use crate::capabilities::Effect;
use crate::event::Event;
use crate::model::{CategoryFilter, Model, Quote};
use crate::{selector, sync, transfer, Config, QuoteError, FETCH_TIMEOUT, TOAST_DURATION_MS};

pub use crate::model::{Display, Toast};

use serde::{Deserialize, Serialize};

/// Everything the presentation adapter needs to draw the widget. Computed
/// from the model on demand; categories are recomputed, not maintained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewModel {
    pub display: Display,
    pub categories: Vec<String>,
    pub selected_category: CategoryFilter,
    pub alert: Option<String>,
    pub toast: Option<Toast>,
    pub clear_inputs: bool,
}

#[derive(Debug, Clone, Default)]
pub struct App {
    config: Config,
}

impl App {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn update(&self, event: Event, model: &mut Model) -> Vec<Effect> {
        match event {
            Event::Start => {
                debug!("starting quote core");
                vec![
                    Effect::KeyValue(KvOperation::get(StoreKey::quotes())),
                    Effect::KeyValue(KvOperation::get(StoreKey::selected_category())),
                ]
            }

            Event::QuotesLoaded(result) => self.handle_quotes_loaded(result, model),

            Event::SelectedCategoryLoaded(result) => match result {
                Ok(Some(bytes)) => {
                    let raw = String::from_utf8_lossy(&bytes);
                    model.selected_category = CategoryFilter::parse(&raw);
                    if model.loaded {
                        refresh_list(model);
                    }
                    vec![Effect::Render]
                }
                Ok(None) => Vec::new(),
                Err(e) => {
                    warn!(error = %e, "could not read persisted category filter");
                    Vec::new()
                }
            },

            Event::LastViewedLoaded(result) => self.handle_last_viewed(result, model),

            Event::NewQuoteSubmitted { text, category } => {
                begin_user_action(model);
                match model.add_quote(text, category) {
                    Ok(()) => {
                        model.alert = Some("Quote added successfully!".to_string());
                        model.clear_inputs = true;
                        refresh_list(model);
                        let mut effects = Vec::new();
                        effects.extend(flush_quotes(model));
                        effects.push(Effect::Render);
                        effects
                    }
                    Err(e) => {
                        model.alert = Some(QuoteError::from(e).user_message());
                        vec![Effect::Render]
                    }
                }
            }

            Event::ShowRandomRequested => {
                begin_user_action(model);
                let picked = {
                    let view = model.filtered();
                    selector::pick_random(&mut rand::thread_rng(), &view)
                        .map(|(index, quote)| (index, quote.clone()))
                };
                match picked {
                    Ok((index, quote)) => {
                        model.last_viewed_index = Some(index);
                        model.display = Display::Quote(quote);
                        vec![
                            Effect::KeyValue(KvOperation::set(
                                StoreKey::last_viewed_index(),
                                index.to_string().into_bytes(),
                            )),
                            Effect::Render,
                        ]
                    }
                    Err(_) => {
                        // Empty view: explicit empty state, not an error.
                        model.last_viewed_index = None;
                        model.display = Display::Empty;
                        vec![Effect::Render]
                    }
                }
            }

            Event::CategorySelected { raw } => {
                begin_user_action(model);
                model.selected_category = CategoryFilter::parse(&raw);
                refresh_list(model);
                vec![
                    Effect::KeyValue(KvOperation::set(
                        StoreKey::selected_category(),
                        model.selected_category.as_str().as_bytes().to_vec(),
                    )),
                    Effect::Render,
                ]
            }

            Event::ExportRequested => {
                begin_user_action(model);
                vec![Effect::Export(transfer::export_file(&model.quotes))]
            }

            Event::ImportFileLoaded { payload } => {
                begin_user_action(model);
                match transfer::parse_import(&payload) {
                    Ok(quotes) => {
                        // Import is additive and does not deduplicate; only
                        // the periodic sync merge does.
                        model.append_all(quotes);
                        model.alert = Some("Quotes imported successfully!".to_string());
                        refresh_list(model);
                        let mut effects = Vec::new();
                        effects.extend(flush_quotes(model));
                        effects.push(Effect::Render);
                        effects
                    }
                    Err(e) => {
                        model.alert = Some(QuoteError::from(e).user_message());
                        vec![Effect::Render]
                    }
                }
            }

            Event::SyncTick => {
                if !model.loaded {
                    debug!("sync tick before startup completed; skipping");
                    return Vec::new();
                }
                if model.sync_in_flight {
                    debug!("sync tick skipped; previous fetch still in flight");
                    return Vec::new();
                }
                model.sync_in_flight = true;
                vec![Effect::Http(self.fetch_request())]
            }

            Event::RemoteFetched(result) => {
                model.sync_in_flight = false;
                match *result {
                    Ok(response) => {
                        match sync::quotes_from_response(
                            &response,
                            self.config.remote_cap,
                            &self.config.server_category,
                        ) {
                            Ok(candidates) => self.reconcile(candidates, model),
                            Err(e) => {
                                warn!(error = %e, "remote feed rejected");
                                Vec::new()
                            }
                        }
                    }
                    Err(e) => {
                        // Fetch failures are logged and swallowed; the next
                        // scheduled tick is the retry.
                        warn!(error = %e, "quote sync fetch failed");
                        Vec::new()
                    }
                }
            }

            Event::StoreWritten(result) => match result {
                Ok(()) => Vec::new(),
                Err(e) => {
                    error!(error = %e, "failed to persist quote state");
                    model.alert = Some(QuoteError::from(e).user_message());
                    vec![Effect::Render]
                }
            },
        }
    }

    #[must_use]
    pub fn view(&self, model: &Model) -> ViewModel {
        ViewModel {
            display: model.display.clone(),
            categories: selector::categories(&model.quotes),
            selected_category: model.selected_category.clone(),
            alert: model.alert.clone(),
            toast: model.toast.clone(),
            clear_inputs: model.clear_inputs,
        }
    }

    fn handle_quotes_loaded(
        &self,
        result: Result<Option<Vec<u8>>, crate::KvError>,
        model: &mut Model,
    ) -> Vec<Effect> {
        let persisted = match result {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(error = %e, "could not read persisted quotes");
                None
            }
        };
        let had_payload = persisted.is_some();
        let seeded = model.load_quotes(persisted.as_deref());
        if seeded && had_payload {
            warn!("persisted quotes were undecodable; falling back to the seed set");
        }
        refresh_list(model);

        // Startup completion: restore the session's last-viewed quote and
        // kick off the first sync.
        model.sync_in_flight = true;
        vec![
            Effect::KeyValue(KvOperation::get(StoreKey::last_viewed_index())),
            Effect::Http(self.fetch_request()),
            Effect::Render,
        ]
    }

    fn handle_last_viewed(
        &self,
        result: Result<Option<Vec<u8>>, crate::KvError>,
        model: &mut Model,
    ) -> Vec<Effect> {
        let Ok(Some(bytes)) = result else {
            return Vec::new();
        };
        let Some(index) = String::from_utf8(bytes)
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
        else {
            return Vec::new();
        };

        // Only valid while the filtered view still covers that index.
        let restored = {
            let view = model.filtered();
            view.get(index).map(|quote| (*quote).clone())
        };
        match restored {
            Some(quote) => {
                model.last_viewed_index = Some(index);
                model.display = Display::Quote(quote);
                vec![Effect::Render]
            }
            None => Vec::new(),
        }
    }

    fn reconcile(&self, candidates: Vec<Quote>, model: &mut Model) -> Vec<Effect> {
        if !model.merge_quotes(candidates) {
            debug!("remote feed contained nothing new");
            return Vec::new();
        }
        info!("merged new quotes from the remote feed");
        model.toast = Some(Toast {
            message: "New quotes synced from server!".to_string(),
            duration_ms: TOAST_DURATION_MS,
        });
        refresh_list(model);
        let mut effects = Vec::new();
        effects.extend(flush_quotes(model));
        effects.push(Effect::Render);
        effects
    }

    #[allow(clippy::cast_possible_truncation)]
    fn fetch_request(&self) -> HttpRequest {
        HttpRequest::get(self.config.endpoint.clone())
            .with_timeout_ms(FETCH_TIMEOUT.as_millis() as u64)
    }
}

/// Transient display state lives for exactly one user action.
fn begin_user_action(model: &mut Model) {
    model.alert = None;
    model.toast = None;
    model.clear_inputs = false;
}

fn refresh_list(model: &mut Model) {
    let view: Vec<Quote> = model.filtered().into_iter().cloned().collect();
    model.display = if view.is_empty() {
        Display::Empty
    } else {
        Display::List(view)
    };
}

/// Serializes the full collection for the durable store. The store and the
/// in-memory collection must be equal after every mutation, so this runs on
/// every mutating path.
fn flush_quotes(model: &Model) -> Option<Effect> {
    match serde_json::to_vec(&model.quotes) {
        Ok(bytes) => Some(Effect::KeyValue(KvOperation::set(
            StoreKey::quotes(),
            bytes,
        ))),
        Err(e) => {
            error!(error = %e, "could not serialize quote collection");
            None
        }
    }
}
