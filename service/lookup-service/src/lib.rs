use std::sync::{Arc, Mutex, RwLock};

use dict_lookup::orchestrator::{self, SearchError, SearchSettings};
use dict_lookup::{CancelToken, Dictionaries, KanjiSearcher, NameSearcher, QueryError, WordSearcher};
use match_model::{Continuation, SearchResult, TranslateResult};
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("query failure: {0}")]
    Query(#[from] QueryError),
    #[error("internal error: {0}")]
    Internal(String),
}

/// Callback consulted for current settings on every request; never cached.
pub type SettingsProvider = Arc<dyn Fn() -> SearchSettings + Send + Sync>;

/// Lookup boundary for the pop-up front end: owns the dictionary backends,
/// the single in-flight cancellation token, and the settings provider.
///
/// At most one logical search runs at a time. Starting a new one signals the
/// previous search's token; the superseded search aborts at its next
/// checkpoint and its outcome is discarded.
pub struct LookupService {
    words: Arc<dyn WordSearcher + Send + Sync>,
    kanji: Arc<dyn KanjiSearcher + Send + Sync>,
    names: Arc<dyn NameSearcher + Send + Sync>,
    settings_provider: RwLock<Option<SettingsProvider>>,
    pending: Mutex<Option<CancelToken>>,
}

impl LookupService {
    pub fn new(
        words: Arc<dyn WordSearcher + Send + Sync>,
        kanji: Arc<dyn KanjiSearcher + Send + Sync>,
        names: Arc<dyn NameSearcher + Send + Sync>,
    ) -> Self {
        Self {
            words,
            kanji,
            names,
            settings_provider: RwLock::new(None),
            pending: Mutex::new(None),
        }
    }

    /// Install or replace the dynamic settings provider.
    pub fn set_settings_provider(&self, provider: SettingsProvider) {
        if let Ok(mut w) = self.settings_provider.write() {
            *w = Some(provider);
        }
    }

    fn current_settings(&self) -> SearchSettings {
        let prov = match self.settings_provider.read() {
            Ok(g) => g.clone(),
            Err(_) => None,
        };
        match prov {
            Some(cb) => cb(),
            None => SearchSettings::default(),
        }
    }

    /// Start a new logical search, superseding any search still in flight.
    ///
    /// A search that gets superseded yields `Ok(None)`: it produced nothing
    /// to show, which is not a failure. Genuine query failures from the
    /// dictionary primitives are surfaced unchanged.
    pub fn search(
        &self,
        input: &str,
        continuation: Continuation,
    ) -> Result<Option<SearchResult>, ServiceError> {
        let token = self.begin_request();
        let settings = self.current_settings();
        let dicts = Dictionaries {
            words: self.words.as_ref(),
            kanji: self.kanji.as_ref(),
            names: self.names.as_ref(),
        };
        let outcome = orchestrator::search(&dicts, input, continuation, &settings, &token);
        self.finish_request(&token);
        match outcome {
            Ok(result) => Ok(result),
            Err(SearchError::Canceled) => {
                debug!("search superseded before completing");
                Ok(None)
            }
            Err(SearchError::Query(e)) => Err(ServiceError::Query(e)),
            Err(other) => Err(ServiceError::Internal(other.to_string())),
        }
    }

    /// Translate a title-like run of text word by word.
    pub fn translate(&self, text: &str) -> Result<Option<TranslateResult>, ServiceError> {
        let settings = self.current_settings();
        match orchestrator::translate(self.words.as_ref(), text, &settings) {
            Ok(result) => Ok(result),
            Err(SearchError::Query(e)) => Err(ServiceError::Query(e)),
            Err(other) => Err(ServiceError::Internal(other.to_string())),
        }
    }

    /// Signal the in-flight search, if any, without starting a new one.
    pub fn cancel_pending(&self) {
        if let Ok(mut g) = self.pending.lock() {
            if let Some(token) = g.take() {
                if !token.is_canceled() {
                    token.cancel();
                }
            }
        }
    }

    /// True while a search holds the in-flight slot.
    pub fn has_pending_search(&self) -> bool {
        self.pending.lock().map(|g| g.is_some()).unwrap_or(false)
    }

    fn begin_request(&self) -> CancelToken {
        let token = CancelToken::new();
        if let Ok(mut g) = self.pending.lock() {
            if let Some(prev) = g.replace(token.clone()) {
                if !prev.is_canceled() {
                    debug!("superseding in-flight search");
                    prev.cancel();
                }
            }
        }
        token
    }

    /// Clear the stored token only when it is still the one this request
    /// installed; a newer request may have replaced it already.
    fn finish_request(&self, token: &CancelToken) {
        if let Ok(mut g) = self.pending.lock() {
            let is_current = g.as_ref().map(|cur| cur.is_same(token)).unwrap_or(false);
            if is_current {
                *g = None;
            }
        }
    }
}
