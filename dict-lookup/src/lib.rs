pub mod memory_index;
pub mod orchestrator;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use match_model::{KanjiMatch, NameMatch, WordMatch};

/// Failure of an underlying dictionary primitive. Propagated to callers
/// unchanged; retry policy belongs to the storage layer, not here.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("storage error: {0}")]
    Storage(String),
    #[error("malformed dictionary data: {0}")]
    Data(String),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WordQueryOptions {
    /// Cap on returned entries; the match reports `more` when it truncates.
    pub max_entries: Option<usize>,
    /// Include romanized readings in returned entries.
    pub include_romaji: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NameQueryOptions {
    /// Only report a match consuming at least this many characters.
    pub min_len: Option<usize>,
}

/// Word-dictionary query primitive: longest matching prefix of the input.
pub trait WordSearcher {
    fn query_words(
        &self,
        input: &str,
        opts: &WordQueryOptions,
    ) -> Result<Option<WordMatch>, QueryError>;
}

/// Kanji-dictionary query primitive: keys on a single character.
pub trait KanjiSearcher {
    fn query_kanji(&self, literal: char) -> Result<Option<KanjiMatch>, QueryError>;
}

/// Name-dictionary query primitive: longest matching prefix, optionally
/// constrained to a minimum consumed length.
pub trait NameSearcher {
    fn query_names(
        &self,
        input: &str,
        opts: &NameQueryOptions,
    ) -> Result<Option<NameMatch>, QueryError>;
}

/// Borrowed bundle of the three query primitives handed to the search loop.
#[derive(Clone, Copy)]
pub struct Dictionaries<'a> {
    pub words: &'a dyn WordSearcher,
    pub kanji: &'a dyn KanjiSearcher,
    pub names: &'a dyn NameSearcher,
}

/// Cooperative cancellation handle checked at every search checkpoint.
/// One-shot: once signalled it never resets.
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }
    pub fn is_canceled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
    /// True when both handles refer to the same underlying flag. Used by the
    /// request sequencer to clear only the token it installed.
    pub fn is_same(&self, other: &CancelToken) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}
