//! Dictionary cycling and result blending for a single lookup.

use match_model::{Continuation, Dict, MatchData, NameEntry, SearchResult, TranslateResult, WordMatch};
use tracing::debug;

use crate::{CancelToken, Dictionaries, NameQueryOptions, QueryError, WordQueryOptions, WordSearcher};

/// The order in which dictionaries are tried for an ordinary lookup.
pub const WORDS_FIRST: [Dict; 3] = [Dict::Words, Dict::Kanji, Dict::Names];

/// Alternate order used when a name match is judged more likely correct than
/// a word match. The word dictionary is excluded.
pub const NAMES_FIRST: [Dict; 2] = [Dict::Names, Dict::Kanji];

pub fn cycle_order(prefer_names: bool) -> &'static [Dict] {
    if prefer_names {
        &NAMES_FIRST
    } else {
        &WORDS_FIRST
    }
}

/// Next dictionary after `current` in `order`, wrapping. A `current` that is
/// not part of `order` (a words continuation under a names-first order) maps
/// to the order's first entry.
pub fn next_in_cycle(order: &[Dict], current: Dict) -> Dict {
    match order.iter().position(|d| *d == current) {
        Some(i) => order[(i + 1) % order.len()],
        None => order[0],
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The search was superseded or aborted before producing a result.
    #[error("search canceled")]
    Canceled,
    #[error(transparent)]
    Query(#[from] QueryError),
    /// The names dictionary reported a match while probing but failed to
    /// produce it after the cycle-order switch. Surfaced as an error instead
    /// of looping forever on an order that no longer contains the starting
    /// dictionary.
    #[error("names match disappeared between probe and lookup")]
    LostNamesMatch,
}

/// Settings read from the configuration collaborator at call time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchSettings {
    pub include_romaji: bool,
}

/// Supplementary name candidates attached to a word match, at most.
const MAX_EXTRA_NAMES: usize = 3;

/// Word entries collected while translating a run of text, at most.
const MAX_TRANSLATE_ENTRIES: usize = 8;

/// Run one lookup over `input`, cycling dictionaries according to the
/// continuation, and return the first match or `None` after a full cycle.
///
/// Fails with [`SearchError::Canceled`] as soon as `cancel` is observed
/// signalled at a checkpoint; a query already underway completes first.
pub fn search(
    dicts: &Dictionaries<'_>,
    input: &str,
    continuation: Continuation,
    settings: &SearchSettings,
    cancel: &CancelToken,
) -> Result<Option<SearchResult>, SearchError> {
    let mut prefer_names = continuation.prefer_names;
    let mut order = cycle_order(prefer_names);
    let mut dict = match continuation.prev_dict {
        Some(prev) => next_in_cycle(order, prev),
        None => order[0],
    };
    let original = dict;
    // Set when the heuristic switches the cycle order: the names query right
    // after the switch must succeed, or the loop would never wrap back to
    // `original`.
    let mut names_hit_required = false;

    loop {
        if cancel.is_canceled() {
            return Err(SearchError::Canceled);
        }

        debug!(?dict, "querying dictionary");
        let hit = match dict {
            Dict::Words => word_search(dicts, input, settings, cancel)?.map(MatchData::Words),
            Dict::Kanji => match input.chars().next() {
                Some(first) => dicts.kanji.query_kanji(first)?.map(MatchData::Kanji),
                None => None,
            },
            Dict::Names => dicts
                .names
                .query_names(input, &NameQueryOptions::default())?
                .map(MatchData::Names),
        };

        if let Some(data) = hit {
            return Ok(Some(SearchResult { data, prefer_names }));
        }

        if names_hit_required && dict == Dict::Names {
            return Err(SearchError::LostNamesMatch);
        }

        // Checking again here can save the names lookup below, which is the
        // expensive one.
        if cancel.is_canceled() {
            return Err(SearchError::Canceled);
        }

        if continuation.prev_dict.is_none()
            && !prefer_names
            && dict == Dict::Words
            && has_strong_name_match(dicts, input)?
        {
            // Restart the walk on the names-first order. `original` stays
            // untouched: the new order no longer contains it, so termination
            // now rests on the names match the probe just found.
            debug!("switching to names-first cycle order");
            prefer_names = true;
            order = cycle_order(true);
            dict = order[0];
            names_hit_required = true;
        } else {
            order = cycle_order(prefer_names);
            dict = next_in_cycle(order, dict);
        }

        if dict == original {
            return Ok(None);
        }
    }
}

/// Word lookup plus the longer-name enrichment pass.
fn word_search(
    dicts: &Dictionaries<'_>,
    input: &str,
    settings: &SearchSettings,
    cancel: &CancelToken,
) -> Result<Option<WordMatch>, SearchError> {
    let opts = WordQueryOptions {
        max_entries: None,
        include_romaji: settings.include_romaji,
    };
    let mut result = match dicts.words.query_words(input, &opts)? {
        Some(r) => r,
        None => return Ok(None),
    };

    // The names lookup below can add considerably to the total lookup time,
    // so bail out first if this search has already been superseded.
    if cancel.is_canceled() {
        return Err(SearchError::Canceled);
    }

    // Look for a strictly longer match in the names dictionary; an equal or
    // shorter name match adds nothing over the word entries.
    let name_opts = NameQueryOptions {
        min_len: Some(result.match_len + 1),
    };
    if let Some(name_match) = dicts.names.query_names(input, &name_opts)? {
        let mut names: Vec<NameEntry> = Vec::new();
        for (i, name) in name_match.entries.iter().enumerate() {
            // Once a kanji-bearing reading has established the full match
            // length, shorter also-possible readings are noise.
            if name.has_kanji() && name.match_len < name_match.match_len {
                break;
            }
            if i >= MAX_EXTRA_NAMES {
                result.more_names = true;
                break;
            }
            names.push(name.clone());
        }
        result.names = Some(names);
        // The name interpretation now defines the span shown to the user.
        result.match_len = name_match.match_len;
    }

    Ok(Some(result))
}

/// Probe for a name match strong enough to prioritize the names dictionary.
///
/// Only consulted once the words dictionary has missed, which leaves kanji
/// and names as the viable dictionaries; kanji lookups key on a single
/// character, so even an all-kana name match of two or more characters is a
/// better answer than falling through to kanji.
fn has_strong_name_match(dicts: &Dictionaries<'_>, input: &str) -> Result<bool, SearchError> {
    let probe = dicts.names.query_names(input, &NameQueryOptions::default())?;
    // A single-character name match is too weak a signal to reorder on.
    Ok(probe.map_or(false, |m| m.match_len > 1))
}

/// Translate a title-like run of text by repeatedly matching the word
/// dictionary against the remaining text, skipping one character wherever
/// nothing matches.
pub fn translate(
    words: &dyn WordSearcher,
    text: &str,
    settings: &SearchSettings,
) -> Result<Option<TranslateResult>, SearchError> {
    let total = text.chars().count();
    let opts = WordQueryOptions {
        max_entries: Some(1),
        include_romaji: settings.include_romaji,
    };
    let mut remaining = text;
    let mut entries = Vec::new();
    let mut more = false;

    while !remaining.is_empty() {
        let skip = match words.query_words(remaining, &opts)? {
            Some(m) if !m.entries.is_empty() => {
                if entries.len() >= MAX_TRANSLATE_ENTRIES {
                    more = true;
                    break;
                }
                entries.push(m.entries[0].clone());
                // A zero-length match must still make progress.
                m.match_len.max(1)
            }
            _ => 1,
        };
        remaining = skip_chars(remaining, skip);
    }

    if entries.is_empty() {
        return Ok(None);
    }
    Ok(Some(TranslateResult {
        entries,
        text_len: total - remaining.chars().count(),
        more,
    }))
}

fn skip_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[idx..],
        None => "",
    }
}
