//! Shared models used across crates

use serde::{Deserialize, Serialize};

/// The dictionaries a lookup can be served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dict {
    Words,
    Kanji,
    Names,
}

/// A single vocabulary entry returned by the word dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    /// Kanji headword, absent for kana-only entries.
    pub kanji: Option<String>,
    pub reading: String,
    pub senses: Vec<String>,
    /// Romanized reading, populated only when the caller asked for it.
    pub romaji: Option<String>,
}

/// Result of a word-dictionary lookup: entries for the longest matching
/// prefix of the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordMatch {
    pub entries: Vec<WordEntry>,
    /// Leading characters of the input consumed by the match.
    pub match_len: usize,
    /// True when the entry list was truncated by the caller-supplied cap.
    pub more: bool,
    /// Supplementary name candidates covering a longer span than the word
    /// match itself. At most three are stored.
    pub names: Option<Vec<NameEntry>>,
    /// True when a fourth supplementary name candidate existed.
    pub more_names: bool,
}

impl WordMatch {
    pub fn new(entries: Vec<WordEntry>, match_len: usize) -> Self {
        Self {
            entries,
            match_len,
            more: false,
            names: None,
            more_names: false,
        }
    }
}

/// A single character entry from the kanji dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KanjiEntry {
    pub literal: char,
    pub onyomi: Vec<String>,
    pub kunyomi: Vec<String>,
    pub meanings: Vec<String>,
}

/// Result of a kanji-dictionary lookup. Always consumes exactly one
/// character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KanjiMatch {
    pub entry: KanjiEntry,
    pub match_len: usize,
}

impl KanjiMatch {
    pub fn new(entry: KanjiEntry) -> Self {
        Self {
            entry,
            match_len: 1,
        }
    }
}

/// A single entry from the name dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameEntry {
    /// Kanji form of the name, absent for kana-only entries.
    pub kanji: Option<String>,
    pub reading: String,
    pub meanings: Vec<String>,
    /// Leading characters of the input consumed by this particular entry.
    /// Entries within one `NameMatch` may consume different lengths.
    pub match_len: usize,
}

impl NameEntry {
    pub fn has_kanji(&self) -> bool {
        self.kanji.is_some()
    }
}

/// Result of a name-dictionary lookup. Entries are ordered longest consumed
/// length first; `match_len` is the longest among them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameMatch {
    pub entries: Vec<NameEntry>,
    pub match_len: usize,
    /// True when the entry list was truncated.
    pub more: bool,
}

/// Caller-held cycling state. Passing the continuation from a previous
/// result makes the next search resume from the following dictionary in
/// cycle order instead of restarting at words.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Continuation {
    pub prev_dict: Option<Dict>,
    pub prefer_names: bool,
}

/// Match data tagged with the dictionary that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "dict", content = "match")]
pub enum MatchData {
    Words(WordMatch),
    Kanji(KanjiMatch),
    Names(NameMatch),
}

/// A completed search: the winning match plus the prefer-names flag that was
/// in effect, echoed back so callers can carry it into the next cycle
/// trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(flatten)]
    pub data: MatchData,
    pub prefer_names: bool,
}

impl SearchResult {
    pub fn dict(&self) -> Dict {
        match self.data {
            MatchData::Words(_) => Dict::Words,
            MatchData::Kanji(_) => Dict::Kanji,
            MatchData::Names(_) => Dict::Names,
        }
    }

    pub fn match_len(&self) -> usize {
        match &self.data {
            MatchData::Words(m) => m.match_len,
            MatchData::Kanji(m) => m.match_len,
            MatchData::Names(m) => m.match_len,
        }
    }

    /// Continuation a caller should pass to resume cycling from this result.
    pub fn continuation(&self) -> Continuation {
        Continuation {
            prev_dict: Some(self.dict()),
            prefer_names: self.prefer_names,
        }
    }
}

/// Result of translating a title-like run of text word by word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateResult {
    /// First entry of each word match found while scanning the text.
    pub entries: Vec<WordEntry>,
    /// Leading characters of the text consumed by the scan.
    pub text_len: usize,
    /// True when the entry cap was reached before the text ran out.
    pub more: bool,
}
