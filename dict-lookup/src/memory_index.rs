//! In-memory reference backend for the three dictionary primitives.
//!
//! Real deployments put the dictionaries behind persistent indexes; this
//! backend keeps everything in maps and serves longest-matching-prefix
//! queries over them, which is enough for the CLI tool and for tests.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use match_model::{KanjiEntry, KanjiMatch, NameEntry, NameMatch, WordEntry, WordMatch};

use crate::{
    KanjiSearcher, NameQueryOptions, NameSearcher, QueryError, WordQueryOptions, WordSearcher,
};

/// Entries a single name match reports, at most.
const MAX_NAME_ENTRIES: usize = 20;

/// One word record as stored, before any per-query shaping.
#[derive(Debug, Clone, Deserialize)]
pub struct WordRecord {
    #[serde(default)]
    pub kanji: Option<String>,
    pub reading: String,
    #[serde(default)]
    pub senses: Vec<String>,
    #[serde(default)]
    pub romaji: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NameRecord {
    #[serde(default)]
    pub kanji: Option<String>,
    pub reading: String,
    #[serde(default)]
    pub meanings: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KanjiRecord {
    pub literal: char,
    #[serde(default)]
    pub onyomi: Vec<String>,
    #[serde(default)]
    pub kunyomi: Vec<String>,
    #[serde(default)]
    pub meanings: Vec<String>,
}

/// On-disk JSON shape consumed by [`MemoryDict::load_json`].
#[derive(Debug, Default, Deserialize)]
pub struct DictFile {
    #[serde(default)]
    pub words: Vec<WordRecord>,
    #[serde(default)]
    pub names: Vec<NameRecord>,
    #[serde(default)]
    pub kanji: Vec<KanjiRecord>,
}

/// Map-backed dictionary set. Word and name records are indexed under both
/// their kanji and kana surface forms so either spelling of the input
/// matches.
pub struct MemoryDict {
    words: HashMap<String, Vec<WordRecord>>,
    names: HashMap<String, Vec<NameRecord>>,
    kanji: HashMap<char, KanjiRecord>,
}

impl MemoryDict {
    pub fn from_records(file: DictFile) -> Self {
        let mut words: HashMap<String, Vec<WordRecord>> = HashMap::new();
        for rec in file.words {
            if let Some(k) = &rec.kanji {
                words.entry(k.clone()).or_default().push(rec.clone());
            }
            if rec.kanji.as_deref() != Some(rec.reading.as_str()) {
                words.entry(rec.reading.clone()).or_default().push(rec);
            }
        }
        let mut names: HashMap<String, Vec<NameRecord>> = HashMap::new();
        for rec in file.names {
            if let Some(k) = &rec.kanji {
                names.entry(k.clone()).or_default().push(rec.clone());
            }
            if rec.kanji.as_deref() != Some(rec.reading.as_str()) {
                names.entry(rec.reading.clone()).or_default().push(rec);
            }
        }
        let mut kanji = HashMap::new();
        for rec in file.kanji {
            kanji.insert(rec.literal, rec);
        }
        Self {
            words,
            names,
            kanji,
        }
    }

    pub fn load_json(path: &Path) -> Result<Self, QueryError> {
        let raw = fs::read_to_string(path).map_err(|e| QueryError::Storage(e.to_string()))?;
        let file: DictFile =
            serde_json::from_str(&raw).map_err(|e| QueryError::Data(e.to_string()))?;
        Ok(Self::from_records(file))
    }
}

impl WordSearcher for MemoryDict {
    fn query_words(
        &self,
        input: &str,
        opts: &WordQueryOptions,
    ) -> Result<Option<WordMatch>, QueryError> {
        let total = input.chars().count();
        for len in (1..=total).rev() {
            let prefix = prefix_chars(input, len);
            let recs = match self.words.get(prefix) {
                Some(r) => r,
                None => continue,
            };
            let cap = opts.max_entries.unwrap_or(usize::MAX);
            let mut entries = Vec::new();
            let mut more = false;
            for rec in recs {
                if entries.len() >= cap {
                    more = true;
                    break;
                }
                entries.push(WordEntry {
                    kanji: rec.kanji.clone(),
                    reading: rec.reading.clone(),
                    senses: rec.senses.clone(),
                    romaji: if opts.include_romaji {
                        rec.romaji.clone()
                    } else {
                        None
                    },
                });
            }
            let mut m = WordMatch::new(entries, len);
            m.more = more;
            return Ok(Some(m));
        }
        Ok(None)
    }
}

impl KanjiSearcher for MemoryDict {
    fn query_kanji(&self, literal: char) -> Result<Option<KanjiMatch>, QueryError> {
        Ok(self.kanji.get(&literal).map(|rec| {
            KanjiMatch::new(KanjiEntry {
                literal: rec.literal,
                onyomi: rec.onyomi.clone(),
                kunyomi: rec.kunyomi.clone(),
                meanings: rec.meanings.clone(),
            })
        }))
    }
}

impl NameSearcher for MemoryDict {
    fn query_names(
        &self,
        input: &str,
        opts: &NameQueryOptions,
    ) -> Result<Option<NameMatch>, QueryError> {
        let floor = opts.min_len.unwrap_or(1).max(1);
        let total = input.chars().count();
        if floor > total {
            return Ok(None);
        }

        let mut entries: Vec<NameEntry> = Vec::new();
        let mut match_len = 0;
        let mut more = false;
        'lengths: for len in (floor..=total).rev() {
            let prefix = prefix_chars(input, len);
            let recs = match self.names.get(prefix) {
                Some(r) => r,
                None => continue,
            };
            if match_len == 0 {
                match_len = len;
            }
            for rec in recs {
                if entries.len() >= MAX_NAME_ENTRIES {
                    more = true;
                    break 'lengths;
                }
                entries.push(NameEntry {
                    kanji: rec.kanji.clone(),
                    reading: rec.reading.clone(),
                    meanings: rec.meanings.clone(),
                    match_len: len,
                });
            }
        }

        if match_len == 0 {
            return Ok(None);
        }
        Ok(Some(NameMatch {
            entries,
            match_len,
            more,
        }))
    }
}

fn prefix_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
