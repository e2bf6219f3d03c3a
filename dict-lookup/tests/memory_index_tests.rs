use std::io::Write;

use dict_lookup::memory_index::{DictFile, KanjiRecord, MemoryDict, NameRecord, WordRecord};
use dict_lookup::orchestrator::{translate, SearchSettings};
use dict_lookup::{KanjiSearcher, NameQueryOptions, NameSearcher, WordQueryOptions, WordSearcher};

fn word(kanji: Option<&str>, reading: &str, sense: &str, romaji: Option<&str>) -> WordRecord {
    WordRecord {
        kanji: kanji.map(str::to_string),
        reading: reading.into(),
        senses: vec![sense.into()],
        romaji: romaji.map(str::to_string),
    }
}

fn name(kanji: Option<&str>, reading: &str) -> NameRecord {
    NameRecord {
        kanji: kanji.map(str::to_string),
        reading: reading.into(),
        meanings: vec!["name".into()],
    }
}

fn sample_dict() -> MemoryDict {
    MemoryDict::from_records(DictFile {
        words: vec![
            word(Some("仏"), "ほとけ", "Buddha", Some("hotoke")),
            word(None, "ほとけごころ", "merciful heart", Some("hotokegokoro")),
            word(Some("猫"), "ねこ", "cat", Some("neko")),
            word(Some("犬"), "いぬ", "dog", Some("inu")),
        ],
        names: vec![
            name(Some("ほとけ沢"), "ほとけざわ"),
            name(None, "はなこ"),
        ],
        kanji: vec![KanjiRecord {
            literal: '犬',
            onyomi: vec!["ケン".into()],
            kunyomi: vec!["いぬ".into()],
            meanings: vec!["dog".into()],
        }],
    })
}

#[test]
fn longest_matching_prefix_wins() {
    let dict = sample_dict();
    let m = dict
        .query_words("ほとけごころが", &WordQueryOptions::default())
        .expect("query succeeds")
        .expect("match expected");
    assert_eq!(m.match_len, 6);
    assert_eq!(m.entries[0].reading, "ほとけごころ");

    let m = dict
        .query_words("ほとけさま", &WordQueryOptions::default())
        .expect("query succeeds")
        .expect("match expected");
    assert_eq!(m.match_len, 3, "falls back to the shorter entry");
    assert_eq!(m.entries[0].kanji.as_deref(), Some("仏"));
}

#[test]
fn kanji_surface_form_matches_too() {
    let dict = sample_dict();
    let m = dict
        .query_words("仏の顔", &WordQueryOptions::default())
        .expect("query succeeds")
        .expect("match expected");
    assert_eq!(m.match_len, 1);
    assert_eq!(m.entries[0].reading, "ほとけ");
}

#[test]
fn unmatched_input_returns_none() {
    let dict = sample_dict();
    assert!(dict
        .query_words("アメリカ", &WordQueryOptions::default())
        .expect("query succeeds")
        .is_none());
    assert!(dict
        .query_words("", &WordQueryOptions::default())
        .expect("query succeeds")
        .is_none());
}

#[test]
fn romaji_is_stripped_unless_requested() {
    let dict = sample_dict();
    let plain = dict
        .query_words("ねこ", &WordQueryOptions::default())
        .expect("query succeeds")
        .expect("match expected");
    assert_eq!(plain.entries[0].romaji, None);

    let opts = WordQueryOptions {
        include_romaji: true,
        ..Default::default()
    };
    let with_romaji = dict
        .query_words("ねこ", &opts)
        .expect("query succeeds")
        .expect("match expected");
    assert_eq!(with_romaji.entries[0].romaji.as_deref(), Some("neko"));
}

#[test]
fn entry_cap_sets_the_truncation_flag() {
    let dict = MemoryDict::from_records(DictFile {
        words: vec![
            word(Some("日"), "ひ", "day", None),
            word(Some("日"), "にち", "sun", None),
            word(Some("日"), "か", "counter for days", None),
        ],
        names: Vec::new(),
        kanji: Vec::new(),
    });
    let opts = WordQueryOptions {
        max_entries: Some(2),
        ..Default::default()
    };
    let m = dict
        .query_words("日", &opts)
        .expect("query succeeds")
        .expect("match expected");
    assert_eq!(m.entries.len(), 2);
    assert!(m.more);
}

#[test]
fn name_query_reports_per_entry_lengths_longest_first() {
    let dict = MemoryDict::from_records(DictFile {
        words: Vec::new(),
        names: vec![
            name(Some("仏"), "ほとけ"),
            name(Some("ほとけ沢"), "ほとけざわ"),
        ],
        kanji: Vec::new(),
    });
    let m = dict
        .query_names("ほとけ沢の家", &NameQueryOptions::default())
        .expect("query succeeds")
        .expect("match expected");
    assert_eq!(m.match_len, 4);
    assert_eq!(m.entries.len(), 2);
    assert_eq!(m.entries[0].match_len, 4);
    assert_eq!(m.entries[1].match_len, 3);
}

#[test]
fn name_query_honors_the_minimum_length() {
    let dict = sample_dict();
    let opts = NameQueryOptions { min_len: Some(4) };
    let m = dict
        .query_names("ほとけ沢の家", &opts)
        .expect("query succeeds")
        .expect("match expected");
    assert_eq!(m.match_len, 4);
    assert!(m.entries.iter().all(|e| e.match_len >= 4));

    let opts = NameQueryOptions { min_len: Some(5) };
    assert!(dict
        .query_names("ほとけ沢の家", &opts)
        .expect("query succeeds")
        .is_none());
}

#[test]
fn kanji_lookup_is_exact() {
    let dict = sample_dict();
    let m = dict
        .query_kanji('犬')
        .expect("query succeeds")
        .expect("match expected");
    assert_eq!(m.match_len, 1);
    assert_eq!(m.entry.literal, '犬');
    assert!(dict.query_kanji('猿').expect("query succeeds").is_none());
}

#[test]
fn loads_records_from_json() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(
        file,
        r#"{{
            "words": [{{"kanji": "猫", "reading": "ねこ", "senses": ["cat"]}}],
            "names": [{{"reading": "はなこ"}}],
            "kanji": [{{"literal": "犬", "meanings": ["dog"]}}]
        }}"#
    )
    .expect("write temp dict");

    let dict = MemoryDict::load_json(file.path()).expect("load succeeds");
    assert!(dict
        .query_words("ねこのて", &WordQueryOptions::default())
        .expect("query succeeds")
        .is_some());
    assert!(dict
        .query_names("はなこ", &NameQueryOptions::default())
        .expect("query succeeds")
        .is_some());
    assert!(dict.query_kanji('犬').expect("query succeeds").is_some());
}

#[test]
fn translate_scans_word_by_word() {
    let dict = sample_dict();
    let result = translate(&dict, "猫と犬", &SearchSettings::default())
        .expect("translate succeeds")
        .expect("some words recognized");
    assert_eq!(result.entries.len(), 2);
    assert_eq!(result.entries[0].reading, "ねこ");
    assert_eq!(result.entries[1].reading, "いぬ");
    assert_eq!(result.text_len, 3);
    assert!(!result.more);
}

#[test]
fn translate_returns_none_when_nothing_matches() {
    let dict = sample_dict();
    assert!(translate(&dict, "ABC", &SearchSettings::default())
        .expect("translate succeeds")
        .is_none());
}

#[test]
fn translate_caps_collected_entries() {
    let dict = sample_dict();
    // Sixteen consecutive words; the scan stops once the cap is reached.
    let text = "猫".repeat(16);
    let result = translate(&dict, &text, &SearchSettings::default())
        .expect("translate succeeds")
        .expect("some words recognized");
    assert_eq!(result.entries.len(), 8);
    assert!(result.more);
    assert_eq!(result.text_len, 8, "only the consumed prefix is counted");
}
