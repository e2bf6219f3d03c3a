use std::env;
use std::path::Path;
use std::sync::Arc;

use dict_lookup::memory_index::MemoryDict;
use dict_lookup::orchestrator::SearchSettings;
use lookup_service::LookupService;
use match_model::{Continuation, MatchData, SearchResult};

fn print_usage() {
    eprintln!(
        "Usage:\n\
         lookup-cli search DICT_JSON --input TEXT [--cycles N] [--romaji] [--json]\n\
         lookup-cli translate DICT_JSON --text TEXT [--romaji] [--json]\n\
         \n\
         Notes: --cycles re-runs the lookup with the returned continuation, the way\n\
         repeated pop-up triggers cycle through dictionaries. DICT_JSON holds\n\
         {{\"words\": [...], \"names\": [...], \"kanji\": [...]}} records.\n"
    );
}

fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339()
}

fn main() {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        print_usage();
        std::process::exit(2);
    }
    let cmd = args[0].clone();
    let tail = args[1..].to_vec();
    let result = match cmd.as_str() {
        "search" => do_search(tail),
        "translate" => do_translate(tail),
        _ => {
            print_usage();
            Err(format!("unknown command: {cmd}"))
        }
    };
    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn load_service(dict_path: &str, romaji: bool) -> Result<LookupService, String> {
    let dict = MemoryDict::load_json(Path::new(dict_path))
        .map_err(|e| format!("failed to load {dict_path}: {e}"))?;
    let dict = Arc::new(dict);
    let svc = LookupService::new(dict.clone(), dict.clone(), dict);
    svc.set_settings_provider(Arc::new(move || SearchSettings {
        include_romaji: romaji,
    }));
    Ok(svc)
}

fn do_search(mut tail: Vec<String>) -> Result<(), String> {
    if tail.is_empty() || tail[0].starts_with('-') {
        return Err("search requires a dictionary JSON path".into());
    }
    let dict_path = tail.remove(0);

    let mut input: Option<String> = None;
    let mut cycles: usize = 1;
    let mut romaji = false;
    let mut json = false;

    let mut i = 0;
    while i < tail.len() {
        match tail[i].as_str() {
            "--input" => {
                if i + 1 < tail.len() {
                    input = Some(tail[i + 1].clone());
                    i += 2;
                } else {
                    return Err("--input requires text".into());
                }
            }
            "--cycles" => {
                if i + 1 < tail.len() {
                    cycles = tail[i + 1].parse().map_err(|_| "--cycles requires a number")?;
                    i += 2;
                } else {
                    return Err("--cycles requires a number".into());
                }
            }
            "--romaji" => {
                romaji = true;
                i += 1;
            }
            "--json" => {
                json = true;
                i += 1;
            }
            _ => {
                i += 1;
            }
        }
    }

    let input = input.ok_or("provide --input TEXT")?;
    let svc = load_service(&dict_path, romaji)?;

    if !json {
        println!("# lookup-cli search at {} input={input}", now_iso());
    }
    let mut continuation = Continuation::default();
    for round in 0..cycles.max(1) {
        let result = svc
            .search(&input, continuation)
            .map_err(|e| e.to_string())?;
        match &result {
            Some(hit) => {
                if json {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(hit).map_err(|e| e.to_string())?
                    );
                } else {
                    print_hit(round, hit);
                }
                continuation = hit.continuation();
            }
            None => {
                if !json {
                    println!("round {round}: no match in any dictionary");
                }
                break;
            }
        }
    }
    Ok(())
}

fn do_translate(mut tail: Vec<String>) -> Result<(), String> {
    if tail.is_empty() || tail[0].starts_with('-') {
        return Err("translate requires a dictionary JSON path".into());
    }
    let dict_path = tail.remove(0);

    let mut text: Option<String> = None;
    let mut romaji = false;
    let mut json = false;

    let mut i = 0;
    while i < tail.len() {
        match tail[i].as_str() {
            "--text" => {
                if i + 1 < tail.len() {
                    text = Some(tail[i + 1].clone());
                    i += 2;
                } else {
                    return Err("--text requires text".into());
                }
            }
            "--romaji" => {
                romaji = true;
                i += 1;
            }
            "--json" => {
                json = true;
                i += 1;
            }
            _ => {
                i += 1;
            }
        }
    }

    let text = text.ok_or("provide --text TEXT")?;
    let svc = load_service(&dict_path, romaji)?;

    match svc.translate(&text).map_err(|e| e.to_string())? {
        Some(result) => {
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&result).map_err(|e| e.to_string())?
                );
            } else {
                println!(
                    "# lookup-cli translate at {} consumed {} chars{}",
                    now_iso(),
                    result.text_len,
                    if result.more { " (truncated)" } else { "" }
                );
                for entry in &result.entries {
                    println!("  {}", format_word(entry));
                }
            }
        }
        None => println!("no words recognized"),
    }
    Ok(())
}

fn format_word(entry: &match_model::WordEntry) -> String {
    let mut line = match &entry.kanji {
        Some(k) => format!("{k} [{}]", entry.reading),
        None => entry.reading.clone(),
    };
    if let Some(r) = &entry.romaji {
        line.push_str(&format!(" ({r})"));
    }
    if !entry.senses.is_empty() {
        line.push_str(&format!(" - {}", entry.senses.join("; ")));
    }
    line
}

fn print_hit(round: usize, hit: &SearchResult) {
    match &hit.data {
        MatchData::Words(m) => {
            println!(
                "round {round}: words, {} chars, {} entries{}",
                m.match_len,
                m.entries.len(),
                if m.more { " (truncated)" } else { "" }
            );
            for entry in &m.entries {
                println!("  {}", format_word(entry));
            }
            if let Some(names) = &m.names {
                println!("  also matching names:");
                for n in names {
                    match &n.kanji {
                        Some(k) => println!("    {k} [{}] ({} chars)", n.reading, n.match_len),
                        None => println!("    {} ({} chars)", n.reading, n.match_len),
                    }
                }
                if m.more_names {
                    println!("    ...more names available");
                }
            }
        }
        MatchData::Kanji(m) => {
            let e = &m.entry;
            println!(
                "round {round}: kanji 「{}」 on: {} kun: {} - {}",
                e.literal,
                e.onyomi.join("、"),
                e.kunyomi.join("、"),
                e.meanings.join("; ")
            );
        }
        MatchData::Names(m) => {
            println!(
                "round {round}: names, {} chars, {} entries{} (prefer-names {})",
                m.match_len,
                m.entries.len(),
                if m.more { " (truncated)" } else { "" },
                hit.prefer_names
            );
            for n in &m.entries {
                match &n.kanji {
                    Some(k) => println!("  {k} [{}] - {}", n.reading, n.meanings.join("; ")),
                    None => println!("  {} - {}", n.reading, n.meanings.join("; ")),
                }
            }
        }
    }
}
