use gamebook_core::{
    candidates, filter, rewrite_body_images, strip_html, CatalogIndex, Entry, ProbeController,
    Query, ASSETS_ROOT, SELECT_ALL,
};
use gamebook_data::load_catalog;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
struct CliOptions {
    records: PathBuf,
    locale: String,
    category: Option<String>,
    term: String,
    show: Option<String>,
    probe_dir: Option<PathBuf>,
    json: bool,
}

fn default_records_path() -> PathBuf {
    if let Some(path) = std::env::var_os("GAMEBOOK_RECORDS") {
        return PathBuf::from(path);
    }
    PathBuf::from("assets/records.json")
}

fn parse_cli_options(args: &[String]) -> CliOptions {
    let mut records = default_records_path();
    let mut locale_arg: Option<String> = std::env::var("GAMEBOOK_LANG").ok();
    let mut category = None;
    let mut term = String::new();
    let mut show = None;
    let mut probe_dir = None;
    let mut json = false;
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--records" | "-r" => {
                if let Some(value) = args.get(idx + 1) {
                    records = PathBuf::from(value);
                    idx += 1;
                }
            }
            "--lang" | "-l" => {
                if let Some(value) = args.get(idx + 1) {
                    locale_arg = Some(value.clone());
                    idx += 1;
                }
            }
            "--category" | "-c" => {
                if let Some(value) = args.get(idx + 1) {
                    category = Some(value.clone());
                    idx += 1;
                }
            }
            "--search" | "-s" => {
                if let Some(value) = args.get(idx + 1) {
                    term = value.clone();
                    idx += 1;
                }
            }
            "--show" => {
                if let Some(value) = args.get(idx + 1) {
                    show = Some(value.clone());
                    idx += 1;
                }
            }
            "--probe" => {
                if let Some(value) = args.get(idx + 1) {
                    probe_dir = Some(PathBuf::from(value));
                    idx += 1;
                }
            }
            "--json" => json = true,
            _ => {}
        }
        idx += 1;
    }
    CliOptions {
        records,
        locale: gamebook_core::normalize_locale(locale_arg.as_deref()),
        category,
        term,
        show,
        probe_dir,
        json,
    }
}

fn print_usage() {
    println!("gamebook-cli [options]");
    println!("  --records, -r PATH   record set to load (or GAMEBOOK_RECORDS)");
    println!("  --lang, -l CODE      display locale (or GAMEBOOK_LANG)");
    println!("  --category, -c NAME  filter by category or slug");
    println!("  --search, -s TERM    free-text filter over name and body");
    println!("  --show KEY           detail view for one entry by slug or id");
    println!("  --probe DIR          resolve images against files under DIR");
    println!("  --json               machine-readable listing");
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        print_usage();
        return;
    }
    let options = parse_cli_options(&args);

    let outcome = load_catalog(&options.records, &options.locale);
    for warning in &outcome.warnings {
        eprintln!("warning: {warning}");
    }
    if outcome.failed {
        eprintln!("catalog load failed: {}", options.records.display());
        std::process::exit(1);
    }

    match &options.show {
        Some(key) => show_entry(&outcome.index, key, options.probe_dir.as_deref()),
        None => list_entries(&outcome.index, &options),
    }
}

#[derive(Serialize)]
struct UiEntry<'a> {
    id: &'a str,
    slug: &'a str,
    name: String,
    category: Option<&'a str>,
    text: String,
    candidates: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    resolved_image: Option<String>,
}

fn ui_entry<'a>(index: &CatalogIndex, entry: &'a Entry, probe_dir: Option<&Path>) -> UiEntry<'a> {
    let display = index.resolve(entry);
    UiEntry {
        id: &entry.id,
        slug: &entry.slug,
        name: display.name,
        category: entry.category.as_deref(),
        text: strip_html(&display.text),
        candidates: candidates(entry),
        resolved_image: probe_dir.map(|dir| probe_entry(entry, dir)),
    }
}

fn list_entries(index: &CatalogIndex, options: &CliOptions) {
    let query = Query {
        category: options.category.clone(),
        term: options.term.clone(),
    };
    let hits = filter(index, &query);

    if options.json {
        let rows: Vec<UiEntry> = hits
            .iter()
            .map(|entry| ui_entry(index, entry, options.probe_dir.as_deref()))
            .collect();
        match serde_json::to_string_pretty(&rows) {
            Ok(payload) => println!("{payload}"),
            Err(err) => {
                eprintln!("serialize error: {err}");
                std::process::exit(1);
            }
        }
        return;
    }

    let selected = options.category.as_deref().unwrap_or(SELECT_ALL);
    println!(
        "Showing {} of {} entries [{}] locale={}",
        hits.len(),
        index.len(),
        index.normalize_selection(selected),
        index.locale()
    );
    for count in index.categories() {
        println!("  {} ({})", count.category, count.count);
    }
    println!();
    for entry in hits {
        let row = ui_entry(index, entry, options.probe_dir.as_deref());
        let category = row.category.unwrap_or("-");
        match row.resolved_image {
            Some(image) => println!("{:<28} {:<14} {} -> {}", row.name, category, row.slug, image),
            None => println!("{:<28} {:<14} {}", row.name, category, row.slug),
        }
    }
}

fn show_entry(index: &CatalogIndex, key: &str, probe_dir: Option<&Path>) {
    let Some(entry) = index.entry_by_key(key) else {
        eprintln!("no entry for key '{key}'");
        std::process::exit(1);
    };
    let display = index.resolve(entry);
    println!("{}", display.name);
    println!("slug: {}  id: {}", entry.slug, entry.id);
    if let Some(category) = entry.category.as_deref() {
        println!("category: {category}");
    }
    println!();
    println!("{}", strip_html(&display.text));
    println!();
    println!("body html:");
    println!("{}", rewrite_body_images(&display.text));
    println!();
    println!("image candidates:");
    for url in candidates(entry) {
        println!("  {url}");
    }
    if let Some(dir) = probe_dir {
        println!("resolved image: {}", probe_entry(entry, dir));
    }
}

/// Drive the probe controller against files under `dir`, standing in for
/// the asset origin: a candidate "loads" when its file exists.
fn probe_entry(entry: &Entry, dir: &Path) -> String {
    let mut probe = ProbeController::for_entry(entry);
    while !probe.loaded() {
        let exists = asset_file(dir, probe.current_url())
            .map(|path| path.exists())
            .unwrap_or(false);
        let event = if exists {
            probe.success_event()
        } else {
            probe.failure_event()
        };
        probe.handle(event);
    }
    probe.current_url().to_string()
}

/// Map a candidate URL to a file below `dir`. Remote URLs have no local
/// counterpart and always miss.
fn asset_file(dir: &Path, url: &str) -> Option<PathBuf> {
    let file = url.strip_prefix(ASSETS_ROOT)?;
    Some(dir.join(decode_component(file)))
}

fn decode_component(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut idx = 0usize;
    while idx < bytes.len() {
        if bytes[idx] == b'%' {
            if let Some(byte) = hex_pair(bytes.get(idx + 1), bytes.get(idx + 2)) {
                out.push(byte);
                idx += 3;
                continue;
            }
        }
        out.push(bytes[idx]);
        idx += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_pair(high: Option<&u8>, low: Option<&u8>) -> Option<u8> {
    let high = (*high? as char).to_digit(16)?;
    let low = (*low? as char).to_digit(16)?;
    Some((high * 16 + low) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_parse_flag_value_pairs() {
        let args: Vec<String> = [
            "--records",
            "data.json",
            "--lang",
            "fr-CA",
            "--category",
            "Cards",
            "--search",
            "wheel",
            "--json",
        ]
        .iter()
        .map(ToString::to_string)
        .collect();
        let options = parse_cli_options(&args);
        assert_eq!(options.records, PathBuf::from("data.json"));
        assert_eq!(options.locale, "fr-ca");
        assert_eq!(options.category.as_deref(), Some("Cards"));
        assert_eq!(options.term, "wheel");
        assert!(options.json);
        assert!(options.show.is_none());
    }

    #[test]
    fn decode_reverses_percent_escapes() {
        assert_eq!(decode_component("Sic%20Bo%20Table.png"), "Sic Bo Table.png");
        assert_eq!(decode_component("plain.jpg"), "plain.jpg");
        assert_eq!(decode_component("broken%2"), "broken%2");
    }

    #[test]
    fn remote_candidates_have_no_local_file() {
        assert!(asset_file(Path::new("assets"), "https://cdn.example.com/a.jpg").is_none());
        assert_eq!(
            asset_file(Path::new("assets"), "/assets/wheel.jpg"),
            Some(PathBuf::from("assets/wheel.jpg"))
        );
    }
}
