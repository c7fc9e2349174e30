use crate::schema::{RawRecord, RawTranslation};
use anyhow::Context;
use gamebook_core::{normalize_locale, CatalogIndex, Entry, Translation};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Built index plus the non-fatal problems hit while mapping records.
#[derive(Debug)]
pub struct LoadReport {
    pub index: CatalogIndex,
    pub warnings: Vec<String>,
}

/// Result of a full load. A failed load carries an empty index and the
/// explicit flag; the engine never retries on its own.
#[derive(Debug)]
pub struct LoadOutcome {
    pub index: CatalogIndex,
    pub failed: bool,
    pub warnings: Vec<String>,
}

/// Parse a raw JSON payload into records. A payload that is not a JSON
/// array is the one hard failure of the loading path.
pub fn parse_records(raw: &str) -> anyhow::Result<Vec<RawRecord>> {
    let records = serde_json::from_str(raw).context("parse record array")?;
    Ok(records)
}

pub fn load_records(path: &Path) -> anyhow::Result<Vec<RawRecord>> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_records(&raw).with_context(|| format!("parse {}", path.display()))
}

/// Map raw records into entries and build the locale-ordered index.
/// Records with neither id nor slug are skipped with a warning.
pub fn build_catalog(records: Vec<RawRecord>, locale: &str) -> LoadReport {
    let mut entries = Vec::with_capacity(records.len());
    let mut warnings = Vec::new();
    for (position, record) in records.into_iter().enumerate() {
        match entry_from_record(record) {
            Ok(entry) => entries.push(entry),
            Err(problem) => warnings.push(format!("record {position}: {problem}")),
        }
    }
    LoadReport {
        index: CatalogIndex::build(entries, locale),
        warnings,
    }
}

/// Load a catalog from disk without propagating errors: on failure the
/// outcome is an empty index plus the failure flag.
pub fn load_catalog(path: &Path, locale: &str) -> LoadOutcome {
    match load_records(path) {
        Ok(records) => {
            let report = build_catalog(records, locale);
            LoadOutcome {
                index: report.index,
                failed: false,
                warnings: report.warnings,
            }
        }
        Err(err) => LoadOutcome {
            index: CatalogIndex::build(Vec::new(), locale),
            failed: true,
            warnings: vec![format!("{err:#}")],
        },
    }
}

fn entry_from_record(record: RawRecord) -> Result<Entry, String> {
    let RawRecord {
        id,
        slug,
        name,
        text,
        image,
        category,
        visible,
        translation,
    } = record;

    let id = id.map(|value| value.trim().to_string()).filter(|value| !value.is_empty());
    let slug = slug
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());
    let (id, slug) = match (id, slug) {
        (Some(id), Some(slug)) => (id, slug),
        (Some(id), None) => (id.clone(), id),
        (None, Some(slug)) => (slug.clone(), slug),
        (None, None) => return Err("missing both id and slug".to_string()),
    };

    // Default name backfills from the slug so the non-empty invariant holds.
    let name = name
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| slug.clone());

    Ok(Entry {
        id,
        slug,
        name,
        text: text.unwrap_or_default(),
        image: image.unwrap_or_default(),
        category: category
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty()),
        visible,
        translations: normalize_translations(translation),
    })
}

/// Overlay keys are folded to the same normalized form the resolver uses,
/// and empty overlays are dropped.
fn normalize_translations(raw: HashMap<String, RawTranslation>) -> HashMap<String, Translation> {
    let mut translations = HashMap::with_capacity(raw.len());
    for (tag, overlay) in raw {
        let overlay = Translation {
            name: overlay.name.filter(|value| !value.trim().is_empty()),
            text: overlay.text.filter(|value| !value.trim().is_empty()),
        };
        if overlay.is_empty() {
            continue;
        }
        translations.insert(normalize_locale(Some(&tag)), overlay);
    }
    translations
}
