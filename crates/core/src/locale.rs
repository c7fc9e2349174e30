use crate::Entry;
use serde::{Deserialize, Serialize};

pub const DEFAULT_LOCALE: &str = "en";

/// Languages the catalog ships overlays for. Lookup is not restricted to
/// this set; unknown tags simply fall through to the defaults.
pub const SUPPORTED_LOCALES: &[&str] = &[
    "en", "ar", "de", "es", "fr", "it", "ka", "pt", "ru", "th", "tr", "uk", "zh",
];

/// Locale-correct display fields for one entry, computed on demand.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolvedDisplay {
    pub name: String,
    pub text: String,
}

/// Fold a requested tag to the normalized form used for overlay keys:
/// trimmed, ASCII-lowercased, `_` delimiters replaced with `-`. Empty or
/// missing input yields the default locale.
pub fn normalize_locale(locale: Option<&str>) -> String {
    let raw = locale.unwrap_or(DEFAULT_LOCALE).trim();
    if raw.is_empty() {
        return DEFAULT_LOCALE.to_string();
    }
    raw.replace('_', "-").to_ascii_lowercase()
}

/// Strip the region subtag: `"en-us"` -> `"en"`.
pub fn base_language(locale: &str) -> &str {
    locale.split('-').next().unwrap_or(locale)
}

pub fn is_supported(locale: &str) -> bool {
    let normalized = normalize_locale(Some(locale));
    SUPPORTED_LOCALES.contains(&base_language(&normalized))
}

/// Resolve the display fields for `entry` under `locale`.
///
/// Each field resolves independently through the same chain: the full
/// normalized tag, the base language, then the entry default. Missing
/// translations are not errors; empty overlay values count as absent.
pub fn resolve(entry: &Entry, locale: &str) -> ResolvedDisplay {
    let tag = normalize_locale(Some(locale));
    let base = base_language(&tag);
    ResolvedDisplay {
        name: resolve_field(entry, &tag, base, |t| t.name.as_deref(), &entry.name),
        text: resolve_field(entry, &tag, base, |t| t.text.as_deref(), &entry.text),
    }
}

fn resolve_field(
    entry: &Entry,
    tag: &str,
    base: &str,
    field: impl Fn(&crate::Translation) -> Option<&str>,
    default: &str,
) -> String {
    for key in [tag, base] {
        if let Some(value) = entry.translations.get(key).and_then(&field) {
            if !value.trim().is_empty() {
                return value.to_string();
            }
        }
    }
    default.to_string()
}
