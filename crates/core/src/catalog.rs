use crate::{locale, Entry, ResolvedDisplay};
use serde::Serialize;
use std::cmp::Ordering;

/// Sentinel selection that matches every entry.
pub const SELECT_ALL: &str = "All";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Visible entries in locale-collated order, shared by every view so that
/// grid, sidebar, and drawer observe the same snapshot.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    entries: Vec<Entry>,
    locale: String,
}

impl CatalogIndex {
    /// Filter to visible entries and sort by locale-resolved name,
    /// tie-broken by id.
    pub fn build(entries: Vec<Entry>, locale: &str) -> Self {
        let locale = locale::normalize_locale(Some(locale));
        let visible = entries.into_iter().filter(|entry| entry.visible).collect();
        let entries = sort_entries(visible, &locale);
        Self { entries, locale }
    }

    /// Re-derive the ordering for a new locale without touching the source
    /// data. Idempotent; returns a fresh index so concurrent consumers keep
    /// their snapshot.
    pub fn reorder(&self, locale: &str) -> Self {
        let locale = locale::normalize_locale(Some(locale));
        let entries = sort_entries(self.entries.clone(), &locale);
        Self { entries, locale }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Detail-page lookup by slug or id.
    pub fn entry_by_key(&self, key: &str) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.matches_key(key))
    }

    /// Display fields for an entry under this index's locale.
    pub fn resolve(&self, entry: &Entry) -> ResolvedDisplay {
        locale::resolve(entry, &self.locale)
    }

    /// Per-category entry counts in index order of first occurrence. The
    /// `All` total is the sum.
    pub fn categories(&self) -> Vec<CategoryCount> {
        let mut counts: Vec<CategoryCount> = Vec::new();
        for entry in &self.entries {
            let Some(category) = entry.category.as_deref() else {
                continue;
            };
            match counts.iter_mut().find(|count| count.category == category) {
                Some(count) => count.count += 1,
                None => counts.push(CategoryCount {
                    category: category.to_string(),
                    count: 1,
                }),
            }
        }
        counts
    }

    /// A selection must be `All` or an existing entry's slug/id; stale
    /// selections degrade to `All`.
    pub fn normalize_selection<'a>(&self, selected: &'a str) -> &'a str {
        if selected == SELECT_ALL || self.entry_by_key(selected).is_some() {
            selected
        } else {
            SELECT_ALL
        }
    }
}

/// Case-insensitive name ordering with the raw string as secondary so the
/// result stays total. No collation crate is carried; casefolded `char`
/// comparison is the deterministic stand-in.
pub fn collate_names(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| a.cmp(b))
}

fn sort_entries(entries: Vec<Entry>, locale: &str) -> Vec<Entry> {
    let mut keyed: Vec<(String, Entry)> = entries
        .into_iter()
        .map(|entry| (locale::resolve(&entry, locale).name, entry))
        .collect();
    keyed.sort_by(|(name_a, a), (name_b, b)| {
        collate_names(name_a, name_b).then_with(|| a.id.cmp(&b.id))
    });
    keyed.into_iter().map(|(_, entry)| entry).collect()
}
