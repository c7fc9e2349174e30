use crate::{CatalogIndex, Entry, SELECT_ALL};

/// Free-text and category filter, applied together.
#[derive(Debug, Clone, Default)]
pub struct Query {
    /// `None` and the `All` sentinel match every entry.
    pub category: Option<String>,
    /// Case-insensitive substring over resolved name + stripped text.
    pub term: String,
}

impl Query {
    pub fn with_term(term: &str) -> Self {
        Self {
            category: None,
            term: term.to_string(),
        }
    }

    pub fn with_category(category: &str) -> Self {
        Self {
            category: Some(category.to_string()),
            term: String::new(),
        }
    }
}

/// Apply `query` against the index, preserving index order. The category
/// predicate accepts the entry's category as well as its slug/id, since
/// sidebar selections carry either depending on the record revision.
pub fn filter<'a>(index: &'a CatalogIndex, query: &Query) -> Vec<&'a Entry> {
    let term = query.term.trim().to_lowercase();
    let category = query
        .category
        .as_deref()
        .filter(|category| *category != SELECT_ALL);
    index
        .iter()
        .filter(|entry| {
            let category_hit = category.is_none_or(|category| {
                entry.category.as_deref() == Some(category) || entry.matches_key(category)
            });
            if !category_hit {
                return false;
            }
            if term.is_empty() {
                return true;
            }
            let display = index.resolve(entry);
            let haystack =
                format!("{} {}", display.name, strip_html(&display.text)).to_lowercase();
            haystack.contains(&term)
        })
        .collect()
}

/// Drop tags and collapse whitespace so rich-text bodies can be searched
/// and previewed as plain text.
pub fn strip_html(input: &str) -> String {
    let mut flat = String::with_capacity(input.len());
    let mut in_tag = false;
    for ch in input.chars() {
        match ch {
            '<' => {
                in_tag = true;
                flat.push(' ');
            }
            '>' if in_tag => in_tag = false,
            _ if in_tag => {}
            _ => flat.push(ch),
        }
    }
    flat.split_whitespace().collect::<Vec<_>>().join(" ")
}
