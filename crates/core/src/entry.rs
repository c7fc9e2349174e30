use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Partial per-locale overlay. A locale may supply only one of the two
/// fields; the missing field falls through to the entry default.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Translation {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl Translation {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.text.is_none()
    }
}

/// One catalog item, read-only after load.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Entry {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub text: String,
    pub image: String,
    pub category: Option<String>,
    pub visible: bool,
    pub translations: HashMap<String, Translation>,
}

impl Entry {
    /// Route/lookup key: the slug when present, the id otherwise.
    pub fn key(&self) -> &str {
        if self.slug.is_empty() {
            &self.id
        } else {
            &self.slug
        }
    }

    pub fn matches_key(&self, key: &str) -> bool {
        key == self.slug || key == self.id
    }
}
