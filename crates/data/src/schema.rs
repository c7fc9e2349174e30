use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub use gamebook_core::{Entry, Translation};

/// Raw catalog record as the data source hands it over. Field names vary
/// by data-source revision; aliases cover the legacy spelling and the id
/// may arrive as a bare number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(
        default,
        alias = "iid",
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(default, alias = "tag", alias = "iurl")]
    pub slug: Option<String>,
    #[serde(default, alias = "iname1")]
    pub name: Option<String>,
    #[serde(default, alias = "itext")]
    pub text: Option<String>,
    #[serde(default, alias = "img")]
    pub image: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default, alias = "translations")]
    pub translation: HashMap<String, RawTranslation>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTranslation {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

fn default_visible() -> bool {
    true
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(text)) => Some(text),
        Some(serde_json::Value::Number(number)) => Some(number.to_string()),
        Some(other) => return Err(de::Error::custom(format!("invalid id: {other}"))),
    })
}
