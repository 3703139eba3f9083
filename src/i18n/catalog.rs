//! Flat, validated translation catalog.
//!
//! The bundled dictionaries are nested JSON trees per locale. They are flattened
//! to dotted keys (`events.types.academic`, `home.highlights.0`) and paired, so a
//! key present in one locale but missing in the other is rejected up front.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::Value;

use super::Locale;

const BUNDLED_BG: &str = include_str!("../../assets/i18n/bg.json");
const BUNDLED_EN: &str = include_str!("../../assets/i18n/en.json");

static BUNDLED_TREES: Lazy<(Value, Value)> = Lazy::new(|| {
    (
        serde_json::from_str(BUNDLED_BG).expect("bundled bg.json is valid JSON"),
        serde_json::from_str(BUNDLED_EN).expect("bundled en.json is valid JSON"),
    )
});

static BUNDLED: Lazy<Catalog> = Lazy::new(|| {
    let (bg, en) = &*BUNDLED_TREES;
    Catalog::from_trees(bg, en).expect("bundled translations cover both locales")
});

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("{locale} is missing {} key(s): {}", .keys.len(), .keys.join(", "))]
    MissingKeys { locale: Locale, keys: Vec<String> },
}

/// One key's text in every locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalizedText {
    pub bg: String,
    pub en: String,
}

impl LocalizedText {
    pub fn get(&self, locale: Locale) -> &str {
        match locale {
            Locale::Bg => &self.bg,
            Locale::En => &self.en,
        }
    }
}

/// Dotted key → localized text pair.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: BTreeMap<String, LocalizedText>,
}

impl Catalog {
    /// Pair two locale trees, failing on the first locale with missing keys.
    pub fn from_trees(bg: &Value, en: &Value) -> Result<Self, CatalogError> {
        let bg = flatten(bg);
        let mut en = flatten(en);

        let missing_in_en: Vec<String> = bg.keys().filter(|k| !en.contains_key(*k)).cloned().collect();
        if !missing_in_en.is_empty() {
            return Err(CatalogError::MissingKeys {
                locale: Locale::En,
                keys: missing_in_en,
            });
        }
        let missing_in_bg: Vec<String> = en.keys().filter(|k| !bg.contains_key(*k)).cloned().collect();
        if !missing_in_bg.is_empty() {
            return Err(CatalogError::MissingKeys {
                locale: Locale::Bg,
                keys: missing_in_bg,
            });
        }

        let entries = bg
            .into_iter()
            .filter_map(|(key, bg_text)| {
                let en_text = en.remove(&key)?;
                Some((
                    key,
                    LocalizedText {
                        bg: bg_text,
                        en: en_text,
                    },
                ))
            })
            .collect();

        Ok(Self { entries })
    }

    /// The catalog compiled into the binary.
    pub fn bundled() -> &'static Catalog {
        &BUNDLED
    }

    /// The raw bundled tree for one locale.
    pub fn bundled_tree(locale: Locale) -> &'static Value {
        let (bg, en) = &*BUNDLED_TREES;
        match locale {
            Locale::Bg => bg,
            Locale::En => en,
        }
    }

    pub fn get(&self, key: &str, locale: Locale) -> Option<&str> {
        self.entries.get(key).map(|t| t.get(locale))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flat `{key: value}` map for one locale, the same shape `/translations` serves.
    pub fn flat(&self, locale: Locale) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.get(locale).to_string()))
            .collect()
    }
}

/// Flatten a nested JSON tree into dotted keys. Arrays use their index as a key segment.
pub fn flatten(tree: &Value) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    flatten_into(tree, String::new(), &mut out);
    out
}

fn flatten_into(value: &Value, prefix: String, out: &mut BTreeMap<String, String>) {
    let join = |segment: &str| {
        if prefix.is_empty() {
            segment.to_string()
        } else {
            format!("{prefix}.{segment}")
        }
    };

    match value {
        Value::Object(map) => {
            for (k, v) in map {
                flatten_into(v, join(k), out);
            }
        }
        Value::Array(items) => {
            for (i, v) in items.iter().enumerate() {
                flatten_into(v, join(&i.to_string()), out);
            }
        }
        Value::String(s) => {
            out.insert(prefix, s.clone());
        }
        Value::Number(n) => {
            out.insert(prefix, n.to_string());
        }
        Value::Bool(b) => {
            out.insert(prefix, b.to_string());
        }
        Value::Null => {}
    }
}
