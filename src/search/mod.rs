//! Static page search.
//!
//! The index is built once from the bundled translation trees: each route's
//! subtree is flattened to plain text with markup stripped. Matching is a
//! case-insensitive substring test against the active locale's title and
//! content; hits come back in route declaration order.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::i18n::{Catalog, Locale, LocalizedText};

/// Searchable routes and the translation subtree that renders each one.
pub const ROUTES: &[(&str, &str)] = &[
    ("/", "home"),
    ("/school/history", "history"),
    ("/school/patron", "patron"),
    ("/school/team", "team"),
    ("/admissions", "admissions"),
    ("/events", "events"),
    ("/contacts", "contacts"),
];

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("space pattern is valid"));

static BUNDLED: Lazy<SearchIndex> = Lazy::new(|| {
    SearchIndex::from_trees(
        Catalog::bundled_tree(Locale::Bg),
        Catalog::bundled_tree(Locale::En),
        ROUTES,
    )
});

/// One route's text in both locales.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchablePage {
    pub path: String,
    pub title: LocalizedText,
    pub content: LocalizedText,
}

/// A match in the active locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub path: String,
    pub title: String,
}

/// Flat list of searchable pages.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    pages: Vec<SearchablePage>,
}

impl SearchIndex {
    /// Build from per-locale trees. Routes whose subtree is missing are skipped.
    pub fn from_trees(bg: &Value, en: &Value, routes: &[(&str, &str)]) -> Self {
        let pages = routes
            .iter()
            .filter_map(|(path, section)| {
                let bg_section = bg.get(*section)?;
                let en_section = en.get(*section)?;
                Some(SearchablePage {
                    path: path.to_string(),
                    title: LocalizedText {
                        bg: section_title(bg_section),
                        en: section_title(en_section),
                    },
                    content: LocalizedText {
                        bg: extract_text(bg_section),
                        en: extract_text(en_section),
                    },
                })
            })
            .collect();

        Self { pages }
    }

    /// The index over the bundled translations.
    pub fn bundled() -> &'static SearchIndex {
        &BUNDLED
    }

    pub fn pages(&self) -> &[SearchablePage] {
        &self.pages
    }

    /// Pages whose title or content contains `query`. An empty query matches nothing.
    pub fn search(&self, query: &str, locale: Locale) -> Vec<SearchHit> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        let needle = query.to_lowercase();

        self.pages
            .iter()
            .filter(|page| {
                page.title.get(locale).to_lowercase().contains(&needle)
                    || page.content.get(locale).to_lowercase().contains(&needle)
            })
            .map(|page| SearchHit {
                path: page.path.clone(),
                title: page.title.get(locale).to_string(),
            })
            .collect()
    }
}

fn section_title(section: &Value) -> String {
    section
        .get("title")
        .and_then(Value::as_str)
        .map(strip_tags)
        .unwrap_or_default()
}

/// Concatenate every string leaf of a tree, with markup tags replaced by whitespace.
pub fn extract_text(value: &Value) -> String {
    let mut leaves = Vec::new();
    collect_strings(value, &mut leaves);
    strip_tags(&leaves.join(" "))
}

fn collect_strings<'a>(value: &'a Value, out: &mut Vec<&'a str>) {
    match value {
        Value::String(s) => out.push(s),
        Value::Array(items) => items.iter().for_each(|v| collect_strings(v, out)),
        Value::Object(map) => map.values().for_each(|v| collect_strings(v, out)),
        _ => {}
    }
}

fn strip_tags(text: &str) -> String {
    let spaced = TAG.replace_all(text, " ");
    WHITESPACE.replace_all(&spaced, " ").trim().to_string()
}
