//! Locales and the bundled translation catalog.

mod catalog;

pub use catalog::*;

use serde::{Deserialize, Serialize};

/// A supported site language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Bulgarian (default).
    #[default]
    Bg,
    /// English.
    En,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::Bg, Locale::En];

    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Bg => "bg",
            Locale::En => "en",
        }
    }

    /// Parse a locale code, tolerating case and region suffixes (`en-GB`).
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        let primary = normalized.split(['-', '_']).next().unwrap_or_default();
        match primary {
            "bg" => Some(Locale::Bg),
            "en" => Some(Locale::En),
            _ => None,
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
