//! REST API module.
//!
//! Read endpoints return bare JSON arrays/objects, the shape the site consumes.

mod auth;
mod content;
mod events;
mod health;
mod images;
mod news;
mod search;
mod staff;
mod translations;

pub use auth::*;
pub use content::*;
pub use events::*;
pub use health::*;
pub use images::*;
pub use news::*;
pub use search::*;
pub use staff::*;
pub use translations::*;

use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::i18n::Locale;

/// Response type for JSON endpoints.
pub type ApiResult<T> = Result<Json<T>, AppError>;

/// Default number of rows for list endpoints that take a `limit`.
pub const DEFAULT_LIMIT: i64 = 10;

/// Maximum number of rows a client may request.
pub const MAX_LIMIT: i64 = 100;

/// `?lang=` query shared by the localized read endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct LocaleQuery {
    #[serde(default)]
    pub lang: Option<String>,
}

impl LocaleQuery {
    pub fn locale(&self) -> Result<Locale, AppError> {
        parse_locale(self.lang.as_deref())
    }
}

/// Absent means Bulgarian; anything unrecognized is a 400.
pub fn parse_locale(lang: Option<&str>) -> Result<Locale, AppError> {
    match lang {
        None => Ok(Locale::default()),
        Some(raw) if raw.trim().is_empty() => Ok(Locale::default()),
        Some(raw) => Locale::parse(raw)
            .ok_or_else(|| AppError::BadRequest(format!("Unsupported language: {}", raw))),
    }
}

/// Clamp a requested row count into `1..=MAX_LIMIT`.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_locale_defaults_and_rejects() {
        assert_eq!(parse_locale(None).unwrap(), Locale::Bg);
        assert_eq!(parse_locale(Some("")).unwrap(), Locale::Bg);
        assert_eq!(parse_locale(Some("en")).unwrap(), Locale::En);
        assert!(matches!(
            parse_locale(Some("fr")),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(None), DEFAULT_LIMIT);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(3)), 3);
        assert_eq!(clamp_limit(Some(10_000)), MAX_LIMIT);
    }
}
