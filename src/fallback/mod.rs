//! Per-section fallback resolution.
//!
//! Every content section fetches its own data and, if that fetch fails,
//! substitutes the bundled dataset for the same locale. Failures are logged
//! and never reach the caller. Passing the global health gate does not imply
//! any particular section's fetch will succeed.

pub mod data;

use std::future::Future;

use serde::Serialize;

use crate::client::ClientError;
use crate::i18n::Locale;

/// Where a section's data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Live,
    Fallback,
}

/// Data for one section plus its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub data: T,
    pub source: DataSource,
}

impl<T> Resolved<T> {
    pub fn live(data: T) -> Self {
        Self {
            data,
            source: DataSource::Live,
        }
    }

    pub fn fallback(data: T) -> Self {
        Self {
            data,
            source: DataSource::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == DataSource::Fallback
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resolved<U> {
        Resolved {
            data: f(self.data),
            source: self.source,
        }
    }
}

/// Widget content: items to show, or an explicit empty state.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetState<T> {
    Items(Vec<T>),
    Empty,
}

impl<T> WidgetState<T> {
    pub fn from_items(items: Vec<T>) -> Self {
        if items.is_empty() {
            WidgetState::Empty
        } else {
            WidgetState::Items(items)
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            WidgetState::Items(items) => items,
            WidgetState::Empty => &[],
        }
    }
}

/// Fetch a section for `locale`; on any error log it and use `fallback(locale)` instead.
pub async fn fetch_with_fallback<T, F, Fut, P>(
    section: &str,
    locale: Locale,
    fetcher: F,
    fallback: P,
) -> Resolved<T>
where
    F: FnOnce(Locale) -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
    P: FnOnce(Locale) -> T,
{
    match fetcher(locale).await {
        Ok(data) => Resolved::live(data),
        Err(e) => {
            tracing::warn!(
                "Falling back to bundled {} data ({}): {}",
                section,
                locale,
                e
            );
            Resolved::fallback(fallback(locale))
        }
    }
}

/// Like [`fetch_with_fallback`], but an empty list also counts as unavailable.
///
/// Page sections use this: an empty table should not leave the page blank.
pub async fn fetch_list_with_fallback<T, F, Fut, P>(
    section: &str,
    locale: Locale,
    fetcher: F,
    fallback: P,
) -> Resolved<Vec<T>>
where
    F: FnOnce(Locale) -> Fut,
    Fut: Future<Output = Result<Vec<T>, ClientError>>,
    P: FnOnce(Locale) -> Vec<T>,
{
    let resolved = fetch_with_fallback(section, locale, fetcher, |_| Vec::new()).await;
    if resolved.data.is_empty() {
        if !resolved.is_fallback() {
            tracing::info!("No live {} data ({}), using bundled data", section, locale);
        }
        return Resolved::fallback(fallback(locale));
    }
    resolved
}

/// Widget resolution: an empty successful response is an empty state, not a failure.
pub async fn resolve_widget<T, F, Fut, P>(
    section: &str,
    locale: Locale,
    fetcher: F,
    fallback: P,
) -> Resolved<WidgetState<T>>
where
    F: FnOnce(Locale) -> Fut,
    Fut: Future<Output = Result<Vec<T>, ClientError>>,
    P: FnOnce(Locale) -> Vec<T>,
{
    fetch_with_fallback(section, locale, fetcher, fallback)
        .await
        .map(WidgetState::from_items)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn ok_items(_: Locale) -> Result<Vec<&'static str>, ClientError> {
        Ok(vec!["live"])
    }

    async fn ok_empty(_: Locale) -> Result<Vec<&'static str>, ClientError> {
        Ok(Vec::new())
    }

    async fn unavailable(_: Locale) -> Result<Vec<&'static str>, ClientError> {
        Err(ClientError::Status(500))
    }

    fn bundled(locale: Locale) -> Vec<&'static str> {
        match locale {
            Locale::Bg => vec!["резервни"],
            Locale::En => vec!["fallback"],
        }
    }

    #[tokio::test]
    async fn test_live_data_wins() {
        let resolved = fetch_with_fallback("staff", Locale::Bg, ok_items, bundled).await;
        assert_eq!(resolved, Resolved::live(vec!["live"]));
    }

    #[tokio::test]
    async fn test_failure_uses_locale_matched_fallback() {
        let bg = fetch_with_fallback("staff", Locale::Bg, unavailable, bundled).await;
        assert_eq!(bg, Resolved::fallback(vec!["резервни"]));

        let en = fetch_with_fallback("staff", Locale::En, unavailable, bundled).await;
        assert_eq!(en, Resolved::fallback(vec!["fallback"]));
    }

    #[tokio::test]
    async fn test_fetcher_receives_locale() {
        let resolved = fetch_with_fallback(
            "translations",
            Locale::En,
            |locale| async move { Ok::<_, ClientError>(locale.as_str().to_string()) },
            |_| String::new(),
        )
        .await;
        assert_eq!(resolved.data, "en");
    }

    #[tokio::test]
    async fn test_list_fallback_treats_empty_as_missing() {
        let resolved = fetch_list_with_fallback("patron", Locale::En, ok_empty, bundled).await;
        assert_eq!(resolved, Resolved::fallback(vec!["fallback"]));

        let resolved = fetch_list_with_fallback("patron", Locale::En, ok_items, bundled).await;
        assert_eq!(resolved, Resolved::live(vec!["live"]));
    }

    #[tokio::test]
    async fn test_widget_empty_response_is_empty_state() {
        let resolved = resolve_widget("events", Locale::Bg, ok_empty, bundled).await;
        assert_eq!(resolved, Resolved::live(WidgetState::Empty));
    }

    #[tokio::test]
    async fn test_widget_failure_uses_fallback() {
        let resolved = resolve_widget("events", Locale::Bg, unavailable, bundled).await;
        assert_eq!(resolved, Resolved::fallback(WidgetState::Items(vec!["резервни"])));

        let resolved = resolve_widget("events", Locale::Bg, unavailable, |_| Vec::<&str>::new()).await;
        assert_eq!(resolved, Resolved::fallback(WidgetState::Empty));
        assert!(resolved.data.items().is_empty());
    }
}
