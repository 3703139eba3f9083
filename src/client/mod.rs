//! HTTP client for the backend's read endpoints.
//!
//! Every call either returns the decoded body or a [`ClientError`]; callers
//! decide whether to surface the error or substitute bundled data.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::i18n::Locale;
use crate::models::{ContentSectionItem, Event, MenuItem, NewsArticle, Page, StaffMember};

/// Default per-request timeout for content fetches.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request timed out")]
    Timeout,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ClientError::Status(status.as_u16())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

/// Thin wrapper over `reqwest` bound to one backend origin.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for `base_url` (scheme + host, no `/api` suffix).
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of an `/api` path.
    pub fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    /// GET an `/api` path and decode a 2xx JSON body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let response = self.http.get(self.url(path)).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("GET {} returned {}", path, status);
            return Err(ClientError::Status(status.as_u16()));
        }

        Ok(response.json::<T>().await?)
    }

    pub async fn translations(&self, locale: Locale) -> Result<BTreeMap<String, String>, ClientError> {
        self.get_json("/translations", &lang(locale)).await
    }

    pub async fn pages(&self, locale: Locale) -> Result<Vec<Page>, ClientError> {
        self.get_json("/pages", &lang(locale)).await
    }

    pub async fn page(&self, slug: &str, locale: Locale) -> Result<Page, ClientError> {
        self.get_json(&format!("/pages/{slug}"), &lang(locale)).await
    }

    pub async fn header_menu(&self, locale: Locale) -> Result<Vec<MenuItem>, ClientError> {
        self.get_json("/navigation/header-menu", &lang(locale)).await
    }

    pub async fn staff(&self, locale: Locale) -> Result<Vec<StaffMember>, ClientError> {
        self.get_json("/schoolstaff", &lang(locale)).await
    }

    pub async fn content_sections(
        &self,
        page_key: &str,
        locale: Locale,
    ) -> Result<Vec<ContentSectionItem>, ClientError> {
        self.get_json(&format!("/content/{page_key}"), &lang(locale)).await
    }

    pub async fn upcoming_events(&self, locale: Locale, limit: usize) -> Result<Vec<Event>, ClientError> {
        let mut query = lang(locale);
        query.push(("limit", limit.to_string()));
        self.get_json("/events", &query).await
    }

    pub async fn news(&self, locale: Locale, limit: usize) -> Result<Vec<NewsArticle>, ClientError> {
        let mut query = lang(locale);
        query.push(("limit", limit.to_string()));
        self.get_json("/news", &query).await
    }
}

fn lang(locale: Locale) -> Vec<(&'static str, String)> {
    vec![("lang", locale.as_str().to_string())]
}
