//! Site search endpoint.

use axum::{extract::Query, Json};
use serde::Deserialize;

use super::{parse_locale, ApiResult};
use crate::search::{SearchHit, SearchIndex};

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Search query string.
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub lang: Option<String>,
}

/// GET /api/search?q=&lang= - Pages whose static text contains the query.
pub async fn search_pages(Query(params): Query<SearchQuery>) -> ApiResult<Vec<SearchHit>> {
    let locale = parse_locale(params.lang.as_deref())?;
    Ok(Json(SearchIndex::bundled().search(&params.q, locale)))
}
