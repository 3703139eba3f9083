//! News endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::{clamp_limit, parse_locale, ApiResult};
use crate::errors::AppError;
use crate::models::NewsArticle;
use crate::AppState;

/// News list query parameters.
#[derive(Debug, Deserialize)]
pub struct NewsQuery {
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// GET /api/news?lang=&limit= - Latest published articles.
pub async fn list_news(
    State(state): State<AppState>,
    Query(query): Query<NewsQuery>,
) -> ApiResult<Vec<NewsArticle>> {
    let locale = parse_locale(query.lang.as_deref())?;
    let limit = clamp_limit(query.limit);
    Ok(Json(state.repo.list_news(locale, limit).await?))
}

/// GET /api/news/{id} - One article.
pub async fn get_news(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<NewsArticle> {
    match state.repo.get_news(id).await? {
        Some(article) => Ok(Json(article)),
        None => Err(AppError::NotFound(format!("News article {} not found", id))),
    }
}
