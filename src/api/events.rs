//! Upcoming events endpoint.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use super::{clamp_limit, parse_locale, ApiResult};
use crate::errors::AppError;
use crate::models::Event;
use crate::AppState;

/// Events query parameters.
#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
    /// First day to include, `YYYY-MM-DD` (default: today).
    #[serde(default)]
    pub from: Option<String>,
}

/// GET /api/events?lang=&limit=&from= - Upcoming events, soonest first.
pub async fn upcoming_events(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> ApiResult<Vec<Event>> {
    let locale = parse_locale(query.lang.as_deref())?;
    let limit = clamp_limit(query.limit);

    let from = match query.from.as_deref() {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| AppError::BadRequest(format!("Invalid date: {}", raw)))?,
        None => chrono::Local::now().date_naive(),
    };
    let from = from.format("%Y-%m-%d").to_string();

    Ok(Json(state.repo.upcoming_events(locale, &from, limit).await?))
}
