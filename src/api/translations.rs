//! Translation endpoint.

use std::collections::BTreeMap;

use axum::extract::{Query, State};
use axum::Json;

use super::{ApiResult, LocaleQuery};
use crate::AppState;

/// GET /api/translations?lang= - Flat key/value map for one locale.
pub async fn get_translations(
    State(state): State<AppState>,
    Query(query): Query<LocaleQuery>,
) -> ApiResult<BTreeMap<String, String>> {
    let locale = query.locale()?;
    let translations = state.repo.translations(locale).await?;
    Ok(Json(translations))
}
