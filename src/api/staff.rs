//! School staff endpoint.

use axum::extract::{Query, State};
use axum::Json;

use super::{ApiResult, LocaleQuery};
use crate::models::StaffMember;
use crate::AppState;

/// GET /api/schoolstaff?lang= - Active staff ordered by position.
pub async fn list_staff(
    State(state): State<AppState>,
    Query(query): Query<LocaleQuery>,
) -> ApiResult<Vec<StaffMember>> {
    let locale = query.locale()?;
    Ok(Json(state.repo.list_staff(locale).await?))
}
