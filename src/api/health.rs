//! Health and reachability endpoints.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;

use crate::models::{Features, HealthConfig, STATUS_HEALTHY, STATUS_UNHEALTHY};
use crate::AppState;

/// GET /api/health - Report availability with the app key marker.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthConfig>) {
    let database = match state.repo.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Health check database ping failed: {}", e);
            false
        }
    };

    let file_uploads = tokio::fs::metadata(&state.config.upload_path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);

    let (status_code, status) = if database {
        (StatusCode::OK, STATUS_HEALTHY)
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, STATUS_UNHEALTHY)
    };

    let body = HealthConfig {
        status: status.to_string(),
        timestamp: Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        features: Features {
            cms: database,
            translations: database,
            file_uploads,
            database,
        },
        app_key: state.config.app_key.clone(),
        environment: state.config.environment.clone(),
    };

    (status_code, Json(body))
}

/// GET /api/ping - Reachability only.
pub async fn ping() -> StatusCode {
    StatusCode::OK
}
