//! Backend health-check service.
//!
//! Constructed once at startup and shared by reference. It holds exactly one
//! of three states: never checked, healthy with the reported config, or
//! unhealthy with nothing cached.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::models::{Features, HealthConfig, STATUS_HEALTHY};

/// Upper bound for the gating health check.
pub const HEALTH_TIMEOUT: Duration = Duration::from_millis(5000);

/// Upper bound for the reachability ping.
pub const PING_TIMEOUT: Duration = Duration::from_millis(3000);

/// Cached outcome of the last health check.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HealthState {
    #[default]
    Uninitialized,
    Healthy(HealthConfig),
    Unhealthy,
}

/// Result of [`HealthCheckService::perform_health_check`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckResult {
    pub is_healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<HealthConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Every way a health check can fail; all are treated alike by callers.
#[derive(Debug, thiserror::Error)]
enum HealthError {
    #[error("health check timed out")]
    Timeout,
    #[error("backend unreachable: {0}")]
    Transport(String),
    #[error("health endpoint returned status {0}")]
    Status(u16),
    #[error("malformed health response: {0}")]
    Malformed(String),
    #[error("health response has no app key")]
    MissingAppKey,
    #[error("backend reports status {0:?}")]
    NotHealthy(String),
}

impl From<reqwest::Error> for HealthError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            HealthError::Timeout
        } else if err.is_decode() {
            HealthError::Malformed(err.to_string())
        } else {
            HealthError::Transport(err.to_string())
        }
    }
}

/// Lenient view of the health body; required fields are checked after decoding.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawHealth {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    features: Option<Features>,
    #[serde(default)]
    app_key: Option<String>,
    #[serde(default)]
    environment: Option<String>,
}

impl RawHealth {
    fn validate(self) -> Result<HealthConfig, HealthError> {
        let app_key = self
            .app_key
            .filter(|k| !k.trim().is_empty())
            .ok_or(HealthError::MissingAppKey)?;

        let status = self.status.unwrap_or_default();
        if status != STATUS_HEALTHY {
            return Err(HealthError::NotHealthy(status));
        }

        Ok(HealthConfig {
            status,
            timestamp: self.timestamp.unwrap_or_default(),
            version: self.version.unwrap_or_default(),
            features: self.features.unwrap_or_default(),
            app_key,
            environment: self.environment.unwrap_or_default(),
        })
    }
}

/// Single source of truth for "is the backend usable".
#[derive(Debug)]
pub struct HealthCheckService {
    http: reqwest::Client,
    base_url: String,
    health_timeout: Duration,
    ping_timeout: Duration,
    state: RwLock<HealthState>,
}

impl HealthCheckService {
    /// Service for the backend at `base_url` with the standard 5s/3s timeouts.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeouts(base_url, HEALTH_TIMEOUT, PING_TIMEOUT)
    }

    pub fn with_timeouts(
        base_url: impl Into<String>,
        health_timeout: Duration,
        ping_timeout: Duration,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            health_timeout,
            ping_timeout,
            state: RwLock::new(HealthState::Uninitialized),
        }
    }

    /// GET `/api/health` once. Never fails: every failure mode yields `is_healthy == false`
    /// and clears the cached config.
    pub async fn perform_health_check(&self) -> HealthCheckResult {
        match self.fetch_config().await {
            Ok(config) => {
                tracing::info!(
                    "Backend healthy (version {}, environment {})",
                    config.version,
                    config.environment
                );
                *self.write_state() = HealthState::Healthy(config.clone());
                HealthCheckResult {
                    is_healthy: true,
                    config: Some(config),
                    error: None,
                }
            }
            Err(e) => {
                tracing::warn!("Health check failed: {}", e);
                *self.write_state() = HealthState::Unhealthy;
                HealthCheckResult {
                    is_healthy: false,
                    config: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    async fn fetch_config(&self) -> Result<HealthConfig, HealthError> {
        let response = self
            .http
            .get(format!("{}/api/health", self.base_url))
            .timeout(self.health_timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(HealthError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let raw: RawHealth =
            serde_json::from_slice(&body).map_err(|e| HealthError::Malformed(e.to_string()))?;
        raw.validate()
    }

    /// GET `/api/ping`; reachability only, cached state is untouched.
    pub async fn ping(&self) -> bool {
        let result = self
            .http
            .get(format!("{}/api/ping", self.base_url))
            .timeout(self.ping_timeout)
            .send()
            .await;

        match result {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!("Ping failed: {}", e);
                false
            }
        }
    }

    pub fn state(&self) -> HealthState {
        self.read_state().clone()
    }

    pub fn health_config(&self) -> Option<HealthConfig> {
        match &*self.read_state() {
            HealthState::Healthy(config) => Some(config.clone()),
            _ => None,
        }
    }

    pub fn is_system_healthy(&self) -> bool {
        matches!(*self.read_state(), HealthState::Healthy(_))
    }

    pub fn app_key(&self) -> Option<String> {
        self.health_config().map(|c| c.app_key)
    }

    /// Unknown feature names and an unchecked backend both report `false`.
    pub fn is_feature_available(&self, name: &str) -> bool {
        match &*self.read_state() {
            HealthState::Healthy(config) => config.features.get(name).unwrap_or(false),
            _ => false,
        }
    }

    /// Forget the cached outcome so a stale "healthy" cannot mask a new failure.
    pub fn reset(&self) {
        *self.write_state() = HealthState::Uninitialized;
    }

    // The lock is never held across an await or a panic point.
    fn read_state(&self) -> RwLockReadGuard<'_, HealthState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, HealthState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::{http::StatusCode, routing::get, Json, Router};
    use serde_json::{json, Value};

    fn healthy_body() -> Value {
        json!({
            "status": "healthy",
            "timestamp": "2026-10-18T08:00:00Z",
            "version": "0.1.0",
            "features": { "cms": true, "translations": true, "fileUploads": false, "database": true },
            "appKey": "school-key",
            "environment": "test"
        })
    }

    /// Serve a fixed health response on an ephemeral port.
    async fn backend(status: StatusCode, body: Value) -> String {
        let app = Router::new()
            .route(
                "/api/health",
                get(move || {
                    let body = body.clone();
                    async move { (status, Json(body)) }
                }),
            )
            .route("/api/ping", get(|| async { StatusCode::OK }));
        spawn(app).await
    }

    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_accessors_before_initialization() {
        let service = HealthCheckService::new("http://127.0.0.1:9");
        assert_eq!(service.state(), HealthState::Uninitialized);
        assert!(!service.is_system_healthy());
        assert!(service.app_key().is_none());
        assert!(service.health_config().is_none());
        assert!(!service.is_feature_available("cms"));
    }

    #[test]
    fn test_default_timeouts() {
        assert_eq!(HEALTH_TIMEOUT, Duration::from_millis(5000));
        assert_eq!(PING_TIMEOUT, Duration::from_millis(3000));
    }

    #[tokio::test]
    async fn test_healthy_response_is_cached() {
        let url = backend(StatusCode::OK, healthy_body()).await;
        let service = HealthCheckService::new(url);

        let result = service.perform_health_check().await;
        assert!(result.is_healthy);
        assert!(result.error.is_none());
        assert_eq!(result.config.as_ref().unwrap().app_key, "school-key");

        assert!(service.is_system_healthy());
        assert_eq!(service.app_key().as_deref(), Some("school-key"));
        assert!(service.is_feature_available("database"));
        assert!(!service.is_feature_available("fileUploads"));
        assert!(!service.is_feature_available("unknown"));
    }

    #[tokio::test]
    async fn test_invalid_responses_fail_and_clear_cache() {
        let mut missing_key = healthy_body();
        missing_key.as_object_mut().unwrap().remove("appKey");
        let mut empty_key = healthy_body();
        empty_key["appKey"] = json!("   ");
        let mut degraded = healthy_body();
        degraded["status"] = json!("degraded");
        let mut wrong_type = healthy_body();
        wrong_type["appKey"] = json!(42);

        let cases = vec![
            (StatusCode::OK, missing_key),
            (StatusCode::OK, empty_key),
            (StatusCode::OK, degraded),
            (StatusCode::OK, wrong_type),
            (StatusCode::OK, json!([1, 2, 3])),
            (StatusCode::SERVICE_UNAVAILABLE, healthy_body()),
        ];

        let good = backend(StatusCode::OK, healthy_body()).await;

        for (status, body) in cases {
            let bad = backend(status, body.clone()).await;

            // Prime a healthy state, then point the same cache at the bad backend.
            let service = HealthCheckService::new(good.clone());
            assert!(service.perform_health_check().await.is_healthy);
            let service = HealthCheckService {
                base_url: bad,
                ..service
            };

            let result = service.perform_health_check().await;
            assert!(!result.is_healthy, "expected failure for {status} {body}");
            assert!(result.config.is_none());
            assert!(result.error.is_some());
            assert_eq!(service.state(), HealthState::Unhealthy);
            assert!(service.app_key().is_none());
        }
    }

    #[tokio::test]
    async fn test_unreachable_backend_fails() {
        let service = HealthCheckService::new("http://127.0.0.1:9");
        let result = service.perform_health_check().await;
        assert!(!result.is_healthy);
        assert!(!service.ping().await);
    }

    #[tokio::test]
    async fn test_slow_backend_times_out() {
        let app = Router::new().route(
            "/api/health",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Json(healthy_body())
            }),
        );
        let url = spawn(app).await;
        let service =
            HealthCheckService::with_timeouts(url, Duration::from_millis(200), PING_TIMEOUT);

        let started = std::time::Instant::now();
        let result = service.perform_health_check().await;
        assert!(!result.is_healthy);
        assert_eq!(result.error.as_deref(), Some("health check timed out"));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_reset_clears_healthy_state() {
        let url = backend(StatusCode::OK, healthy_body()).await;
        let service = HealthCheckService::new(url);
        assert!(service.perform_health_check().await.is_healthy);

        service.reset();
        assert!(!service.is_system_healthy());
        assert!(service.app_key().is_none());
        assert_eq!(service.state(), HealthState::Uninitialized);
    }

    #[tokio::test]
    async fn test_ping_does_not_touch_state() {
        let url = backend(StatusCode::OK, healthy_body()).await;
        let service = HealthCheckService::new(url);
        assert!(service.ping().await);
        assert_eq!(service.state(), HealthState::Uninitialized);
    }

    #[tokio::test]
    async fn test_ping_rejects_error_status() {
        let app = Router::new().route("/api/ping", get(|| async { StatusCode::SERVICE_UNAVAILABLE }));
        let service = HealthCheckService::new(spawn(app).await);
        assert!(!service.ping().await);
        assert_eq!(service.state(), HealthState::Uninitialized);
    }

    #[tokio::test]
    async fn test_slow_ping_times_out() {
        let app = Router::new().route(
            "/api/ping",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                StatusCode::OK
            }),
        );
        let url = spawn(app).await;
        let service =
            HealthCheckService::with_timeouts(url, HEALTH_TIMEOUT, Duration::from_millis(200));

        let started = std::time::Instant::now();
        assert!(!service.ping().await);
        assert!(started.elapsed() < Duration::from_secs(3));
    }
}
