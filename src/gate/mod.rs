//! Health-gated bootstrap.
//!
//! Nothing behind the gate renders until the single startup health check
//! resolves. A healthy result is final for the session; an unhealthy one
//! stays put until the user asks for a retry.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::health::HealthCheckService;

/// Where the gate currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateStatus {
    Checking,
    Healthy,
    Unhealthy { error: String },
}

/// What the gate lets the caller show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateView {
    /// Placeholder while the check is in flight.
    Loading,
    /// Error screen offering a retry.
    Error { message: String },
    /// Render the application.
    Ready,
}

pub struct HealthGate {
    service: Arc<HealthCheckService>,
    status: RwLock<GateStatus>,
    mounted: AtomicBool,
}

impl HealthGate {
    pub fn new(service: Arc<HealthCheckService>) -> Self {
        Self {
            service,
            status: RwLock::new(GateStatus::Checking),
            mounted: AtomicBool::new(false),
        }
    }

    pub fn service(&self) -> &HealthCheckService {
        &self.service
    }

    pub fn status(&self) -> GateStatus {
        self.status
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn view(&self) -> GateView {
        match self.status() {
            GateStatus::Checking => GateView::Loading,
            GateStatus::Healthy => GateView::Ready,
            GateStatus::Unhealthy { error } => GateView::Error { message: error },
        }
    }

    /// Run the startup check. Only the first call checks; later calls report the current status.
    pub async fn mount(&self) -> GateStatus {
        if self.mounted.swap(true, Ordering::SeqCst) {
            return self.status();
        }
        self.check().await
    }

    /// Move an unhealthy gate back to `Checking` and forget the cached health.
    ///
    /// Returns `false` (and does nothing) unless the gate is currently unhealthy.
    pub fn begin_retry(&self) -> bool {
        {
            let mut status = self.status.write().unwrap_or_else(PoisonError::into_inner);
            if !matches!(*status, GateStatus::Unhealthy { .. }) {
                return false;
            }
            *status = GateStatus::Checking;
        }
        self.service.reset();
        tracing::info!("Retrying backend health check");
        true
    }

    /// User-initiated retry: reset, then re-run the check.
    pub async fn retry(&self) -> GateStatus {
        if !self.begin_retry() {
            return self.status();
        }
        self.check().await
    }

    /// Perform one check and record its outcome.
    pub async fn check(&self) -> GateStatus {
        let result = self.service.perform_health_check().await;
        let next = if result.is_healthy {
            GateStatus::Healthy
        } else {
            GateStatus::Unhealthy {
                error: result
                    .error
                    .unwrap_or_else(|| "backend unavailable".to_string()),
            }
        };

        *self.status.write().unwrap_or_else(PoisonError::into_inner) = next.clone();
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
    use serde_json::json;

    /// Backend whose health endpoint flips with `healthy` and counts hits.
    #[derive(Clone, Default)]
    struct Flaky {
        healthy: Arc<AtomicBool>,
        hits: Arc<AtomicUsize>,
    }

    async fn flaky_health(State(flaky): State<Flaky>) -> (StatusCode, Json<serde_json::Value>) {
        flaky.hits.fetch_add(1, Ordering::SeqCst);
        if flaky.healthy.load(Ordering::SeqCst) {
            (
                StatusCode::OK,
                Json(json!({
                    "status": "healthy",
                    "timestamp": "2026-10-18T08:00:00Z",
                    "version": "0.1.0",
                    "features": { "cms": true, "translations": true, "fileUploads": true, "database": true },
                    "appKey": "k",
                    "environment": "test"
                })),
            )
        } else {
            (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "status": "unhealthy" })))
        }
    }

    async fn spawn(flaky: Flaky) -> String {
        let app = Router::new()
            .route("/api/health", get(flaky_health))
            .with_state(flaky);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_starts_checking_and_blocks_rendering() {
        let gate = HealthGate::new(Arc::new(HealthCheckService::new("http://127.0.0.1:9")));
        assert_eq!(gate.status(), GateStatus::Checking);
        assert_eq!(gate.view(), GateView::Loading);
    }

    #[tokio::test]
    async fn test_mount_checks_exactly_once() {
        let flaky = Flaky::default();
        flaky.healthy.store(true, Ordering::SeqCst);
        let url = spawn(flaky.clone()).await;
        let gate = HealthGate::new(Arc::new(HealthCheckService::new(url)));

        assert_eq!(gate.mount().await, GateStatus::Healthy);
        assert_eq!(gate.mount().await, GateStatus::Healthy);
        assert_eq!(flaky.hits.load(Ordering::SeqCst), 1);
        assert_eq!(gate.view(), GateView::Ready);
    }

    #[tokio::test]
    async fn test_healthy_is_final_for_the_session() {
        let flaky = Flaky::default();
        flaky.healthy.store(true, Ordering::SeqCst);
        let url = spawn(flaky.clone()).await;
        let gate = HealthGate::new(Arc::new(HealthCheckService::new(url)));
        gate.mount().await;

        flaky.healthy.store(false, Ordering::SeqCst);
        assert!(!gate.begin_retry());
        assert_eq!(gate.retry().await, GateStatus::Healthy);
        assert_eq!(flaky.hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unhealthy_then_manual_retry_recovers() {
        let flaky = Flaky::default();
        let url = spawn(flaky.clone()).await;
        let gate = HealthGate::new(Arc::new(HealthCheckService::new(url)));

        assert!(matches!(gate.mount().await, GateStatus::Unhealthy { .. }));
        assert!(matches!(gate.view(), GateView::Error { .. }));

        // No automatic retry happens while we wait.
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(flaky.hits.load(Ordering::SeqCst), 1);

        flaky.healthy.store(true, Ordering::SeqCst);
        assert!(gate.begin_retry());
        assert_eq!(gate.status(), GateStatus::Checking);
        assert!(!gate.service().is_system_healthy());

        assert_eq!(gate.check().await, GateStatus::Healthy);
        assert_eq!(flaky.hits.load(Ordering::SeqCst), 2);
        assert_eq!(gate.service().app_key().as_deref(), Some("k"));
    }
}
