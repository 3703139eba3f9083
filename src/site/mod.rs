//! Static site server with a health-gated entry document.
//!
//! Built assets are served straight from the bundle directory. The entry
//! document (`/`, `/index.html` and every unmatched path, for client-side
//! routing) is only handed out once the backend health gate is open; until
//! then visitors get a loading page or an error page with a retry button.
//! `/api` and `/uploads` (and everything below them) are forwarded to the backend unchanged.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::{Request, State},
    handler::Handler,
    http::{header, HeaderMap, HeaderName, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{any, get, post},
    Router,
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::gate::{GateView, HealthGate};
use crate::i18n::{Catalog, Locale};

/// Largest request body forwarded to the backend.
pub const MAX_PROXY_BODY: usize = 16 * 1024 * 1024;

/// Headers that describe one hop and must not be forwarded.
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// State shared by the site handlers.
#[derive(Clone)]
pub struct SiteState {
    pub gate: Arc<HealthGate>,
    pub http: reqwest::Client,
    /// Backend origin, no trailing slash.
    pub api_url: String,
    pub static_dir: PathBuf,
}

/// Create the site router.
pub fn create_site_router(state: SiteState) -> Router {
    let assets = ServeDir::new(&state.static_dir)
        .append_index_html_on_directories(false)
        .fallback(spa_entry.with_state(state.clone()));

    Router::new()
        .route("/", get(spa_entry))
        .route("/index.html", get(spa_entry))
        .route("/_gate/retry", post(retry_gate))
        .route("/api", any(proxy))
        .route("/api/{*path}", any(proxy))
        .route("/uploads", any(proxy))
        .route("/uploads/{*path}", any(proxy))
        .fallback_service(assets)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// The single-page entry document, or the gate's placeholder.
async fn spa_entry(State(state): State<SiteState>, headers: HeaderMap) -> Response {
    let locale = preferred_locale(&headers);

    match state.gate.view() {
        GateView::Loading => (
            StatusCode::SERVICE_UNAVAILABLE,
            [(header::RETRY_AFTER, "2")],
            Html(loading_page(locale)),
        )
            .into_response(),
        GateView::Error { message } => {
            tracing::debug!("Serving gate error page: {}", message);
            (StatusCode::SERVICE_UNAVAILABLE, Html(error_page(locale))).into_response()
        }
        GateView::Ready => {
            let index = state.static_dir.join("index.html");
            match tokio::fs::read(&index).await {
                Ok(bytes) => (
                    [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                    bytes,
                )
                    .into_response(),
                Err(e) => {
                    tracing::error!("Cannot read entry document {:?}: {}", index, e);
                    StatusCode::NOT_FOUND.into_response()
                }
            }
        }
    }
}

/// Start a new health check in the background and send the visitor back to `/`.
async fn retry_gate(State(state): State<SiteState>) -> Redirect {
    if state.gate.begin_retry() {
        let gate = state.gate.clone();
        tokio::spawn(async move {
            gate.check().await;
        });
    }
    Redirect::to("/")
}

/// Forward a request to the backend and relay its response.
async fn proxy(State(state): State<SiteState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let target = format!(
        "{}{}",
        state.api_url,
        parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/")
    );

    let body = match axum::body::to_bytes(body, MAX_PROXY_BODY).await {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!("Rejecting proxied request body: {}", e);
            return StatusCode::PAYLOAD_TOO_LARGE.into_response();
        }
    };

    let mut upstream = state.http.request(parts.method.clone(), &target);
    for (name, value) in parts.headers.iter() {
        if forwardable(name) && *name != header::HOST && *name != header::CONTENT_LENGTH {
            upstream = upstream.header(name, value);
        }
    }

    let upstream = match upstream.body(body).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("Proxy {} {} failed: {}", parts.method, target, e);
            return StatusCode::BAD_GATEWAY.into_response();
        }
    };

    let status = upstream.status();
    let headers = upstream.headers().clone();
    let bytes: Bytes = match upstream.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("Proxy {} {} body failed: {}", parts.method, target, e);
            return StatusCode::BAD_GATEWAY.into_response();
        }
    };

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    for (name, value) in headers.iter() {
        if forwardable(name) && *name != header::CONTENT_LENGTH {
            response.headers_mut().append(name.clone(), value.clone());
        }
    }
    response
}

fn forwardable(name: &HeaderName) -> bool {
    !HOP_BY_HOP.contains(&name.as_str())
}

/// First supported language in `Accept-Language`, else Bulgarian.
pub fn preferred_locale(headers: &HeaderMap) -> Locale {
    headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| {
            v.split(',')
                .filter_map(|tag| tag.split(';').next())
                .find_map(Locale::parse)
        })
        .unwrap_or_default()
}

fn text(key: &str, locale: Locale) -> &'static str {
    Catalog::bundled().get(key, locale).unwrap_or_default()
}

fn loading_page(locale: Locale) -> String {
    format!(
        r#"<!doctype html>
<html lang="{lang}">
<head><meta charset="utf-8"><meta http-equiv="refresh" content="2"><title>{title}</title></head>
<body><main class="gate gate-loading"><p>{checking}</p></main></body>
</html>
"#,
        lang = locale,
        title = text("footer.school_name", locale),
        checking = text("health.checking", locale),
    )
}

fn error_page(locale: Locale) -> String {
    format!(
        r#"<!doctype html>
<html lang="{lang}">
<head><meta charset="utf-8"><title>{title}</title></head>
<body><main class="gate gate-error">
<p>{unavailable}</p>
<form method="post" action="/_gate/retry"><button type="submit">{retry}</button></form>
</main></body>
</html>
"#,
        lang = locale,
        title = text("footer.school_name", locale),
        unavailable = text("health.unavailable", locale),
        retry = text("health.retry", locale),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use axum::http::HeaderValue;
    use axum::Json;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    use crate::health::HealthCheckService;

    #[derive(Clone, Default)]
    struct Backend {
        healthy: Arc<AtomicBool>,
    }

    async fn backend_health(State(backend): State<Backend>) -> Response {
        if backend.healthy.load(Ordering::SeqCst) {
            Json(json!({
                "status": "healthy",
                "timestamp": "2026-10-18T08:00:00Z",
                "version": "0.1.0",
                "features": { "cms": true, "translations": true, "fileUploads": true, "database": true },
                "appKey": "k",
                "environment": "test"
            }))
            .into_response()
        } else {
            (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "status": "unhealthy" }))).into_response()
        }
    }

    async fn echo(request: Request) -> Response {
        let method = request.method().to_string();
        let query = request.uri().query().unwrap_or_default().to_string();
        let body = axum::body::to_bytes(request.into_body(), 1024).await.unwrap();
        (
            StatusCode::CREATED,
            [("x-backend", "yes")],
            Json(json!({
                "method": method,
                "query": query,
                "body": String::from_utf8_lossy(&body),
            })),
        )
            .into_response()
    }

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    struct SiteFixture {
        client: reqwest::Client,
        base_url: String,
        gate: Arc<HealthGate>,
        backend: Backend,
        _static_dir: TempDir,
    }

    impl SiteFixture {
        async fn new(healthy: bool) -> Self {
            let backend = Backend::default();
            backend.healthy.store(healthy, Ordering::SeqCst);
            let api_url = serve(
                Router::new()
                    .route("/api/health", get(backend_health))
                    .route("/api/echo", any(echo))
                    .with_state(backend.clone()),
            )
            .await;
            Self::with_api_url(api_url, backend).await
        }

        async fn with_api_url(api_url: String, backend: Backend) -> Self {
            let static_dir = TempDir::new().unwrap();
            std::fs::write(static_dir.path().join("index.html"), "<div id=\"root\"></div>").unwrap();
            std::fs::write(static_dir.path().join("app.js"), "console.log(1)").unwrap();

            let service = Arc::new(HealthCheckService::with_timeouts(
                api_url.clone(),
                Duration::from_millis(500),
                Duration::from_millis(500),
            ));
            let gate = Arc::new(HealthGate::new(service));

            let state = SiteState {
                gate: gate.clone(),
                http: reqwest::Client::new(),
                api_url,
                static_dir: static_dir.path().to_path_buf(),
            };
            let base_url = serve(create_site_router(state)).await;

            let client = reqwest::Client::builder()
                .redirect(reqwest::redirect::Policy::none())
                .build()
                .unwrap();

            Self {
                client,
                base_url,
                gate,
                backend,
                _static_dir: static_dir,
            }
        }

        fn url(&self, path: &str) -> String {
            format!("{}{}", self.base_url, path)
        }
    }

    #[tokio::test]
    async fn test_entry_is_blocked_until_check_resolves() {
        let fx = SiteFixture::new(true).await;

        let resp = fx.client.get(fx.url("/")).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = resp.text().await.unwrap();
        assert!(body.contains(text("health.checking", Locale::Bg)));
        assert!(!body.contains("id=\"root\""));

        fx.gate.mount().await;
        let resp = fx.client.get(fx.url("/")).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.text().await.unwrap().contains("id=\"root\""));
    }

    #[tokio::test]
    async fn test_unmatched_paths_get_entry_document() {
        let fx = SiteFixture::new(true).await;
        fx.gate.mount().await;

        let resp = fx.client.get(fx.url("/school/history")).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.text().await.unwrap().contains("id=\"root\""));

        let resp = fx.client.get(fx.url("/app.js")).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.text().await.unwrap(), "console.log(1)");
    }

    #[tokio::test]
    async fn test_error_page_is_localized_and_retry_recovers() {
        let fx = SiteFixture::new(false).await;
        fx.gate.mount().await;

        let resp = fx
            .client
            .get(fx.url("/events"))
            .header(header::ACCEPT_LANGUAGE, "en-GB,en;q=0.9")
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = resp.text().await.unwrap();
        assert!(body.contains(text("health.unavailable", Locale::En)));
        assert!(body.contains("/_gate/retry"));

        fx.backend.healthy.store(true, Ordering::SeqCst);
        let resp = fx.client.post(fx.url("/_gate/retry")).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers()[header::LOCATION], "/");

        let mut status = StatusCode::SERVICE_UNAVAILABLE;
        for _ in 0..50 {
            status = fx.client.get(fx.url("/")).send().await.unwrap().status();
            if status == StatusCode::OK {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_proxy_forwards_method_query_body_and_status() {
        let fx = SiteFixture::new(true).await;

        let resp = fx
            .client
            .post(fx.url("/api/echo?lang=en&limit=3"))
            .body("payload")
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(resp.headers()["x-backend"], HeaderValue::from_static("yes"));
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["method"], "POST");
        assert_eq!(body["query"], "lang=en&limit=3");
        assert_eq!(body["body"], "payload");

        let resp = fx.client.get(fx.url("/api/missing")).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_bare_prefixes_are_proxied_not_entry_document() {
        let fx = SiteFixture::new(true).await;
        fx.gate.mount().await;

        for path in ["/api", "/uploads"] {
            let resp = fx.client.get(fx.url(path)).send().await.unwrap();
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{path}");
            assert!(!resp.text().await.unwrap().contains("id=\"root\""));
        }
    }

    #[tokio::test]
    async fn test_proxy_transport_failure_is_bad_gateway() {
        let fx = SiteFixture::with_api_url("http://127.0.0.1:9".to_string(), Backend::default()).await;
        let resp = fx.client.get(fx.url("/api/health")).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let resp = fx.client.get(fx.url("/uploads/a.jpg")).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let resp = fx.client.get(fx.url("/api")).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_preferred_locale() {
        let mut headers = HeaderMap::new();
        assert_eq!(preferred_locale(&headers), Locale::Bg);
        headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static("de-DE, en;q=0.8"));
        assert_eq!(preferred_locale(&headers), Locale::En);
        headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static("fr"));
        assert_eq!(preferred_locale(&headers), Locale::Bg);
    }
}
