//! School CMS
//!
//! Bilingual (Bulgarian/English) school website: a REST backend over MySQL, a
//! health-gated static/proxy site server, and the content client the site
//! uses to resolve each page section with a bundled fallback.

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod db;
pub mod errors;
pub mod fallback;
pub mod gate;
pub mod health;
pub mod i18n;
pub mod models;
pub mod search;
pub mod site;
pub mod views;

use std::sync::Arc;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::Repository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Arc<Config>,
}

/// Install the global tracing subscriber. `LOG_FORMAT=json` switches to JSON lines.
pub fn init_tracing(log_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Create the backend router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.allowed_origins);

    let api_routes = Router::new()
        // Availability
        .route("/health", get(api::health))
        .route("/ping", get(api::ping))
        // Accounts
        .route("/login", post(api::login))
        .route("/register", post(api::register))
        // Content
        .route("/translations", get(api::get_translations))
        .route("/pages", get(api::list_pages))
        .route("/pages/{slug}", get(api::get_page))
        .route("/navigation/header-menu", get(api::header_menu))
        .route("/schoolstaff", get(api::list_staff))
        .route("/content/{page_key}", get(api::content_sections))
        .route("/news", get(api::list_news))
        .route("/news/{id}", get(api::get_news))
        .route("/events", get(api::upcoming_events))
        .route("/search", get(api::search_pages))
        // Files
        .route("/images/{key}", get(api::get_image));

    let app = Router::new()
        .nest("/api", api_routes)
        .nest_service("/uploads", ServeDir::new(&state.config.upload_path));

    let app = match state.config.base_path.as_str() {
        "" => app,
        base => Router::new().nest(base, app),
    };

    app.layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Any origin when none are configured, otherwise exactly the listed ones.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid origin in ALLOWED_ORIGINS: {}", origin);
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}
