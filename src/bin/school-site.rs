//! School website frontend server.

use std::sync::Arc;

use school_cms::config::SiteConfig;
use school_cms::gate::{GateStatus, HealthGate};
use school_cms::health::HealthCheckService;
use school_cms::init_tracing;
use school_cms::site::{create_site_router, SiteState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = SiteConfig::from_env();

    // Initialize logging
    init_tracing(&config.log_level);

    tracing::info!("Starting school website server");
    tracing::info!("Static files: {:?}", config.static_dir);
    tracing::info!("Backend: {}", config.api_url);

    if !config.static_dir.join("index.html").is_file() {
        tracing::warn!("No index.html in {:?}", config.static_dir);
    }

    let service = Arc::new(HealthCheckService::with_timeouts(
        config.api_url.clone(),
        config.health_timeout,
        config.ping_timeout,
    ));
    let gate = Arc::new(HealthGate::new(service));

    // The entry document stays gated until this first check resolves
    let startup = gate.clone();
    tokio::spawn(async move {
        if let GateStatus::Unhealthy { error } = startup.mount().await {
            tracing::warn!("Backend is unavailable: {}", error);
        }
    });

    // The proxy relays redirects instead of following them
    let http = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()?;

    let state = SiteState {
        gate,
        http,
        api_url: config.api_url.clone(),
        static_dir: config.static_dir.clone(),
    };

    let app = create_site_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
