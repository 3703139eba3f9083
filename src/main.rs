//! School CMS backend server.

use std::sync::Arc;

use school_cms::config::Config;
use school_cms::db::{self, Dialect, Repository};
use school_cms::{auth, create_router, init_tracing, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    init_tracing(&config.log_level);

    tracing::info!("Starting school CMS backend");
    tracing::info!(
        "Database: {:?}",
        Dialect::from_url(&config.database_url)
    );
    tracing::info!("Upload path: {:?}", config.upload_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.allowed_origins.is_empty() {
        tracing::warn!("ALLOWED_ORIGINS is not set. CORS accepts any origin!");
    }

    // A database we cannot reach is unrecoverable
    let pool = match db::init_database(&config.database_url, config.pool_size).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to initialize database pool: {}", e);
            std::process::exit(1);
        }
    };
    let repo = Arc::new(Repository::new(pool));

    if let Some(seed) = &config.admin {
        if let Err(e) = auth::seed_admin(&repo, seed).await {
            tracing::warn!("Failed to seed admin user: {}", e);
        }
    }

    if let Err(e) = tokio::fs::create_dir_all(&config.upload_path).await {
        tracing::warn!("Cannot create upload directory {:?}: {}", config.upload_path, e);
    }

    // Create application state
    let state = AppState {
        repo,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
