use anyhow::Result;
use listing_localizer::cache::TranslationCache;
use listing_localizer::config::Config;
use listing_localizer::console::DryRunConsole;
use listing_localizer::db::Database;
use listing_localizer::server::{create_router, AppState};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("listing_localizer=info".parse()?),
        )
        .init();

    info!("Starting listing localizer");

    let config = Config::from_env()?;

    let db = Database::new(&config.database_path)?;
    let cache = TranslationCache::new(db.clone())?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.openai_timeout_secs))
        .build()?;

    let port = config.port;
    let state = Arc::new(AppState::new(
        config,
        db,
        cache,
        client,
        Arc::new(DryRunConsole::new()),
    ));

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, create_router(state)).await?;

    Ok(())
}
