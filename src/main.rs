use std::{sync::Arc, time::Duration};

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use reelmate::{config::Config, create_router, db, services::TmdbClient, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("reelmate=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("failed to load configuration")?;

    let pool = db::create_pool(&config.database_url)
        .await
        .context("failed to open database")?;

    let catalog = TmdbClient::new(
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
        Duration::from_secs(config.tmdb_timeout_secs),
    )?;

    let state = AppState::new(pool, Arc::new(catalog), &config);

    let genre_count = state.genres.refresh(state.catalog.as_ref()).await;
    tracing::info!(genre_count, "Genre map loaded");

    if config.warmup_pages > 0 {
        let added = state.ingest(1, config.warmup_pages).await?;
        tracing::info!(added, pages = config.warmup_pages, "Warm-up ingestion finished");
    }

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!(%addr, "Server running");

    axum::serve(listener, app).await?;

    Ok(())
}
