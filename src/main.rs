use std::net::SocketAddr;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use foodgram::config::{Cli, Config};
use foodgram::state::AppState;
use foodgram::{db, routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse CLI args and load config
    let cli = Cli::parse();
    let data_dir = Config::data_dir(&cli)?;
    std::fs::create_dir_all(&data_dir)?;
    tracing::info!("Data directory: {}", data_dir.display());

    let config = Config::load(&cli)?;

    // Initialize database
    let pool = db::create_pool(&config.db_path())?;
    db::run_migrations(&pool)?;

    if let Some(path) = &cli.import {
        let summary = db::import_fixture_file(&pool, path)?;
        tracing::info!(
            "Import of {} finished: {} ingredients, {} tags added",
            path.display(),
            summary.ingredients,
            summary.tags
        );
        return Ok(());
    }

    let media_dir = config.media_path();
    std::fs::create_dir_all(&media_dir)?;

    let state = AppState {
        db: pool,
        config: config.clone(),
        media_dir,
    };
    let app = routes::app(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
