//! Co-ownership agreement server: application entry point.

use std::path::PathBuf;

use clap::Parser;
use coown_db::{DbManager, seed_templates};
use coown_server::{AppState, ServerConfig, create_router};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "coown-server")]
#[command(about = "Agreement template store and signature tracking API")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "coown.toml")]
    config: PathBuf,

    /// Listen address (overrides config file)
    #[arg(long, env = "COOWN_BIND")]
    bind: Option<String>,

    /// SurrealDB URL (overrides config file)
    #[arg(long, env = "COOWN_DB_URL")]
    db_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("coown_server=info".parse()?)
                .add_directive("coown_db=info".parse()?)
                .add_directive("coown_agreements=info".parse()?),
        )
        .json()
        .init();

    let cli = Cli::parse();

    let mut config = ServerConfig::load(&cli.config)?;
    if let Some(bind) = cli.bind {
        config.http.bind = bind;
    }
    if let Some(url) = cli.db_url {
        config.database.url = url;
    }

    info!(config = %cli.config.display(), "Starting co-ownership agreement server");

    let db = DbManager::init(&config.database).await?;

    if config.templates.seed_on_startup {
        seed_templates(db.client()).await?;
    }

    let state = AppState::new(db.client().clone(), config.templates.agreement_config());
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.http.bind).await?;
    info!(bind = %config.http.bind, "API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.shutdown().await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
