use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use jobly_api::config::AppConfig;
use jobly_api::database::DatabaseManager;
use jobly_api::{app, AppState};

/// Jobly job-board API server
#[derive(Debug, Parser)]
#[command(name = "jobly-api", version, about)]
struct Args {
    /// Port to listen on (overrides PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Postgres connection URL (overrides DATABASE_URL)
    #[arg(long)]
    database_url: Option<String>,

    /// Skip applying migrations at startup
    #[arg(long)]
    no_migrate: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SECRET_KEY, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jobly_api=debug,tower_http=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = AppConfig::from_env();
    if let Some(port) = args.port {
        config.api.port = port;
    }
    if let Some(url) = args.database_url {
        config.database.url = url;
    }
    if args.no_migrate {
        config.database.run_migrations = false;
    }
    tracing::info!("Starting Jobly API in {:?} mode", config.environment);
    if config.is_production() && config.security.secret_key == "secret-dev" {
        tracing::warn!("SECRET_KEY is the development default");
    }

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    if config.database.run_migrations {
        DatabaseManager::migrate(&pool).await.context("failed to run migrations")?;
    }

    let port = config.api.port;
    let state = AppState::new(pool, config).context("invalid password hash settings")?;

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Jobly API listening on http://{}", bind_addr);
    axum::serve(listener, app(state)).await.context("server error")?;

    Ok(())
}
