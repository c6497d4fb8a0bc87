// src/main.rs
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::PathBuf;
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

// ============================================================================
// MODULE IMPORTS
// ============================================================================

mod app;
mod auth;
mod common;
mod services;
mod sso;
mod users;

// ============================================================================
// COMMON IMPORTS
// ============================================================================

use common::{AppState, Config};
use services::monitoring::init_sentry;
use services::HttpClient;
use users::{SqliteUserRepository, UserRepository};

#[derive(Parser, Debug)]
#[command(name = "sso-api", about = "Single sign-on service")]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start service
    Start,
}

// ============================================================================
// MAIN APPLICATION ENTRY POINT
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "info" };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(sentry::integrations::tracing::layer())
        .init();

    match cli.command {
        Command::Start => start().await,
    }
}

async fn start() -> anyhow::Result<()> {
    // ========================================================================
    // ENVIRONMENT CONFIGURATION
    // ========================================================================

    let config = Config::from_env()?;
    let _sentry = init_sentry(config.sentry_dsn.as_deref());

    // ========================================================================
    // DATABASE SETUP
    // ========================================================================

    if let Some(path_part) = config.database_url.strip_prefix("sqlite://") {
        let path_without_params = path_part.split('?').next().unwrap_or("");
        if !path_without_params.is_empty() && !path_without_params.starts_with(':') {
            let db_path = PathBuf::from(path_without_params);
            if let Some(parent) = db_path.parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
        }
    }

    let connect_options =
        SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .connect_with(connect_options)
        .await?;

    common::migrations::run_migrations(&pool).await?;

    // ========================================================================
    // SERVICE INITIALIZATION
    // ========================================================================

    let http_client = HttpClient::new(config.http_timeout)?;
    info!(timeout_secs = config.http_timeout.as_secs(), "HttpClient initialized");

    let repository: Arc<dyn UserRepository> = Arc::new(SqliteUserRepository::new(pool));
    let providers = app::configured_providers(&config, &http_client);
    for provider in &providers {
        info!(provider = provider.name(), "Identity provider configured");
    }

    // ========================================================================
    // APPLICATION STATE AND ROUTER
    // ========================================================================

    let port = config.api_port;
    let state = Arc::new(AppState::new(config, repository, providers));
    let app = app::router(state);

    // ========================================================================
    // SERVER STARTUP
    // ========================================================================

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
