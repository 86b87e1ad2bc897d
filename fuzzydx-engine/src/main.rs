//! fuzzydx - symptom-based disease prediction service
//!
//! Serves the diagnosis form definition and combined fuzzy / classifier
//! predictions over HTTP, backed by a SQLite rule store.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use fuzzydx_common::config::{default_config_path, load_or_default, RootFolderInitializer};
use fuzzydx_common::db::{init_database, seed_default_catalog};
use fuzzydx_engine::classifier::{ClassifierService, DenseClassifier};
use fuzzydx_engine::config::{CliOverrides, EngineConfig};
use fuzzydx_engine::{build_router, AppState};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Command-line arguments for fuzzydx
#[derive(Parser, Debug)]
#[command(name = "fuzzydx")]
#[command(about = "Fuzzy-logic disease prediction service")]
#[command(version)]
struct Args {
    /// Root folder holding the rule store database
    #[arg(short, long, env = "FUZZYDX_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// Address to listen on
    #[arg(short, long, env = "FUZZYDX_BIND")]
    bind: Option<String>,

    /// Classifier model file
    #[arg(short, long, env = "FUZZYDX_MODEL")]
    model: Option<PathBuf>,

    /// Alternate TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Default log level when RUST_LOG is unset
    #[arg(long)]
    log_level: Option<String>,

    /// Seed the reference catalogue into an empty rule store
    #[arg(long)]
    seed: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().or_else(default_config_path);
    let toml = load_or_default(config_path.as_deref());
    let config = EngineConfig::resolve(
        CliOverrides {
            root_folder: args.root_folder,
            bind_address: args.bind,
            classifier_model: args.model,
            log_level: args.log_level,
        },
        toml,
    );

    init_tracing(&config)?;

    info!(
        "Starting fuzzydx v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let initializer = RootFolderInitializer::new(config.root_folder.clone());
    initializer
        .ensure_directory_exists()
        .context("Failed to create root folder")?;
    info!("Root folder: {}", initializer.root_folder().display());
    info!("Database path: {}", config.database_path.display());

    let pool = match init_database(&config.database_path).await {
        Ok(pool) => {
            info!("✓ Rule store ready");
            pool
        }
        Err(e) => {
            error!("Failed to open rule store: {}", e);
            return Err(e.into());
        }
    };

    if args.seed {
        if seed_default_catalog(&pool).await? {
            info!("✓ Seeded reference catalogue");
        } else {
            info!("Rule store already populated, skipping seed");
        }
    }

    if config.classifier_model == initializer.classifier_model_path() {
        if let Err(e) = DenseClassifier::install_bundled(&config.classifier_model) {
            warn!("Failed to install bundled classifier model: {}", e);
        }
    }

    let classifier = Arc::new(ClassifierService::initialize(&config.classifier_model));
    if !classifier.is_ready() {
        warn!("Classifier unavailable; diagnoses will rely on fuzzy results only");
    }

    let state = AppState::new(pool, classifier.clone());
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;
    info!("fuzzydx listening on http://{}", config.bind_address);
    info!("Health check: http://{}/health", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    classifier.shutdown();
    info!("fuzzydx stopped");

    Ok(())
}

fn init_tracing(config: &EngineConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},tower_http=info", config.log_level)));

    match &config.log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
