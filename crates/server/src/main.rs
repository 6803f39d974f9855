use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use archivestream_core::{
    load_config, load_config_from_env, validate_config, Config, InternetArchiveStore,
    MetadataLookup, NoMetadata, Resolver, ResolverConfig, TmdbMetadata,
};
use archivestream_server::{api::create_router, state::AppState};

/// Config file used when ARCHIVESTREAM_CONFIG is unset.
const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = read_config()?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;
    info!("Configuration loaded successfully");

    // Metadata lookup, optional
    let metadata: Arc<dyn MetadataLookup> = match &config.tmdb {
        Some(tmdb_config) => match TmdbMetadata::new(tmdb_config.clone()) {
            Ok(lookup) => {
                info!("Initializing TMDB metadata lookup");
                Arc::new(lookup)
            }
            Err(e) => {
                warn!("TMDB lookup unavailable, searching by id only: {}", e);
                Arc::new(NoMetadata)
            }
        },
        None => {
            info!("No metadata provider configured, searching by id only");
            Arc::new(NoMetadata)
        }
    };

    let store = InternetArchiveStore::new(&config.archive)
        .context("Failed to create Internet Archive client")?;
    info!("Using Internet Archive at {}", config.archive.search_url);

    let resolver = Arc::new(Resolver::new(
        ResolverConfig::from(&config),
        metadata,
        Arc::new(store),
    ));

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), resolver));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

/// Load config from ARCHIVESTREAM_CONFIG, then `config.toml`, then the
/// environment alone.
fn read_config() -> Result<Config> {
    if let Ok(path) = std::env::var("ARCHIVESTREAM_CONFIG") {
        let path = PathBuf::from(path);
        info!("Loading configuration from {:?}", path);
        return load_config(&path)
            .with_context(|| format!("Failed to load config from {:?}", path));
    }

    let default_path = Path::new(DEFAULT_CONFIG_PATH);
    if default_path.exists() {
        info!("Loading configuration from {:?}", default_path);
        return load_config(default_path)
            .with_context(|| format!("Failed to load config from {:?}", default_path));
    }

    info!("No config file found, using defaults and environment");
    load_config_from_env().context("Failed to load config from environment")
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
