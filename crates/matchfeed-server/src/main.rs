//! Matchfeed server binary — wires store, settings, and pipeline together
//! and starts the HTTP/WebSocket server.

#![deny(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use matchfeed_server::{AppState, router};
use matchfeed_settings::MatchfeedSettings;
use matchfeed_store::ConnectionConfig;

/// Matchfeed replay and analytics server.
#[derive(Parser, Debug)]
#[command(name = "matchfeed-server", about = "Match event replay and analytics server")]
struct Cli {
    /// Host to bind (overrides settings).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides settings; 0 for auto-assign).
    #[arg(long)]
    port: Option<u16>,

    /// Path to the `SQLite` database (overrides settings).
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Pre-recorded provider log to register at startup (JSON file shaped
    /// like a registration request).
    #[arg(long)]
    fixture: Option<PathBuf>,
}

fn ensure_parent_dir(path: &std::path::Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    Ok(())
}

/// Register a fixture file's game before serving.
fn load_fixture(state: &AppState, path: &std::path::Path) -> Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read fixture: {}", path.display()))?;
    let request: matchfeed_server::service::RegisterGameRequest =
        serde_json::from_str(&raw).context("Failed to parse fixture")?;
    let registered = matchfeed_server::service::register_game(state, request)
        .map_err(|e| anyhow::anyhow!("Failed to register fixture game: {e}"))?;
    tracing::info!(
        game_id = %registered.game_id,
        total_events = registered.total_events,
        dropped = registered.dropped,
        "fixture game registered"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("matchfeed=info,matchfeed_server=info")),
        )
        .init();

    let settings_path = matchfeed_settings::loader::settings_path();
    let mut settings: MatchfeedSettings =
        matchfeed_settings::loader::load_settings_from_path(&settings_path)
            .unwrap_or_default();
    if let Some(host) = args.host {
        settings.server.host = host;
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }
    if let Some(db_path) = args.db_path {
        settings.store.db_path = db_path.to_string_lossy().into_owned();
    }
    // Publish the effective settings for global readers.
    if matchfeed_settings::init_settings(settings.clone()).is_err() {
        tracing::warn!("settings were already initialized, keeping the first value");
    }

    let db_path = PathBuf::from(&settings.store.db_path);
    ensure_parent_dir(&db_path)?;
    let config = ConnectionConfig {
        pool_size: settings.store.pool_size,
        busy_timeout_ms: settings.store.busy_timeout_ms,
        ..ConnectionConfig::default()
    };
    let gateway = matchfeed_store::open(&settings.store.db_path, &config)
        .context("Failed to open database")?;

    let metrics = matchfeed_server::metrics::install_recorder();
    let bind = format!("{}:{}", settings.server.host, settings.server.port);
    let state = AppState::new(Arc::new(gateway), settings, metrics);

    if let Some(ref fixture) = args.fixture {
        load_fixture(&state, fixture)?;
    }

    let app = router(state);
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;
    let addr = listener.local_addr().context("Failed to read bound address")?;
    tracing::info!("matchfeed server listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await
        .context("Server error")?;

    Ok(())
}
