mod config;
mod errors;
mod layout;
mod models;
mod routes;
mod screen;
mod source;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::layout::{CellMetrics, GridSpec};
use crate::routes::build_router;
use crate::screen::StartScreen;
use crate::source::collaborators::{ExistingFileResolver, ShellLauncher, TargetUriIcons};
use crate::source::handlers::reload_pinned;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting startd v{}", env!("CARGO_PKG_VERSION"));

    let grid = GridSpec::default();
    let metrics = CellMetrics {
        cell_px: config.cell_px,
        page_gap_px: config.page_gap_px,
    };
    let screen = StartScreen::new(grid, metrics)?;
    info!(
        columns = grid.columns,
        max_rows = grid.max_rows,
        cell_px = metrics.cell_px,
        "Tile grid configured"
    );

    let state = AppState {
        config: config.clone(),
        screen: Arc::new(Mutex::new(screen)),
        resolver: Arc::new(ExistingFileResolver),
        icons: Arc::new(TargetUriIcons),
        launcher: Arc::new(ShellLauncher),
    };

    // Initial load. An unreadable pinned directory means a misconfigured
    // environment, so startup stops here.
    let loaded = reload_pinned(&state)
        .await
        .context("Initial scan of the pinned directory failed")?;
    info!(
        tiles = loaded.screen.tiles.len(),
        pages = loaded.screen.layout.page_count(),
        pinned_dir = %config.pinned_dir.display(),
        "Loaded pinned tiles"
    );

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the shell UI has a fixed host

    let addr: SocketAddr = format!("127.0.0.1:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
