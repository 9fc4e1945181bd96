use std::path::{Component, Path as FsPath, PathBuf};
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::info;

use crate::errors::AppError;
use crate::models::TileId;
use crate::screen::{ScreenSnapshot, StartScreen};
use crate::source::catalog::{build_catalog, ProgramCategory};
use crate::source::collaborators::{Launcher, ShortcutResolver};
use crate::source::pins;
use crate::source::scan::{discover_pinned, has_extension};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ShortcutRequest {
    pub path: PathBuf,
}

#[derive(Serialize)]
pub struct ReloadResponse {
    pub added: usize,
    pub removed: usize,
    #[serde(flatten)]
    pub screen: ScreenSnapshot,
}

/// Rescans the pinned directory and reconciles the screen against it.
///
/// The screen lock is held across the blocking scan so no other event can
/// interleave between discovery and layout.
pub async fn reload_pinned(state: &AppState) -> Result<ReloadResponse, AppError> {
    let mut screen = state.screen.lock().await;
    reload_locked(state, &mut screen).await
}

/// Reload body for callers that already hold the screen lock.
async fn reload_locked(
    state: &AppState,
    screen: &mut StartScreen,
) -> Result<ReloadResponse, AppError> {
    let dir = state.config.pinned_dir.clone();
    let extension = state.config.shortcut_extension.clone();
    let resolver = Arc::clone(&state.resolver);
    let icons = Arc::clone(&state.icons);
    let discovered = tokio::task::spawn_blocking(move || {
        discover_pinned(&dir, &extension, resolver.as_ref(), icons.as_ref())
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in pinned scan: {e}")))??;

    let summary = screen.apply_scan(&discovered)?;
    Ok(ReloadResponse {
        added: summary.added,
        removed: summary.removed,
        screen: screen.snapshot(),
    })
}

fn launch_path(
    path: &FsPath,
    resolver: &dyn ShortcutResolver,
    launcher: &dyn Launcher,
) -> Result<(), AppError> {
    let target = resolver.resolve(path).ok_or_else(|| {
        AppError::Launch(format!("'{}' does not resolve to a target", path.display()))
    })?;
    launcher
        .launch(&target)
        .map_err(|e| AppError::Launch(format!("Failed to start '{}': {e}", target.display())))?;
    info!(target = %target.display(), "Launched program");
    Ok(())
}

/// Rejects paths outside the start-menu tree or without the shortcut extension.
/// `..` components are refused outright since the prefix check is lexical.
fn validate_catalog_path(state: &AppState, path: &FsPath) -> Result<(), AppError> {
    let escapes = path.components().any(|c| matches!(c, Component::ParentDir));
    if escapes
        || !path.starts_with(&state.config.start_menu_dir)
        || !has_extension(path, &state.config.shortcut_extension)
    {
        return Err(AppError::Validation(format!(
            "'{}' is not a shortcut in the start menu",
            path.display()
        )));
    }
    Ok(())
}

async fn source_path_of(screen: &Mutex<StartScreen>, id: TileId) -> Result<PathBuf, AppError> {
    let screen = screen.lock().await;
    Ok(screen.tile(id)?.source_path.clone())
}

/// POST /api/v1/tiles/reload
pub async fn handle_reload(State(state): State<AppState>) -> Result<Json<ReloadResponse>, AppError> {
    Ok(Json(reload_pinned(&state).await?))
}

/// GET /api/v1/catalog
pub async fn handle_catalog(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProgramCategory>>, AppError> {
    let root = state.config.start_menu_dir.clone();
    let extension = state.config.shortcut_extension.clone();
    let resolver = Arc::clone(&state.resolver);
    let catalog = tokio::task::spawn_blocking(move || {
        build_catalog(&root, &extension, resolver.as_ref())
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in catalog scan: {e}")))??;
    Ok(Json(catalog))
}

/// POST /api/v1/catalog/pin
pub async fn handle_pin(
    State(state): State<AppState>,
    Json(req): Json<ShortcutRequest>,
) -> Result<Json<ReloadResponse>, AppError> {
    validate_catalog_path(&state, &req.path)?;
    let mut screen = state.screen.lock().await;
    pins::pin(&state.config.pinned_dir, &req.path).map_err(|e| {
        AppError::Pin(format!("Failed to pin '{}': {e}", req.path.display()))
    })?;
    Ok(Json(reload_locked(&state, &mut screen).await?))
}

/// DELETE /api/v1/tiles/:id/pin
pub async fn handle_unpin(
    State(state): State<AppState>,
    Path(id): Path<TileId>,
) -> Result<Json<ReloadResponse>, AppError> {
    let mut screen = state.screen.lock().await;
    let path = screen.tile(id)?.source_path.clone();
    pins::unpin(&state.config.pinned_dir, &path)
        .map_err(|e| AppError::Pin(format!("Failed to unpin '{}': {e}", path.display())))?;
    Ok(Json(reload_locked(&state, &mut screen).await?))
}

/// POST /api/v1/tiles/:id/launch
pub async fn handle_launch_tile(
    State(state): State<AppState>,
    Path(id): Path<TileId>,
) -> Result<StatusCode, AppError> {
    let path = source_path_of(&state.screen, id).await?;
    launch_path(&path, state.resolver.as_ref(), state.launcher.as_ref())?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/catalog/launch
pub async fn handle_launch_catalog(
    State(state): State<AppState>,
    Json(req): Json<ShortcutRequest>,
) -> Result<StatusCode, AppError> {
    validate_catalog_path(&state, &req.path)?;
    launch_path(&req.path, state.resolver.as_ref(), state.launcher.as_ref())?;
    Ok(StatusCode::NO_CONTENT)
}
