use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::layout::{DropOutcome, Point};
use crate::models::{SizeClass, TileId};
use crate::screen::ScreenSnapshot;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct MoveRequest {
    pub source_id: TileId,
    pub target_id: TileId,
}

#[derive(Deserialize)]
pub struct ResizeRequest {
    /// `small`, `wide` or `large`.
    pub size: String,
}

#[derive(Deserialize)]
pub struct BeginDragRequest {
    pub tile_id: TileId,
}

/// Either an explicit drop target or a drop point; the target wins if both are sent.
#[derive(Deserialize)]
pub struct CompleteDragRequest {
    pub tile_id: TileId,
    pub drop_target_id: Option<TileId>,
    pub point: Option<Point>,
}

#[derive(Serialize)]
pub struct DropResponse {
    #[serde(flatten)]
    pub outcome: DropOutcome,
    pub screen: ScreenSnapshot,
}

#[derive(Serialize)]
pub struct HitTestResponse {
    pub tile_id: Option<TileId>,
}

/// GET /api/v1/tiles
pub async fn handle_get_tiles(State(state): State<AppState>) -> Json<ScreenSnapshot> {
    Json(state.screen.lock().await.snapshot())
}

/// POST /api/v1/tiles/move
pub async fn handle_move(
    State(state): State<AppState>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<ScreenSnapshot>, AppError> {
    let mut screen = state.screen.lock().await;
    screen.move_tile(req.source_id, req.target_id)?;
    Ok(Json(screen.snapshot()))
}

/// PATCH /api/v1/tiles/:id/size
pub async fn handle_resize(
    State(state): State<AppState>,
    Path(id): Path<TileId>,
    Json(req): Json<ResizeRequest>,
) -> Result<Json<ScreenSnapshot>, AppError> {
    let size: SizeClass = req.size.parse()?;
    let mut screen = state.screen.lock().await;
    screen.resize_tile(id, size)?;
    Ok(Json(screen.snapshot()))
}

/// POST /api/v1/drag/begin
pub async fn handle_begin_drag(
    State(state): State<AppState>,
    Json(req): Json<BeginDragRequest>,
) -> Result<Json<ScreenSnapshot>, AppError> {
    let mut screen = state.screen.lock().await;
    screen.begin_drag(req.tile_id)?;
    Ok(Json(screen.snapshot()))
}

/// POST /api/v1/drag/complete
pub async fn handle_complete_drag(
    State(state): State<AppState>,
    Json(req): Json<CompleteDragRequest>,
) -> Result<Json<DropResponse>, AppError> {
    let mut screen = state.screen.lock().await;
    let outcome = match (req.drop_target_id, req.point) {
        (Some(target), _) => screen.complete_drag(req.tile_id, Some(target))?,
        (None, Some(point)) => screen.complete_drag_at(req.tile_id, point)?,
        (None, None) => screen.complete_drag(req.tile_id, None)?,
    };
    Ok(Json(DropResponse {
        outcome,
        screen: screen.snapshot(),
    }))
}

/// POST /api/v1/drag/cancel
pub async fn handle_cancel_drag(State(state): State<AppState>) -> Json<ScreenSnapshot> {
    let mut screen = state.screen.lock().await;
    screen.cancel_drag();
    Json(screen.snapshot())
}

/// POST /api/v1/hit-test
pub async fn handle_hit_test(
    State(state): State<AppState>,
    Json(point): Json<Point>,
) -> Json<HitTestResponse> {
    let screen = state.screen.lock().await;
    Json(HitTestResponse {
        tile_id: screen.hit_test(point),
    })
}
