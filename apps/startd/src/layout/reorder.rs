//! Reorder Engine: list moves and resizes. Never computes geometry; callers
//! re-run the packer on the result.

use serde::Serialize;
use tracing::debug;

use crate::errors::TileError;
use crate::models::{SizeClass, TileId, TileList};

/// Moves `source` to the slot `target` occupies once `source` has been removed,
/// shifting the target and everything after it one place right.
///
/// Both ids must exist. Moving a tile onto itself returns the list unchanged.
pub fn move_tile(tiles: &TileList, source: TileId, target: TileId) -> Result<TileList, TileError> {
    let source_index = tiles
        .position(source)
        .ok_or(TileError::UnknownTile(source))?;
    if !tiles.contains(target) {
        return Err(TileError::UnknownTile(target));
    }
    if source == target {
        return Ok(tiles.clone());
    }

    let mut moved = tiles.clone();
    let record = moved.remove_at(source_index);
    // Target is still present after removing a different record.
    let target_index = moved
        .position(target)
        .ok_or(TileError::UnknownTile(target))?;
    moved.insert_at(target_index, record);

    debug!(%source, %target, from = source_index, to = target_index, "Moved tile");
    Ok(moved)
}

/// Changes a tile's size class in place. Order is untouched.
pub fn resize_tile(tiles: &mut TileList, id: TileId, size: SizeClass) -> Result<(), TileError> {
    let record = tiles.get_mut(id).ok_or(TileError::UnknownTile(id))?;
    record.size_class = size;
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Two-phase drag protocol
// ────────────────────────────────────────────────────────────────────────────

/// What `complete` decided to do with a drop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DropOutcome {
    Moved { source: TileId, target: TileId },
    /// Dropped on empty space or back onto itself.
    Cancelled,
}

/// Tracks the tile currently being dragged. Holds no geometry.
#[derive(Debug, Clone, Default)]
pub struct DragSession {
    active: Option<TileId>,
}

impl DragSession {
    pub fn active(&self) -> Option<TileId> {
        self.active
    }

    /// Starts dragging `id`, replacing any drag already in progress.
    pub fn begin(&mut self, tiles: &TileList, id: TileId) -> Result<(), TileError> {
        if !tiles.contains(id) {
            return Err(TileError::UnknownTile(id));
        }
        self.active = Some(id);
        Ok(())
    }

    pub fn cancel(&mut self) {
        self.active = None;
    }

    /// Finishes the drag of `id` onto `drop_target`, returning the reordered list.
    ///
    /// An unknown drop target is rejected and the drag stays active, so the
    /// caller can retry the drop. Otherwise the session is cleared whether or
    /// not a move happens.
    pub fn complete(
        &mut self,
        tiles: &TileList,
        id: TileId,
        drop_target: Option<TileId>,
    ) -> Result<(TileList, DropOutcome), TileError> {
        if self.active != Some(id) {
            return Err(TileError::DragNotStarted(id));
        }
        if let Some(target) = drop_target.filter(|t| !tiles.contains(*t)) {
            return Err(TileError::UnknownTile(target));
        }
        self.active = None;

        match drop_target {
            Some(target) if target != id => {
                let moved = move_tile(tiles, id, target)?;
                Ok((moved, DropOutcome::Moved { source: id, target }))
            }
            _ => Ok((tiles.clone(), DropOutcome::Cancelled)),
        }
    }
}
