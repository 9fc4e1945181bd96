//! Start Screen: the single owner of the tile list and its current layout.
//!
//! # Event model
//! Every external event (rescan, resize, drop) mutates the list and then runs
//! one full layout pass; the layout and hit map are never edited incrementally.
//! `AppState` wraps the screen in one async mutex, which serializes events.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::errors::TileError;
use crate::layout::{
    layout, move_tile, resize_tile, CellMetrics, DragSession, DropOutcome, GridSpec, HitMap,
    Layout, Point,
};
use crate::models::{SizeClass, TileId, TileList, TileRecord};
use crate::source::reconcile::{reconcile_with, ReconcileSummary};
use crate::source::scan::DiscoveredShortcut;

/// What the presentation layer needs to draw the screen.
#[derive(Debug, Clone, Serialize)]
pub struct ScreenSnapshot {
    pub tiles: TileList,
    pub layout: Layout,
    pub dragging: Option<TileId>,
    pub last_reload: Option<DateTime<Utc>>,
}

#[derive(Debug)]
pub struct StartScreen {
    grid: GridSpec,
    metrics: CellMetrics,
    tiles: TileList,
    layout: Layout,
    hit_map: HitMap,
    drag: DragSession,
    last_reload: Option<DateTime<Utc>>,
}

impl StartScreen {
    pub fn new(grid: GridSpec, metrics: CellMetrics) -> Result<Self, TileError> {
        let tiles = TileList::new();
        let layout = layout(tiles.as_slice(), grid)?;
        let hit_map = HitMap::build(&layout, metrics);
        Ok(StartScreen {
            grid,
            metrics,
            tiles,
            layout,
            hit_map,
            drag: DragSession::default(),
            last_reload: None,
        })
    }

    pub fn tiles(&self) -> &TileList {
        &self.tiles
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn last_reload(&self) -> Option<DateTime<Utc>> {
        self.last_reload
    }

    pub fn tile(&self, id: TileId) -> Result<&TileRecord, TileError> {
        self.tiles.get(id).ok_or(TileError::UnknownTile(id))
    }

    pub fn snapshot(&self) -> ScreenSnapshot {
        ScreenSnapshot {
            tiles: self.tiles.clone(),
            layout: self.layout.clone(),
            dragging: self.drag.active(),
            last_reload: self.last_reload,
        }
    }

    /// Installs `tiles` and re-packs. On failure the previous state is kept.
    fn commit(&mut self, tiles: TileList) -> Result<(), TileError> {
        let layout = layout(tiles.as_slice(), self.grid)?;
        self.hit_map = HitMap::build(&layout, self.metrics);
        self.layout = layout;
        self.tiles = tiles;
        Ok(())
    }

    /// Reconciles against a fresh pinned-directory scan.
    pub fn apply_scan(
        &mut self,
        discovered: &[DiscoveredShortcut],
    ) -> Result<ReconcileSummary, TileError> {
        let paths: Vec<_> = discovered.iter().map(|d| d.path.clone()).collect();
        let (tiles, summary) = reconcile_with(&self.tiles, &paths, |path| {
            discovered
                .iter()
                .find(|d| d.path == path)
                .map(DiscoveredShortcut::to_record)
                .unwrap_or_else(|| TileRecord::from_source_path(path))
        });
        self.commit(tiles)?;

        if let Some(dragged) = self.drag.active() {
            if !self.tiles.contains(dragged) {
                self.drag.cancel();
            }
        }
        self.last_reload = Some(Utc::now());
        Ok(summary)
    }

    pub fn move_tile(&mut self, source: TileId, target: TileId) -> Result<(), TileError> {
        let moved = move_tile(&self.tiles, source, target)?;
        self.commit(moved)
    }

    pub fn resize_tile(&mut self, id: TileId, size: SizeClass) -> Result<(), TileError> {
        let mut resized = self.tiles.clone();
        resize_tile(&mut resized, id, size)?;
        self.commit(resized)?;
        info!(tile = %id, size = size.as_str(), pages = self.layout.page_count(), "Resized tile");
        Ok(())
    }

    pub fn begin_drag(&mut self, id: TileId) -> Result<(), TileError> {
        self.drag.begin(&self.tiles, id)
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    pub fn complete_drag(
        &mut self,
        id: TileId,
        drop_target: Option<TileId>,
    ) -> Result<DropOutcome, TileError> {
        let (tiles, outcome) = self.drag.complete(&self.tiles, id, drop_target)?;
        if matches!(outcome, DropOutcome::Moved { .. }) {
            self.commit(tiles)?;
        }
        Ok(outcome)
    }

    /// Completes a drag by dropping at a point; the tile under it is the target.
    pub fn complete_drag_at(&mut self, id: TileId, point: Point) -> Result<DropOutcome, TileError> {
        let target = self.hit_test(point);
        self.complete_drag(id, target)
    }

    pub fn hit_test(&self, point: Point) -> Option<TileId> {
        self.hit_map.hit(point)
    }
}
