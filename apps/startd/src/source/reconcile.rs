//! Source reconciliation: syncs the in-memory tile list with a directory scan.
//!
//! Known tiles keep their position and size; vanished ones are dropped; new
//! ones are appended in discovery order as Small tiles.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::models::{TileList, TileRecord};

/// Counts reported after a reconcile pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileSummary {
    pub kept: usize,
    pub added: usize,
    pub removed: usize,
}

/// Reconciles `existing` against `discovered`, creating plain Small records for
/// new paths.
pub fn reconcile(existing: &TileList, discovered: &[PathBuf]) -> TileList {
    reconcile_with(existing, discovered, TileRecord::from_source_path).0
}

/// Like [`reconcile`], but new records come from `new_record` so callers can
/// attach artwork. Duplicate discovered paths count once.
pub fn reconcile_with<F>(
    existing: &TileList,
    discovered: &[PathBuf],
    mut new_record: F,
) -> (TileList, ReconcileSummary)
where
    F: FnMut(&Path) -> TileRecord,
{
    let present: HashSet<&Path> = discovered.iter().map(PathBuf::as_path).collect();

    let kept: Vec<TileRecord> = existing
        .iter()
        .filter(|r| present.contains(r.source_path.as_path()))
        .cloned()
        .collect();

    let mut known: HashSet<&Path> = existing.iter().map(|r| r.source_path.as_path()).collect();
    let added: Vec<TileRecord> = discovered
        .iter()
        .filter(|p| known.insert(p.as_path()))
        .map(|p| new_record(p.as_path()))
        .collect();

    let summary = ReconcileSummary {
        kept: kept.len(),
        added: added.len(),
        removed: existing.len() - kept.len(),
    };
    if summary.added > 0 || summary.removed > 0 {
        info!(
            kept = summary.kept,
            added = summary.added,
            removed = summary.removed,
            "Reconciled tiles with source directory"
        );
    }

    (TileList::from_records(kept.into_iter().chain(added)), summary)
}
