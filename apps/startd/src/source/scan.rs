use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::errors::TileError;
use crate::models::{ImageRef, TileRecord};
use crate::source::collaborators::{IconProvider, ShortcutResolver};

/// A pinned shortcut that resolved to a launch target.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveredShortcut {
    pub path: PathBuf,
    pub target: PathBuf,
    pub image_ref: Option<ImageRef>,
}

impl DiscoveredShortcut {
    pub fn to_record(&self) -> TileRecord {
        TileRecord::from_source_path(&self.path).with_image(self.image_ref.clone())
    }
}

/// Case-insensitive extension check. `extension` carries no leading dot.
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

fn unavailable(path: &Path, source: std::io::Error) -> TileError {
    TileError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    }
}

/// Lists shortcut files directly inside `dir`, sorted by path.
pub fn scan_flat(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, TileError> {
    let entries = fs::read_dir(dir).map_err(|e| unavailable(dir, e))?;

    let mut found = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| unavailable(dir, e))?;
        let path = entry.path();
        if path.is_file() && has_extension(&path, extension) {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}

/// Lists shortcut files anywhere under `root`, sorted by path. Unreadable
/// subdirectories are skipped; an unreadable root is an error.
pub fn scan_tree(root: &Path, extension: &str) -> Result<Vec<PathBuf>, TileError> {
    fs::read_dir(root).map_err(|e| unavailable(root, e))?;

    let mut found: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!(error = %e, "Skipping unreadable catalog entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && has_extension(entry.path(), extension))
        .map(|entry| entry.into_path())
        .collect();
    found.sort();
    Ok(found)
}

/// Scans the pinned directory and keeps the shortcuts whose target resolves,
/// attaching an icon where the provider has one.
pub fn discover_pinned(
    dir: &Path,
    extension: &str,
    resolver: &dyn ShortcutResolver,
    icons: &dyn IconProvider,
) -> Result<Vec<DiscoveredShortcut>, TileError> {
    let shortcuts = scan_flat(dir, extension)?;
    let total = shortcuts.len();

    let discovered: Vec<DiscoveredShortcut> = shortcuts
        .into_iter()
        .filter_map(|path| {
            let Some(target) = resolver.resolve(&path) else {
                debug!(path = %path.display(), "Shortcut target does not resolve, skipping");
                return None;
            };
            let image_ref = icons.extract_icon(&target);
            Some(DiscoveredShortcut {
                path,
                target,
                image_ref,
            })
        })
        .collect();

    debug!(
        dir = %dir.display(),
        total,
        resolved = discovered.len(),
        "Scanned pinned directory"
    );
    Ok(discovered)
}
