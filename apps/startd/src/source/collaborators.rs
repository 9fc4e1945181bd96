#![allow(dead_code)]

//! Platform collaborators: shortcut resolution, icon extraction and launching.
//!
//! The engine only sees these traits. `AppState` carries each as an
//! `Arc<dyn ...>` so a platform-specific backend can be swapped in at startup
//! without touching the screen or the handlers.

use std::io;
use std::path::{Path, PathBuf};

use crate::models::ImageRef;

// ────────────────────────────────────────────────────────────────────────────
// Traits
// ────────────────────────────────────────────────────────────────────────────

/// Maps a shortcut file to its launch target. `None` excludes the shortcut
/// from the tile list and the catalog.
pub trait ShortcutResolver: Send + Sync {
    fn resolve(&self, shortcut: &Path) -> Option<PathBuf>;
}

/// Supplies a tile's icon. `None` is fine; the tile renders without one.
pub trait IconProvider: Send + Sync {
    fn extract_icon(&self, target: &Path) -> Option<ImageRef>;
}

/// Starts the program behind a target. Errors are reported, never fatal.
pub trait Launcher: Send + Sync {
    fn launch(&self, target: &Path) -> io::Result<()>;
}

// ────────────────────────────────────────────────────────────────────────────
// Default backends
// ────────────────────────────────────────────────────────────────────────────

/// Treats an existing shortcut file as its own target. The OS shell follows
/// the link when the file is opened, so no link parsing happens here.
pub struct ExistingFileResolver;

impl ShortcutResolver for ExistingFileResolver {
    fn resolve(&self, shortcut: &Path) -> Option<PathBuf> {
        shortcut.is_file().then(|| shortcut.to_path_buf())
    }
}

/// Hands out a `file://` reference to the target; the presentation layer
/// extracts the actual pixels.
pub struct TargetUriIcons;

impl IconProvider for TargetUriIcons {
    fn extract_icon(&self, target: &Path) -> Option<ImageRef> {
        let absolute = target.canonicalize().ok()?;
        Some(ImageRef(format!("file://{}", absolute.display())))
    }
}

pub struct NoIcons;

impl IconProvider for NoIcons {
    fn extract_icon(&self, _target: &Path) -> Option<ImageRef> {
        None
    }
}

/// Opens the target with the desktop's default handler, detached from this process.
pub struct ShellLauncher;

impl Launcher for ShellLauncher {
    fn launch(&self, target: &Path) -> io::Result<()> {
        open::that_detached(target)
    }
}
