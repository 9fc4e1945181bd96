//! Pin / unpin: the pinned directory is the only durable record of which
//! tiles exist. Pinning copies a shortcut in; unpinning deletes the copy.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

fn pinned_location(pinned_dir: &Path, shortcut: &Path) -> io::Result<PathBuf> {
    let file_name = shortcut.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("'{}' has no file name", shortcut.display()),
        )
    })?;
    Ok(pinned_dir.join(file_name))
}

/// Copies `shortcut` into `pinned_dir`, replacing a pin with the same name.
/// Returns the pinned copy's path.
pub fn pin(pinned_dir: &Path, shortcut: &Path) -> io::Result<PathBuf> {
    let destination = pinned_location(pinned_dir, shortcut)?;
    if destination != shortcut {
        fs::copy(shortcut, &destination)?;
    }
    info!(shortcut = %shortcut.display(), pinned = %destination.display(), "Pinned shortcut");
    Ok(destination)
}

/// Removes the pin named after `shortcut`. Returns whether a file was deleted.
pub fn unpin(pinned_dir: &Path, shortcut: &Path) -> io::Result<bool> {
    let pinned = pinned_location(pinned_dir, shortcut)?;
    if !pinned.exists() {
        return Ok(false);
    }
    fs::remove_file(&pinned)?;
    info!(pinned = %pinned.display(), "Unpinned shortcut");
    Ok(true)
}
