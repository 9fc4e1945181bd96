//! Program catalog: every resolvable shortcut under the start-menu tree,
//! grouped by the folder it lives in.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::TileError;
use crate::models::tile::display_name_for;
use crate::source::collaborators::ShortcutResolver;
use crate::source::scan::scan_tree;

/// Category for shortcuts sitting directly in the start-menu root.
pub const ROOT_CATEGORY: &str = "Other Programs";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramEntry {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramCategory {
    pub name: String,
    pub items: Vec<ProgramEntry>,
}

/// Builds the catalog. The root category is always first, even when empty;
/// folders follow in order of first appearance in the sorted scan.
pub fn build_catalog(
    root: &Path,
    extension: &str,
    resolver: &dyn ShortcutResolver,
) -> Result<Vec<ProgramCategory>, TileError> {
    let mut categories = vec![ProgramCategory {
        name: ROOT_CATEGORY.to_string(),
        items: Vec::new(),
    }];
    let mut index: HashMap<String, usize> = HashMap::new();

    for path in scan_tree(root, extension)? {
        if resolver.resolve(&path).is_none() {
            continue;
        }

        let slot = match category_name(root, &path) {
            None => 0,
            Some(name) => *index.entry(name.clone()).or_insert_with(|| {
                categories.push(ProgramCategory {
                    name,
                    items: Vec::new(),
                });
                categories.len() - 1
            }),
        };

        categories[slot].items.push(ProgramEntry {
            name: display_name_for(&path),
            path,
        });
    }

    info!(
        root = %root.display(),
        categories = categories.len(),
        programs = categories.iter().map(|c| c.items.len()).sum::<usize>(),
        "Built program catalog"
    );
    Ok(categories)
}

/// Folder of `path` relative to `root`, with `/` separators. `None` for the root.
fn category_name(root: &Path, path: &Path) -> Option<String> {
    let parent = path.strip_prefix(root).ok()?.parent()?;
    if parent.as_os_str().is_empty() {
        return None;
    }
    let parts: Vec<String> = parent
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}
