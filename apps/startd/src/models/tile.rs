use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::errors::TileError;

// ────────────────────────────────────────────────────────────────────────────
// Identity and artwork handles
// ────────────────────────────────────────────────────────────────────────────

/// Stable tile identity. Derived from the source path, so it survives reorders,
/// resizes and reloads as long as the shortcut file stays where it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(Uuid);

impl TileId {
    pub fn for_path(path: &Path) -> Self {
        TileId(Uuid::new_v5(
            &Uuid::NAMESPACE_URL,
            path.to_string_lossy().as_bytes(),
        ))
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TileId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(TileId)
    }
}

/// Opaque handle to rendered artwork. Owned by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(pub String);

// ────────────────────────────────────────────────────────────────────────────
// Size classes
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeClass {
    /// 1 column x 1 row.
    #[default]
    Small,
    /// 2 columns x 1 row.
    Wide,
    /// 2 columns x 2 rows.
    Large,
}

impl SizeClass {
    /// Footprint as `(column_span, row_span)`.
    pub fn span(self) -> (usize, usize) {
        match self {
            SizeClass::Small => (1, 1),
            SizeClass::Wide => (2, 1),
            SizeClass::Large => (2, 2),
        }
    }

    pub fn cells(self) -> usize {
        let (cols, rows) = self.span();
        cols * rows
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SizeClass::Small => "small",
            SizeClass::Wide => "wide",
            SizeClass::Large => "large",
        }
    }
}

impl FromStr for SizeClass {
    type Err = TileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" => Ok(SizeClass::Small),
            "wide" => Ok(SizeClass::Wide),
            "large" => Ok(SizeClass::Large),
            _ => Err(TileError::InvalidSizeClass(s.to_string())),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// TileRecord
// ────────────────────────────────────────────────────────────────────────────

/// One placeable item on the start screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileRecord {
    pub id: TileId,
    pub display_name: String,
    pub size_class: SizeClass,
    pub image_ref: Option<ImageRef>,
    pub background_ref: Option<ImageRef>,
    /// Shortcut file path. Unique key when matching records across reloads.
    pub source_path: PathBuf,
}

impl TileRecord {
    /// Builds a Small tile for a freshly discovered shortcut.
    pub fn from_source_path(path: &Path) -> Self {
        TileRecord {
            id: TileId::for_path(path),
            display_name: display_name_for(path),
            size_class: SizeClass::default(),
            image_ref: None,
            background_ref: None,
            source_path: path.to_path_buf(),
        }
    }

    pub fn with_image(mut self, image_ref: Option<ImageRef>) -> Self {
        self.image_ref = image_ref;
        self
    }
}

/// File name without its extension, falling back to the whole path.
pub fn display_name_for(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

// ────────────────────────────────────────────────────────────────────────────
// TileList
// ────────────────────────────────────────────────────────────────────────────

/// Ordered tile sequence. Order is layout priority and the only arrangement
/// signal; no coordinates are stored. Ids are unique.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TileList {
    records: Vec<TileRecord>,
}

impl TileList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects records in order. A record whose id was already seen is dropped.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = TileRecord>,
    {
        let mut seen = HashSet::new();
        let records = records
            .into_iter()
            .filter(|r| {
                let fresh = seen.insert(r.id);
                if !fresh {
                    debug!(tile = %r.id, path = %r.source_path.display(), "Dropping duplicate tile");
                }
                fresh
            })
            .collect();
        TileList { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TileRecord> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[TileRecord] {
        &self.records
    }

    pub fn ids(&self) -> Vec<TileId> {
        self.records.iter().map(|r| r.id).collect()
    }

    pub fn position(&self, id: TileId) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }

    pub fn contains(&self, id: TileId) -> bool {
        self.position(id).is_some()
    }

    pub fn get(&self, id: TileId) -> Option<&TileRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn get_mut(&mut self, id: TileId) -> Option<&mut TileRecord> {
        self.records.iter_mut().find(|r| r.id == id)
    }

    pub(crate) fn remove_at(&mut self, index: usize) -> TileRecord {
        self.records.remove(index)
    }

    pub(crate) fn insert_at(&mut self, index: usize, record: TileRecord) {
        self.records.insert(index, record);
    }
}

impl<'a> IntoIterator for &'a TileList {
    type Item = &'a TileRecord;
    type IntoIter = std::slice::Iter<'a, TileRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
