//! Tile Packer: assigns every tile a page, row, column and span.
//!
//! # Algorithm
//! Single deterministic pass over the tile list in order:
//! 1. Derive `(column_span, row_span)` from the tile's size class.
//! 2. Scan rows from the top, columns from the left; the first position whose
//!    whole block is free wins (earliest row, then earliest column).
//! 3. If that position starts at or below row `max_rows`, the current page is
//!    closed and the tile goes to `(0, 0)` of a fresh page. Closed pages are
//!    never revisited. A Large tile whose first fit is the last row keeps it and
//!    hangs one row below the page.
//! 4. Claim the block.
//!
//! Cell state lives only for the duration of one `layout` call.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::TileError;
use crate::models::{SizeClass, TileId, TileRecord};

/// Page width in cells.
pub const COLUMNS: usize = 4;
/// Page height in cells; a placement starting at or below this row opens a new page.
pub const MAX_ROWS: usize = 4;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

/// Page dimensions the packer works against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpec {
    pub columns: usize,
    pub max_rows: usize,
}

impl Default for GridSpec {
    fn default() -> Self {
        GridSpec {
            columns: COLUMNS,
            max_rows: MAX_ROWS,
        }
    }
}

impl GridSpec {
    pub fn capacity(&self) -> usize {
        self.columns * self.max_rows
    }

    /// Span for `size`, rejecting footprints the page cannot hold.
    pub fn span_for(&self, size: SizeClass) -> Result<(usize, usize), TileError> {
        let (cols, rows) = size.span();
        if cols == 0 || rows == 0 || cols > self.columns || rows > self.max_rows {
            return Err(TileError::InvalidSizeClass(format!(
                "{} ({cols}x{rows}) does not fit a {}x{} page",
                size.as_str(),
                self.columns,
                self.max_rows
            )));
        }
        Ok((cols, rows))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagedPlacement {
    pub tile_id: TileId,
    pub page_index: usize,
    pub row: usize,
    pub col: usize,
    pub column_span: usize,
    pub row_span: usize,
}

impl PagedPlacement {
    /// Whether this placement claims cell `(row, col)` on `page`.
    pub fn covers(&self, page: usize, row: usize, col: usize) -> bool {
        self.page_index == page
            && (self.row..self.row + self.row_span).contains(&row)
            && (self.col..self.col + self.column_span).contains(&col)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub index: usize,
    /// Number of rows in use (height of the lowest claimed cell). Can exceed
    /// `max_rows` by one when a Large tile starts on the last row.
    pub rows_used: usize,
    pub placements: Vec<PagedPlacement>,
}

/// Result of one layout pass. Always holds at least one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub grid: GridSpec,
    pub pages: Vec<Page>,
}

impl Layout {
    /// All placements, page by page, in tile order within each page.
    pub fn placements(&self) -> impl Iterator<Item = &PagedPlacement> {
        self.pages.iter().flat_map(|p| p.placements.iter())
    }

    pub fn placement_for(&self, id: TileId) -> Option<&PagedPlacement> {
        self.placements().find(|p| p.tile_id == id)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn tile_count(&self) -> usize {
        self.pages.iter().map(|p| p.placements.len()).sum()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Occupancy grid
// ────────────────────────────────────────────────────────────────────────────

/// Free/occupied cells of the page being filled. Starts with one row and grows
/// on demand; rows below the current height count as free.
struct Occupancy {
    columns: usize,
    cells: Vec<Vec<bool>>,
}

impl Occupancy {
    fn new(columns: usize) -> Self {
        Occupancy {
            columns,
            cells: vec![vec![false; columns]],
        }
    }

    fn is_free(&self, row: usize, col: usize) -> bool {
        self.cells.get(row).map_or(true, |r| !r[col])
    }

    fn block_is_free(&self, row: usize, col: usize, cols: usize, rows: usize) -> bool {
        (row..row + rows).all(|r| (col..col + cols).all(|c| self.is_free(r, c)))
    }

    /// First free position in row-major order. Always terminates: rows past
    /// the grown height are empty.
    fn first_fit(&self, cols: usize, rows: usize) -> (usize, usize) {
        let mut row = 0;
        loop {
            if let Some(col) =
                (0..=self.columns - cols).find(|&c| self.block_is_free(row, c, cols, rows))
            {
                return (row, col);
            }
            row += 1;
        }
    }

    fn claim(&mut self, row: usize, col: usize, cols: usize, rows: usize) {
        while self.cells.len() < row + rows {
            self.cells.push(vec![false; self.columns]);
        }
        for r in row..row + rows {
            for c in col..col + cols {
                self.cells[r][c] = true;
            }
        }
    }

    fn height(&self) -> usize {
        self.cells
            .iter()
            .rposition(|r| r.iter().any(|&taken| taken))
            .map_or(0, |last| last + 1)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Entry point
// ────────────────────────────────────────────────────────────────────────────

/// Packs `tiles` into pages. Pure: the same order always yields the same layout.
///
/// Fails with `InvalidSizeClass` if any tile's span cannot fit `grid`.
/// An empty list yields one empty page.
pub fn layout(tiles: &[TileRecord], grid: GridSpec) -> Result<Layout, TileError> {
    if grid.columns == 0 || grid.max_rows == 0 {
        return Err(TileError::InvalidSizeClass(format!(
            "grid {}x{} has no cells",
            grid.columns, grid.max_rows
        )));
    }

    let mut pages = Vec::new();
    let mut placements: Vec<PagedPlacement> = Vec::new();
    let mut occupancy = Occupancy::new(grid.columns);

    for tile in tiles {
        let (cols, rows) = grid.span_for(tile.size_class)?;

        let (mut row, mut col) = occupancy.first_fit(cols, rows);
        if row >= grid.max_rows {
            debug!(
                tile = %tile.id,
                page = pages.len(),
                row,
                "Tile overflows page, opening a new one"
            );
            pages.push(close_page(pages.len(), &occupancy, placements));
            placements = Vec::new();
            occupancy = Occupancy::new(grid.columns);
            row = 0;
            col = 0;
        }

        occupancy.claim(row, col, cols, rows);
        placements.push(PagedPlacement {
            tile_id: tile.id,
            page_index: pages.len(),
            row,
            col,
            column_span: cols,
            row_span: rows,
        });
    }

    pages.push(close_page(pages.len(), &occupancy, placements));

    Ok(Layout { grid, pages })
}

fn close_page(index: usize, occupancy: &Occupancy, placements: Vec<PagedPlacement>) -> Page {
    Page {
        index,
        rows_used: occupancy.height(),
        placements,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::path::PathBuf;

    fn tile(name: &str, size: SizeClass) -> TileRecord {
        let mut record = TileRecord::from_source_path(&PathBuf::from(format!("{name}.lnk")));
        record.size_class = size;
        record
    }

    fn smalls(n: usize) -> Vec<TileRecord> {
        (0..n)
            .map(|i| tile(&format!("t{i}"), SizeClass::Small))
            .collect()
    }

    fn pos(p: &PagedPlacement) -> (usize, usize, usize, usize, usize) {
        (p.page_index, p.row, p.col, p.column_span, p.row_span)
    }

    fn assert_no_overlap(layout: &Layout) {
        let mut claimed = HashSet::new();
        for p in layout.placements() {
            for r in p.row..p.row + p.row_span {
                for c in p.col..p.col + p.column_span {
                    assert!(
                        claimed.insert((p.page_index, r, c)),
                        "cell ({}, {r}, {c}) claimed twice",
                        p.page_index
                    );
                    assert!(c < layout.grid.columns, "col {c} past page width");
                }
            }
            assert!(p.row < layout.grid.max_rows, "placement starts past page height");
        }
    }

    // ── basic placement ─────────────────────────────────────────────────────

    #[test]
    fn test_empty_list_yields_one_empty_page() {
        let layout = layout(&[], GridSpec::default()).unwrap();
        assert_eq!(layout.page_count(), 1);
        assert_eq!(layout.tile_count(), 0);
        assert_eq!(layout.pages[0].rows_used, 0);
    }

    #[test]
    fn test_mixed_sizes_reference_layout() {
        let tiles = vec![
            tile("A", SizeClass::Wide),
            tile("B", SizeClass::Small),
            tile("C", SizeClass::Small),
            tile("D", SizeClass::Large),
        ];
        let layout = layout(&tiles, GridSpec::default()).unwrap();

        let got: Vec<_> = layout.placements().map(pos).collect();
        assert_eq!(
            got,
            vec![
                (0, 0, 0, 2, 1),
                (0, 0, 2, 1, 1),
                (0, 0, 3, 1, 1),
                (0, 1, 0, 2, 2),
            ]
        );
        assert_eq!(layout.pages[0].rows_used, 3);
    }

    #[test]
    fn test_first_listed_small_tile_takes_column_zero() {
        let tiles = smalls(2);
        let layout = layout(&tiles, GridSpec::default()).unwrap();
        assert_eq!(layout.placement_for(tiles[0].id).unwrap().col, 0);
        assert_eq!(layout.placement_for(tiles[1].id).unwrap().col, 1);
    }

    #[test]
    fn test_small_tile_backfills_gap_left_by_large() {
        // Large at (0,0), Large at (0,2), Wide must drop to row 2, Small backfills row 2 col 2.
        let tiles = vec![
            tile("L1", SizeClass::Large),
            tile("L2", SizeClass::Large),
            tile("W", SizeClass::Wide),
            tile("S", SizeClass::Small),
        ];
        let layout = layout(&tiles, GridSpec::default()).unwrap();
        let got: Vec<_> = layout.placements().map(pos).collect();
        assert_eq!(
            got,
            vec![
                (0, 0, 0, 2, 2),
                (0, 0, 2, 2, 2),
                (0, 2, 0, 2, 1),
                (0, 2, 2, 1, 1),
            ]
        );
    }

    #[test]
    fn test_wide_skips_single_free_cell() {
        // Three smalls leave only col 3 free in row 0; a Wide cannot use it.
        let mut tiles = smalls(3);
        tiles.push(tile("W", SizeClass::Wide));
        tiles.push(tile("S", SizeClass::Small));
        let layout = layout(&tiles, GridSpec::default()).unwrap();

        assert_eq!(pos(layout.placement_for(tiles[3].id).unwrap()), (0, 1, 0, 2, 1));
        assert_eq!(pos(layout.placement_for(tiles[4].id).unwrap()), (0, 0, 3, 1, 1));
    }

    // ── capacity and overflow ───────────────────────────────────────────────

    #[test]
    fn test_full_page_fits_on_one_page_without_overlap() {
        let tiles = vec![
            tile("L", SizeClass::Large),
            tile("W1", SizeClass::Wide),
            tile("W2", SizeClass::Wide),
            tile("S1", SizeClass::Small),
            tile("S2", SizeClass::Small),
            tile("W3", SizeClass::Wide),
            tile("W4", SizeClass::Wide),
            tile("S3", SizeClass::Small),
            tile("S4", SizeClass::Small),
        ];
        let cells: usize = tiles.iter().map(|t| t.size_class.cells()).sum();
        assert_eq!(cells, GridSpec::default().capacity());

        let layout = layout(&tiles, GridSpec::default()).unwrap();
        assert_eq!(layout.page_count(), 1);
        assert_eq!(layout.tile_count(), tiles.len());
        assert_no_overlap(&layout);
    }

    #[test]
    fn test_overflow_opens_exactly_one_new_page() {
        let tiles = smalls(MAX_ROWS * COLUMNS + 1);
        let layout = layout(&tiles, GridSpec::default()).unwrap();

        assert_eq!(layout.page_count(), 2);
        assert_eq!(layout.pages[0].placements.len(), MAX_ROWS * COLUMNS);
        assert_eq!(layout.pages[1].placements.len(), 1);
        let last = layout.placement_for(tiles.last().unwrap().id).unwrap();
        assert_eq!((last.page_index, last.row, last.col), (1, 0, 0));
        assert_no_overlap(&layout);
    }

    #[test]
    fn test_large_on_last_row_stays_on_page() {
        // 12 smalls fill rows 0..3; the Large starts on row 3 and hangs into row 4.
        let mut tiles = smalls(12);
        tiles.push(tile("L", SizeClass::Large));
        let layout = layout(&tiles, GridSpec::default()).unwrap();

        let large = layout.placement_for(tiles[12].id).unwrap();
        assert_eq!(pos(large), (0, 3, 0, 2, 2));
        assert_eq!(layout.page_count(), 1);
        assert_eq!(layout.pages[0].rows_used, MAX_ROWS + 1);
        assert_no_overlap(&layout);
    }

    #[test]
    fn test_three_large_after_smalls_share_one_page() {
        let tiles = vec![
            tile("S1", SizeClass::Small),
            tile("S2", SizeClass::Small),
            tile("S3", SizeClass::Small),
            tile("L1", SizeClass::Large),
            tile("L2", SizeClass::Large),
            tile("L3", SizeClass::Large),
        ];
        let layout = layout(&tiles, GridSpec::default()).unwrap();

        assert_eq!(layout.page_count(), 1);
        assert_eq!(pos(layout.placement_for(tiles[5].id).unwrap()), (0, 3, 0, 2, 2));
        assert_no_overlap(&layout);
    }

    #[test]
    fn test_fragmented_page_spills_below_capacity() {
        // 9 smalls, then a Large at (2,1) splits row 3 into single free cells,
        // so the Wide first fits on row 4 even though only 15 cells are used.
        let mut tiles = smalls(9);
        tiles.push(tile("L", SizeClass::Large));
        tiles.push(tile("W", SizeClass::Wide));
        let layout = layout(&tiles, GridSpec::default()).unwrap();

        assert_eq!(pos(layout.placement_for(tiles[9].id).unwrap()), (0, 2, 1, 2, 2));
        assert_eq!(pos(layout.placement_for(tiles[10].id).unwrap()), (1, 0, 0, 2, 1));
        assert_no_overlap(&layout);
    }

    #[test]
    fn test_closed_pages_are_not_backfilled() {
        let mut tiles = smalls(9);
        tiles.push(tile("L", SizeClass::Large));
        tiles.push(tile("W", SizeClass::Wide));
        tiles.push(tile("S", SizeClass::Small));
        let layout = layout(&tiles, GridSpec::default()).unwrap();

        // Page 0 still has free cells at (2,3), (3,0) and (3,3); the Small
        // follows the Wide on page 1 instead.
        let small = layout.placement_for(tiles[11].id).unwrap();
        assert_eq!(pos(small), (1, 0, 2, 1, 1));
        assert_eq!(layout.pages[0].placements.len(), 10);
    }

    /// Every size-class sequence whose cells sum to at most `limit`.
    fn sequences_up_to(kinds: &[SizeClass], limit: usize) -> Vec<Vec<SizeClass>> {
        fn extend(
            kinds: &[SizeClass],
            limit: usize,
            prefix: &mut Vec<SizeClass>,
            cells: usize,
            out: &mut Vec<Vec<SizeClass>>,
        ) {
            if !prefix.is_empty() {
                out.push(prefix.clone());
            }
            for &kind in kinds {
                if cells + kind.cells() <= limit {
                    prefix.push(kind);
                    extend(kinds, limit, prefix, cells + kind.cells(), out);
                    prefix.pop();
                }
            }
        }
        let mut out = Vec::new();
        extend(kinds, limit, &mut Vec::new(), 0, &mut out);
        out
    }

    fn records(sizes: &[SizeClass]) -> Vec<TileRecord> {
        sizes
            .iter()
            .enumerate()
            .map(|(i, &size)| tile(&format!("t{i}"), size))
            .collect()
    }

    #[test]
    fn test_every_sequence_up_to_capacity_packs_without_overlap() {
        let all = [SizeClass::Small, SizeClass::Wide, SizeClass::Large];
        let capacity = GridSpec::default().capacity();
        let sequences = sequences_up_to(&all, capacity);
        assert!(sequences.len() > 10_000);

        for sizes in &sequences {
            let tiles = records(sizes);
            let layout = layout(&tiles, GridSpec::default()).unwrap();
            assert_eq!(layout.tile_count(), tiles.len(), "{sizes:?}");
            assert_no_overlap(&layout);
        }
    }

    #[test]
    fn test_small_lists_always_fit_one_page() {
        let all = [SizeClass::Small, SizeClass::Wide, SizeClass::Large];
        for sizes in sequences_up_to(&all, 14) {
            let layout = layout(&records(&sizes), GridSpec::default()).unwrap();
            assert_eq!(layout.page_count(), 1, "{sizes:?}");
        }
    }

    #[test]
    fn test_two_size_classes_fill_a_page_exactly() {
        let pairs = [
            [SizeClass::Small, SizeClass::Wide],
            [SizeClass::Small, SizeClass::Large],
            [SizeClass::Wide, SizeClass::Large],
        ];
        let capacity = GridSpec::default().capacity();
        for kinds in &pairs {
            for sizes in sequences_up_to(kinds, capacity) {
                let layout = layout(&records(&sizes), GridSpec::default()).unwrap();
                assert_eq!(layout.page_count(), 1, "{sizes:?}");
                assert_no_overlap(&layout);
            }
        }
    }

    #[test]
    fn test_many_tiles_spill_across_several_pages() {
        let tiles = smalls(MAX_ROWS * COLUMNS * 3);
        let layout = layout(&tiles, GridSpec::default()).unwrap();
        assert_eq!(layout.page_count(), 3);
        assert!(layout
            .pages
            .iter()
            .enumerate()
            .all(|(i, p)| p.index == i && p.placements.iter().all(|pl| pl.page_index == i)));
        assert_no_overlap(&layout);
    }

    // ── determinism and validation ──────────────────────────────────────────

    #[test]
    fn test_layout_is_idempotent() {
        let tiles = vec![
            tile("A", SizeClass::Large),
            tile("B", SizeClass::Small),
            tile("C", SizeClass::Wide),
            tile("D", SizeClass::Small),
            tile("E", SizeClass::Large),
            tile("F", SizeClass::Wide),
        ];
        let first = layout(&tiles, GridSpec::default()).unwrap();
        let second = layout(&tiles, GridSpec::default()).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_span_wider_than_grid_is_rejected() {
        let narrow = GridSpec {
            columns: 1,
            max_rows: 4,
        };
        let err = layout(&[tile("W", SizeClass::Wide)], narrow).unwrap_err();
        assert!(matches!(err, TileError::InvalidSizeClass(_)));

        // Small tiles still pack into a single column.
        let layout = layout(&smalls(3), narrow).unwrap();
        let rows: Vec<_> = layout.placements().map(|p| p.row).collect();
        assert_eq!(rows, vec![0, 1, 2]);
    }

    #[test]
    fn test_empty_grid_is_rejected() {
        let grid = GridSpec {
            columns: 0,
            max_rows: 4,
        };
        assert!(matches!(
            layout(&[], grid),
            Err(TileError::InvalidSizeClass(_))
        ));
    }

    #[test]
    fn test_covers_matches_claimed_cells() {
        let tiles = vec![tile("L", SizeClass::Large)];
        let layout = layout(&tiles, GridSpec::default()).unwrap();
        let p = layout.placement_for(tiles[0].id).unwrap();
        assert!(p.covers(0, 1, 1));
        assert!(!p.covers(0, 2, 0));
        assert!(!p.covers(1, 0, 0));
    }
}
