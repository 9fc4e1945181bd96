// Tile layout engine: packing, reordering and hit-testing.
// Everything here is pure and synchronous; the screen module sequences calls.

pub mod handlers;
pub mod packer;
pub mod reorder;

// Re-export the public API consumed by the screen and the handlers.
pub use hit_test::{CellMetrics, HitMap, Point};
pub use packer::{layout, GridSpec, Layout};
pub use reorder::{move_tile, resize_tile, DragSession, DropOutcome};
