// Source sync: directory scans, reconciliation, catalog and pinning.
// Scans block on the filesystem; handlers run them via spawn_blocking.

pub mod catalog;
pub mod collaborators;
pub mod handlers;
pub mod pins;
pub mod reconcile;
pub mod scan;
