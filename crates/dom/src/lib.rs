//! In-memory host for the vdom engine.
//!
//! `DomTree` owns every live node and records each mutation issued through
//! `DomApi` as a `DomOp`, so callers can assert on exactly what a patch did.

pub mod op;
pub mod snapshot;
pub mod tree;

pub use op::{DomOp, OpCounts};
pub use snapshot::{DomSnapshot, DomSnapshotOptions};
pub use tree::DomTree;
