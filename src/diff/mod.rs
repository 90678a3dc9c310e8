//! diff
//!
//! Dependency delta computation between two manifest snapshots, plus
//! best-effort markdown link decoration for the resulting entries.

pub mod delta;
pub mod links;

pub use delta::{diff_manifests, render_deltas, DeltaKind, DependencyDelta};
pub use links::LinkResolver;
