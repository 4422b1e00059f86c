//! Pure series arithmetic: change metrics and comparison normalization.
//!
//! Nothing in this module performs I/O; it consumes cached series and
//! produces request-scoped values for the front-end.

pub mod change;
pub mod rebase;

pub use change::{compute_changes, moving_average};
pub use rebase::build_comparison;
