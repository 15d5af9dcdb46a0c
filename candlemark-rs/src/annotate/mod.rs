//! Annotation module
//!
//! Point markers, structure lines, FVG regions, the per-dataset store, and
//! the interactive labeling state machine.

pub mod labeler;
pub mod store;
pub mod types;

pub use labeler::*;
pub use store::*;
pub use types::*;
