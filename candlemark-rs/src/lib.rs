//! CandleMark-RS: the core engine of the CandleMark labeling workbench
//!
//! This crate turns raw broker CSV exports into strict time-ordered candle
//! series and layers an interactive labeling protocol on top of them:
//!
//! - **Data Management**: CSV ingestion, fuzzy column matching, per-dataset
//!   candle caching
//! - **Annotations**: point markers, BOS/CHOCH structure lines, two-click
//!   FVG regions, keyed by dataset
//! - **Labeling State Machine**: armed modes and multi-click protocols as a
//!   pure reducer
//! - **Chart Sync**: a declarative full-resync projection onto any drawing
//!   surface
//! - **Export**: the fixed-column training hand-off CSV
//!
//! # Example
//!
//! ```
//! use candlemark_rs::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut bench = Workbench::new();
//!     bench.load_csv("demo", "Date,Open,High,Low,Close\n2023.01.01,1,2,0,1")?;
//!     bench.activate("demo");
//!     bench.select_mode(LabelMode::Buy);
//!     Ok(())
//! }
//! ```

pub mod annotate;
pub mod chart;
pub mod data;
pub mod export;
pub mod workbench;

// Re-export commonly used types
pub mod prelude {
    pub use crate::annotate::*;
    pub use crate::chart::*;
    pub use crate::data::*;
    pub use crate::export::*;
    pub use crate::workbench::*;

    pub use anyhow::{Context, Result};
}

/// Result type alias
pub type Result<T> = anyhow::Result<T>;
