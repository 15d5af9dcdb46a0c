//! Chart sync module
//!
//! A one-way, declarative projection from (candles, annotations, theme) to
//! drawing calls on a [`ChartSurface`].

pub mod frame;
pub mod sync;
pub mod theme;

pub use frame::*;
pub use sync::*;
pub use theme::*;
