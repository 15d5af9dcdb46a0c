//! Data management module
//!
//! Handles CSV ingestion, OHLC candle parsing, and per-dataset caching.

pub mod candle;
pub mod parser;
pub mod storage;

pub use candle::*;
pub use parser::*;
pub use storage::*;
