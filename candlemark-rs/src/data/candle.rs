//! OHLC candle data structures

use serde::{Deserialize, Serialize};

/// One time interval's open/high/low/close price summary.
///
/// `time` is the candle's UNIX timestamp in seconds and acts as the key the
/// annotation layer joins against. `raw` keeps the original source line and
/// `index` the pre-filtering row position, so hover feedback can show the
/// user exactly what was uploaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candle {
    /// UNIX timestamp in seconds
    pub time: i64,
    /// Opening price
    pub open: f64,
    /// High price
    pub high: f64,
    /// Low price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Original source row text
    #[serde(default)]
    pub raw: String,
    /// Row position in the uploaded file, before invalid rows were dropped
    #[serde(default)]
    pub index: usize,
}

impl Candle {
    /// Create a new candle
    pub fn new(time: i64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            raw: String::new(),
            index: 0,
        }
    }

    /// Check if candle is bullish
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Check if candle is bearish
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// Get body size (absolute difference between open and close)
    pub fn body_size(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// Get median price (HL/2)
    pub fn median_price(&self) -> f64 {
        (self.high + self.low) / 2.0
    }

    /// Get total range (high - low)
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Check that all four prices are finite numbers
    pub fn is_finite(&self) -> bool {
        self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
    }
}
