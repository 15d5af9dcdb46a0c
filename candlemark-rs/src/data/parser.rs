//! CSV ingestion and candle parsing
//!
//! Broker export tools disagree on almost everything: separators (commas vs
//! runs of whitespace), header decoration (`<CLOSE>` vs `Close`), column
//! order, date formats, and row order (some write newest-first). The parser
//! tolerates all of that and produces one strict shape: candles sorted
//! ascending by time with finite OHLC values.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use thiserror::Error;
use tracing::debug;

use crate::data::Candle;

/// Structural CSV failures. Individual bad rows are dropped silently and
/// never surface here.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Required columns could not be located in the header row
    #[error("missing required columns (need open, high, low, close and date or time); found: {}", found.join(", "))]
    MissingColumns { found: Vec<String> },
}

/// The fuzzy column vocabulary: a column is located by the first header
/// whose lowercased, bracket-stripped text contains one of its substrings.
/// Kept as a single table so the matching rule stays auditable.
const COLUMN_VOCABULARY: &[(&str, &[&str])] = &[
    ("open", &["open"]),
    ("high", &["high"]),
    ("low", &["low"]),
    ("close", &["close", "last"]),
    ("date", &["date"]),
    ("time", &["time"]),
];

/// Datetime formats tried in order when a row carries both date and time.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Date-only formats, resolved to midnight UTC.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

#[derive(Debug, Clone, Copy)]
struct ColumnIndexes {
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    date: Option<usize>,
    time: Option<usize>,
}

/// Parse raw CSV text into a time-ordered candle sequence.
///
/// Rows with unparseable timestamps or non-finite OHLC values are dropped,
/// not fixed. Duplicate timestamps are both kept; only the annotation layer
/// enforces uniqueness, and only for point markers. Fewer than two non-empty
/// lines yields an empty result, not an error.
pub fn parse_csv(content: &str) -> Result<Vec<Candle>, ParseError> {
    let mut lines = content.lines().filter(|l| !l.trim().is_empty());

    let header = match lines.next() {
        Some(h) => h,
        None => return Ok(Vec::new()),
    };
    let rows: Vec<&str> = lines.collect();
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let headers: Vec<String> = tokenize(header)
        .map(|h| h.to_lowercase().replace(['<', '>'], ""))
        .collect();
    let indexes = locate_columns(&headers)?;

    let mut candles: Vec<Candle> = rows
        .iter()
        .enumerate()
        .filter_map(|(index, row)| parse_row(row, index, &indexes))
        .collect();

    // Input order is not guaranteed; some export tools write newest-first.
    // The sort is stable, so rows sharing a timestamp keep file order.
    candles.sort_by_key(|c| c.time);

    debug!(
        rows = rows.len(),
        candles = candles.len(),
        "parsed csv upload"
    );
    Ok(candles)
}

/// Split a row on commas or runs of whitespace, dropping empty tokens.
fn tokenize(row: &str) -> impl Iterator<Item = &str> {
    row.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
}

fn locate_columns(headers: &[String]) -> Result<ColumnIndexes, ParseError> {
    let find = |vocab: &[&str]| {
        headers
            .iter()
            .position(|h| vocab.iter().any(|name| h.contains(name)))
    };

    let lookup: Vec<Option<usize>> = COLUMN_VOCABULARY
        .iter()
        .map(|(_, vocab)| find(vocab))
        .collect();
    let (open, high, low, close, date, time) = (
        lookup[0], lookup[1], lookup[2], lookup[3], lookup[4], lookup[5],
    );

    match (open, high, low, close) {
        (Some(open), Some(high), Some(low), Some(close)) if date.is_some() || time.is_some() => {
            Ok(ColumnIndexes {
                open,
                high,
                low,
                close,
                date,
                time,
            })
        }
        _ => Err(ParseError::MissingColumns {
            found: headers.to_vec(),
        }),
    }
}

fn parse_row(row: &str, index: usize, indexes: &ColumnIndexes) -> Option<Candle> {
    let values: Vec<&str> = tokenize(row).collect();

    let field = |i: usize| values.get(i).copied();
    let date_str = indexes.date.and_then(field).unwrap_or("");
    let time_str = indexes.time.and_then(field).unwrap_or("");

    // MT4/MT5 exports use dotted dates (2023.01.01); normalize before parsing.
    let datetime = format!("{} {}", date_str.replace('.', "-"), time_str)
        .trim()
        .to_string();
    let time = parse_timestamp(&datetime)?;

    let price = |i: usize| field(i)?.parse::<f64>().ok().filter(|v| v.is_finite());
    let candle = Candle {
        time,
        open: price(indexes.open)?,
        high: price(indexes.high)?,
        low: price(indexes.low)?,
        close: price(indexes.close)?,
        raw: row.to_string(),
        index,
    };
    Some(candle)
}

/// Resolve a normalized timestamp string to epoch seconds.
///
/// Tries, in order: bare epoch numbers (seconds, or milliseconds when the
/// value is implausibly large for seconds), RFC 3339, the datetime format
/// table, then date-only formats at midnight UTC. Anything else drops the
/// row.
fn parse_timestamp(s: &str) -> Option<i64> {
    if s.is_empty() {
        return None;
    }

    if s.bytes().all(|b| b.is_ascii_digit()) {
        let n: i64 = s.parse().ok()?;
        if n > 1_000_000_000_000 {
            return Some(n / 1000);
        }
        // Shorter digit runs are bar counts or stray prices, not timestamps.
        return (n >= 100_000_000).then_some(n);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc().timestamp());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.and_hms_opt(0, 0, 0)?.and_utc().timestamp());
        }
    }
    None
}
