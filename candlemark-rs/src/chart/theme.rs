//! Chart color themes

use serde::{Deserialize, Serialize};

/// Which theme is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeKind {
    #[default]
    Dark,
    Light,
}

impl ThemeKind {
    pub fn palette(&self) -> ChartTheme {
        match self {
            ThemeKind::Dark => ChartTheme::dark(),
            ThemeKind::Light => ChartTheme::light(),
        }
    }
}

/// Colors handed to the drawing surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartTheme {
    pub background: String,
    pub text: String,
    pub grid: String,
    pub up: String,
    pub down: String,
}

impl ChartTheme {
    pub fn dark() -> Self {
        Self {
            background: "#10141b".to_string(),
            text: "#e5e7eb".to_string(),
            grid: "#1f2937".to_string(),
            up: "#22c55e".to_string(),
            down: "#ef4444".to_string(),
        }
    }

    pub fn light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#111827".to_string(),
            grid: "#e5e7eb".to_string(),
            up: "#22c55e".to_string(),
            down: "#ef4444".to_string(),
        }
    }
}
