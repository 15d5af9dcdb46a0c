//! Annotation value types and the fixed style table
//!
//! The colors, shapes, and placements here are the wire contract shared with
//! the chart frontend and the auto-label collaborator. Changing them breaks
//! previously saved annotations, so they live in one place as constants.

use serde::{Deserialize, Serialize};

/// Marker placement relative to its candle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkerPosition {
    AboveBar,
    BelowBar,
    InBar,
}

/// Marker glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkerShape {
    Circle,
    Square,
    ArrowUp,
    ArrowDown,
}

/// Price line rendering style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineStyle {
    Solid,
    Dashed,
}

/// Trade-signal marker kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalKind {
    Buy,
    Sell,
    Hold,
}

impl SignalKind {
    pub fn label(&self) -> &'static str {
        match self {
            SignalKind::Buy => "BUY",
            SignalKind::Sell => "SELL",
            SignalKind::Hold => "HOLD",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            SignalKind::Buy => "#22c55e",
            SignalKind::Sell => "#ef4444",
            SignalKind::Hold => "#6b7280",
        }
    }

    pub fn position(&self) -> MarkerPosition {
        match self {
            SignalKind::Buy | SignalKind::Hold => MarkerPosition::BelowBar,
            SignalKind::Sell => MarkerPosition::AboveBar,
        }
    }

    pub fn shape(&self) -> MarkerShape {
        match self {
            SignalKind::Buy => MarkerShape::ArrowUp,
            SignalKind::Sell => MarkerShape::ArrowDown,
            SignalKind::Hold => MarkerShape::Circle,
        }
    }
}

/// Structure line kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StructureKind {
    Bos,
    Choch,
}

impl StructureKind {
    pub fn label(&self) -> &'static str {
        match self {
            StructureKind::Bos => "BOS",
            StructureKind::Choch => "CHOCH",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            StructureKind::Bos => "#3b82f6",
            StructureKind::Choch => "#f97316",
        }
    }
}

/// Region kinds. FVG is the only one today; the field exists so stored
/// regions say what they are on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RegionKind {
    Fvg,
}

impl RegionKind {
    pub fn label(&self) -> &'static str {
        match self {
            RegionKind::Fvg => "FVG",
        }
    }
}

/// Fill color of a completed FVG region
pub const FVG_COLOR: &str = "rgba(139,92,246,0.2)";

/// Color of the temporary boundary line shown between the two FVG clicks
pub const FVG_PENDING_COLOR: &str = "#8b5cf6";

/// A point marker pinned to one candle. At most one per (dataset, time);
/// inserting a second replaces the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointAnnotation {
    pub id: String,
    pub time: i64,
    pub position: MarkerPosition,
    pub color: String,
    pub shape: MarkerShape,
    pub text: String,
}

impl PointAnnotation {
    /// Build a signal marker for a chart click, per the fixed style table.
    pub fn from_click(kind: SignalKind, time: i64) -> Self {
        Self {
            id: format!("point-{}", time),
            time,
            position: kind.position(),
            color: kind.color().to_string(),
            shape: kind.shape(),
            text: kind.label().to_string(),
        }
    }
}

/// A horizontal structure line (BOS or CHOCH) at the clicked price.
/// Multiple lines may coexist at arbitrary prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureAnnotation {
    pub price: f64,
    pub color: String,
    pub line_width: u32,
    pub line_style: LineStyle,
    pub title: String,
    pub annotation_type: StructureKind,
    /// Candle time at which the user clicked
    pub time: i64,
}

impl StructureAnnotation {
    /// Build a dashed structure line for a chart click.
    pub fn from_click(kind: StructureKind, time: i64, price: f64) -> Self {
        Self {
            price,
            color: kind.color().to_string(),
            line_width: 2,
            line_style: LineStyle::Dashed,
            title: kind.label().to_string(),
            annotation_type: kind,
            time,
        }
    }
}

/// A fair value gap region between two clicked prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionAnnotation {
    pub price_top: f64,
    pub price_bottom: f64,
    pub color: String,
    pub title: String,
    pub annotation_type: RegionKind,
    /// Time of the first of the two defining clicks
    pub time: i64,
}

impl RegionAnnotation {
    /// Build a region from the two capture clicks. Order-invariant in price:
    /// the higher click becomes the top regardless of click order.
    pub fn from_clicks(first_price: f64, first_time: i64, second_price: f64) -> Self {
        Self {
            price_top: first_price.max(second_price),
            price_bottom: first_price.min(second_price),
            color: FVG_COLOR.to_string(),
            title: RegionKind::Fvg.label().to_string(),
            annotation_type: RegionKind::Fvg,
            time: first_time,
        }
    }
}

/// Everything annotated on one dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationSet {
    pub points: Vec<PointAnnotation>,
    pub lines: Vec<StructureAnnotation>,
    pub regions: Vec<RegionAnnotation>,
}

impl AnnotationSet {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.lines.is_empty() && self.regions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len() + self.lines.len() + self.regions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buy_marker_style() {
        let point = PointAnnotation::from_click(SignalKind::Buy, 1_700_000_000);

        assert_eq!(point.position, MarkerPosition::BelowBar);
        assert_eq!(point.color, "#22c55e");
        assert_eq!(point.shape, MarkerShape::ArrowUp);
        assert_eq!(point.text, "BUY");
        assert_eq!(point.id, "point-1700000000");
    }

    #[test]
    fn test_sell_and_hold_marker_styles() {
        let sell = PointAnnotation::from_click(SignalKind::Sell, 1);
        assert_eq!(sell.position, MarkerPosition::AboveBar);
        assert_eq!(sell.color, "#ef4444");
        assert_eq!(sell.shape, MarkerShape::ArrowDown);

        let hold = PointAnnotation::from_click(SignalKind::Hold, 1);
        assert_eq!(hold.position, MarkerPosition::BelowBar);
        assert_eq!(hold.color, "#6b7280");
        assert_eq!(hold.shape, MarkerShape::Circle);
    }

    #[test]
    fn test_structure_line_styles() {
        let bos = StructureAnnotation::from_click(StructureKind::Bos, 10, 1.5);
        assert_eq!(bos.color, "#3b82f6");
        assert_eq!(bos.line_style, LineStyle::Dashed);
        assert_eq!(bos.title, "BOS");
        assert_eq!(bos.price, 1.5);

        let choch = StructureAnnotation::from_click(StructureKind::Choch, 10, 1.5);
        assert_eq!(choch.color, "#f97316");
        assert_eq!(choch.title, "CHOCH");
    }

    #[test]
    fn test_region_price_order_invariance() {
        let a = RegionAnnotation::from_clicks(5.0, 100, 3.0);
        let b = RegionAnnotation::from_clicks(3.0, 100, 5.0);

        assert_eq!(a.price_top, 5.0);
        assert_eq!(a.price_bottom, 3.0);
        assert_eq!(a, b);
        assert_eq!(a.color, FVG_COLOR);
    }

    #[test]
    fn test_region_wire_shape_carries_its_kind() {
        let region = RegionAnnotation::from_clicks(5.0, 100, 3.0);
        let json = serde_json::to_value(&region).unwrap();

        assert_eq!(json["annotationType"], "FVG");
        assert_eq!(json["priceTop"], 5.0);
        assert_eq!(json["priceBottom"], 3.0);
    }

    #[test]
    fn test_wire_shape_matches_collaborator_contract() {
        let point = PointAnnotation::from_click(SignalKind::Buy, 7);
        let json = serde_json::to_value(&point).unwrap();

        assert_eq!(json["position"], "belowBar");
        assert_eq!(json["shape"], "arrowUp");

        let parsed: PointAnnotation = serde_json::from_str(
            r##"{"id":"point-7","time":7,"position":"aboveBar","color":"#3b82f6","shape":"circle","text":"BOS"}"##,
        )
        .unwrap();
        assert_eq!(parsed.position, MarkerPosition::AboveBar);
        assert_eq!(parsed.shape, MarkerShape::Circle);
    }
}
