//! The declarative chart view model
//!
//! A [`ChartFrame`] is the *entire* desired chart state, recomputed from
//! scratch on every change. The drawing surface replaces what it shows with
//! the frame's contents wholesale; nothing is diffed incrementally, so a
//! stale marker or a forgotten line handle cannot survive a redraw.

use serde::Serialize;

use crate::annotate::{
    AnnotationSet, LineStyle, MarkerPosition, MarkerShape, RegionAnnotation, FVG_PENDING_COLOR,
};
use crate::chart::ChartTheme;
use crate::data::Candle;

/// A marker pinned to a candle
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMarker {
    pub time: i64,
    pub position: MarkerPosition,
    pub color: String,
    pub shape: MarkerShape,
    pub text: String,
}

/// A horizontal price line
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPriceLine {
    pub price: f64,
    pub color: String,
    pub line_width: u32,
    pub line_style: LineStyle,
    pub title: String,
}

/// The full desired chart state
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartFrame {
    pub candles: Vec<Candle>,
    pub markers: Vec<ChartMarker>,
    pub price_lines: Vec<ChartPriceLine>,
    pub regions: Vec<RegionAnnotation>,
    pub theme: ChartTheme,
    /// Whether the view should re-fit to the data extent
    pub fit: bool,
}

/// Project candles, annotations, and the in-progress FVG first click into a
/// frame. `pending_region` is the first capture click, if one is waiting for
/// its partner; it appears as a thin dashed boundary line and disappears as
/// soon as the capture completes or is abandoned.
pub fn compose(
    candles: &[Candle],
    annotations: &AnnotationSet,
    pending_region: Option<(f64, i64)>,
    theme: ChartTheme,
    fit: bool,
) -> ChartFrame {
    let markers = annotations
        .points
        .iter()
        .map(|p| ChartMarker {
            time: p.time,
            position: p.position,
            color: p.color.clone(),
            shape: p.shape,
            text: p.text.clone(),
        })
        .collect();

    let mut price_lines: Vec<ChartPriceLine> = annotations
        .lines
        .iter()
        .map(|l| ChartPriceLine {
            price: l.price,
            color: l.color.clone(),
            line_width: l.line_width,
            line_style: l.line_style,
            title: l.title.clone(),
        })
        .collect();
    if let Some((price, _time)) = pending_region {
        price_lines.push(ChartPriceLine {
            price,
            color: FVG_PENDING_COLOR.to_string(),
            line_width: 1,
            line_style: LineStyle::Dashed,
            title: "FVG".to_string(),
        });
    }

    ChartFrame {
        candles: candles.to_vec(),
        markers,
        price_lines,
        regions: annotations.regions.clone(),
        theme,
        fit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::{PointAnnotation, SignalKind, StructureAnnotation, StructureKind};
    use crate::chart::ThemeKind;

    fn sample_set() -> AnnotationSet {
        AnnotationSet {
            points: vec![PointAnnotation::from_click(SignalKind::Buy, 100)],
            lines: vec![StructureAnnotation::from_click(StructureKind::Bos, 100, 1.5)],
            regions: vec![RegionAnnotation::from_clicks(2.0, 100, 1.0)],
        }
    }

    #[test]
    fn test_compose_projects_all_collections() {
        let candles = vec![Candle::new(100, 1.0, 2.0, 0.5, 1.5)];
        let frame = compose(&candles, &sample_set(), None, ThemeKind::Dark.palette(), true);

        assert_eq!(frame.candles.len(), 1);
        assert_eq!(frame.markers.len(), 1);
        assert_eq!(frame.markers[0].text, "BUY");
        assert_eq!(frame.price_lines.len(), 1);
        assert_eq!(frame.regions.len(), 1);
        assert!(frame.fit);
    }

    #[test]
    fn test_pending_region_adds_temporary_boundary_line() {
        let frame = compose(&[], &AnnotationSet::default(), Some((4.2, 100)), ChartTheme::dark(), false);

        assert_eq!(frame.price_lines.len(), 1);
        let line = &frame.price_lines[0];
        assert_eq!(line.price, 4.2);
        assert_eq!(line.color, FVG_PENDING_COLOR);
        assert_eq!(line.line_style, LineStyle::Dashed);

        // gone once the capture resolves
        let frame = compose(&[], &AnnotationSet::default(), None, ChartTheme::dark(), false);
        assert!(frame.price_lines.is_empty());
    }
}
