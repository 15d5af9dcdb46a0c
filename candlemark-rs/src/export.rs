//! Serialization for downstream consumers
//!
//! Two fixed formats: the training hand-off CSV consumed by the external
//! training job, and the labeled CSV handed to the signal-generation
//! collaborator.

use std::fmt::Write;

use crate::annotate::{AnnotationSet, MarkerPosition};
use crate::data::Candle;

/// Serialize annotations to the training hand-off CSV.
///
/// Header `type,time,price,text,price2`. Point rows encode which side of
/// the bar the marker sits on (`high`/`low`) in the price column, not a
/// traded price. Line rows leave `price2` empty; region rows carry the gap
/// bounds. Rows are grouped points, then lines, then regions, each group
/// ascending by time, so successive exports diff cleanly.
pub fn training_csv(annotations: &AnnotationSet) -> String {
    let mut out = String::from("type,time,price,text,price2\n");

    for p in &annotations.points {
        let side = match p.position {
            MarkerPosition::AboveBar => "high",
            MarkerPosition::BelowBar | MarkerPosition::InBar => "low",
        };
        let _ = writeln!(out, "POINT,{},{},{},", p.time, side, p.text);
    }

    let mut lines: Vec<_> = annotations.lines.iter().collect();
    lines.sort_by_key(|l| l.time);
    for l in lines {
        let _ = writeln!(out, "{},{},{},{},", l.annotation_type.label(), l.time, l.price, l.title);
    }

    let mut regions: Vec<_> = annotations.regions.iter().collect();
    regions.sort_by_key(|r| r.time);
    for r in regions {
        let _ = writeln!(
            out,
            "{},{},{},{},{}",
            r.annotation_type.label(),
            r.time,
            r.price_top,
            r.title,
            r.price_bottom
        );
    }

    out
}

/// Serialize candles plus their point labels to the CSV payload the
/// signal-generation collaborator receives. Candles without a marker get an
/// empty label column.
pub fn labeled_csv(candles: &[Candle], annotations: &AnnotationSet) -> String {
    let mut out = String::from("time,open,high,low,close,label\n");
    for c in candles {
        let label = annotations
            .points
            .iter()
            .find(|p| p.time == c.time)
            .map(|p| p.text.as_str())
            .unwrap_or("");
        let _ = writeln!(
            out,
            "{},{},{},{},{},{}",
            c.time, c.open, c.high, c.low, c.close, label
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::{
        PointAnnotation, RegionAnnotation, SignalKind, StructureAnnotation, StructureKind,
    };

    #[test]
    fn test_training_csv_row_layout() {
        let set = AnnotationSet {
            points: vec![
                PointAnnotation::from_click(SignalKind::Buy, 100),
                PointAnnotation::from_click(SignalKind::Sell, 200),
            ],
            lines: vec![StructureAnnotation::from_click(StructureKind::Bos, 150, 1.5)],
            regions: vec![RegionAnnotation::from_clicks(5.0, 120, 3.0)],
        };

        let csv = training_csv(&set);
        let rows: Vec<&str> = csv.lines().collect();

        assert_eq!(rows[0], "type,time,price,text,price2");
        assert_eq!(rows[1], "POINT,100,low,BUY,");
        assert_eq!(rows[2], "POINT,200,high,SELL,");
        assert_eq!(rows[3], "BOS,150,1.5,BOS,");
        assert_eq!(rows[4], "FVG,120,5,FVG,3");
    }

    #[test]
    fn test_training_csv_groups_sorted_by_time() {
        let set = AnnotationSet {
            points: vec![],
            lines: vec![
                StructureAnnotation::from_click(StructureKind::Choch, 300, 2.0),
                StructureAnnotation::from_click(StructureKind::Bos, 100, 1.0),
            ],
            regions: vec![],
        };

        let csv = training_csv(&set);
        let rows: Vec<&str> = csv.lines().collect();
        assert!(rows[1].starts_with("BOS,100"));
        assert!(rows[2].starts_with("CHOCH,300"));
    }

    #[test]
    fn test_labeled_csv_joins_points_by_time() {
        let candles = vec![
            Candle::new(100, 1.0, 2.0, 0.5, 1.5),
            Candle::new(200, 1.5, 2.5, 1.0, 2.0),
        ];
        let set = AnnotationSet {
            points: vec![PointAnnotation::from_click(SignalKind::Buy, 200)],
            ..Default::default()
        };

        let csv = labeled_csv(&candles, &set);
        let rows: Vec<&str> = csv.lines().collect();
        assert_eq!(rows[0], "time,open,high,low,close,label");
        assert_eq!(rows[1], "100,1,2,0.5,1.5,");
        assert_eq!(rows[2], "200,1.5,2.5,1,2,BUY");
    }
}
