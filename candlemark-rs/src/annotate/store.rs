//! Per-dataset annotation storage

use std::collections::HashMap;

use tracing::debug;

use crate::annotate::{AnnotationSet, PointAnnotation, RegionAnnotation, StructureAnnotation};

/// In-memory annotation collections keyed by dataset id.
///
/// An unknown dataset id is treated as "no annotations yet": lookups return
/// empty collections and removals are no-ops, never errors.
#[derive(Debug, Default)]
pub struct AnnotationStore {
    sets: HashMap<String, AnnotationSet>,
}

impl AnnotationStore {
    /// Create new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a point marker, replacing any existing marker at the same
    /// candle time (last write wins by `time`). Points are kept sorted
    /// ascending by time, which the chart marker contract requires.
    pub fn add_point(&mut self, dataset_id: &str, point: PointAnnotation) -> PointAnnotation {
        let points = &mut self.sets.entry(dataset_id.to_string()).or_default().points;
        match points.binary_search_by_key(&point.time, |p| p.time) {
            Ok(i) => points[i] = point.clone(),
            Err(i) => points.insert(i, point.clone()),
        }
        point
    }

    /// Append a structure line. No uniqueness constraint.
    pub fn add_line(&mut self, dataset_id: &str, line: StructureAnnotation) {
        self.sets
            .entry(dataset_id.to_string())
            .or_default()
            .lines
            .push(line);
    }

    /// Append a region. No uniqueness constraint.
    pub fn add_region(&mut self, dataset_id: &str, region: RegionAnnotation) {
        self.sets
            .entry(dataset_id.to_string())
            .or_default()
            .regions
            .push(region);
    }

    /// All annotations for a dataset; empty set for an unknown id.
    pub fn annotations(&self, dataset_id: &str) -> AnnotationSet {
        self.sets.get(dataset_id).cloned().unwrap_or_default()
    }

    /// Drop every annotation for a dataset. Used on dataset deletion.
    pub fn remove_all(&mut self, dataset_id: &str) {
        if let Some(set) = self.sets.remove(dataset_id) {
            debug!(dataset_id, dropped = set.len(), "removed annotations");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::{SignalKind, StructureKind};

    #[test]
    fn test_last_write_wins_by_time() {
        let mut store = AnnotationStore::new();
        store.add_point("ds", PointAnnotation::from_click(SignalKind::Buy, 100));
        store.add_point("ds", PointAnnotation::from_click(SignalKind::Sell, 100));

        let set = store.annotations("ds");
        assert_eq!(set.points.len(), 1);
        assert_eq!(set.points[0].text, "SELL");
    }

    #[test]
    fn test_points_kept_time_sorted() {
        let mut store = AnnotationStore::new();
        store.add_point("ds", PointAnnotation::from_click(SignalKind::Buy, 300));
        store.add_point("ds", PointAnnotation::from_click(SignalKind::Buy, 100));
        store.add_point("ds", PointAnnotation::from_click(SignalKind::Buy, 200));

        let times: Vec<i64> = store.annotations("ds").points.iter().map(|p| p.time).collect();
        assert_eq!(times, vec![100, 200, 300]);
    }

    #[test]
    fn test_lines_and_regions_append() {
        let mut store = AnnotationStore::new();
        store.add_line("ds", StructureAnnotation::from_click(StructureKind::Bos, 1, 1.0));
        store.add_line("ds", StructureAnnotation::from_click(StructureKind::Bos, 1, 1.0));
        store.add_region("ds", RegionAnnotation::from_clicks(2.0, 1, 1.0));

        let set = store.annotations("ds");
        assert_eq!(set.lines.len(), 2);
        assert_eq!(set.regions.len(), 1);
    }

    #[test]
    fn test_unknown_dataset_is_empty_not_error() {
        let mut store = AnnotationStore::new();
        assert!(store.annotations("nope").is_empty());
        store.remove_all("nope"); // no-op, must not panic
    }

    #[test]
    fn test_remove_all_clears_dataset() {
        let mut store = AnnotationStore::new();
        store.add_point("a", PointAnnotation::from_click(SignalKind::Buy, 1));
        store.add_point("b", PointAnnotation::from_click(SignalKind::Buy, 1));

        store.remove_all("a");
        assert!(store.annotations("a").is_empty());
        assert_eq!(store.annotations("b").points.len(), 1);
    }
}
