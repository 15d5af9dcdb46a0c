//! The labeling workbench
//!
//! One explicit state container for everything the labeling session
//! mutates: the candle cache, the annotation store, the labeling state
//! machine, the active dataset, and the theme. Every transition takes
//! `&mut self`, so a click cannot be processed twice concurrently and the
//! machine's invariants hold by construction.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::annotate::{
    AnnotationSet, AnnotationStore, ClickEffect, LabelMode, Labeler, PointAnnotation,
};
use crate::chart::{compose, ChartFrame, HoverPoint, ThemeKind};
use crate::data::{parse_csv, Candle, CandleCache, ParseError};
use crate::export;

/// Result of applying an auto-label batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoLabelOutcome {
    /// Points merged into the store
    pub applied: usize,
    /// Points whose time matched no candle and were rejected
    pub dropped: usize,
    /// Whole batch thrown away because the active dataset changed while the
    /// collaborator call was in flight
    pub discarded: bool,
}

/// The workbench.
#[derive(Debug, Default)]
pub struct Workbench {
    cache: CandleCache,
    annotations: AnnotationStore,
    labeler: Labeler,
    active: Option<String>,
    theme: ThemeKind,
}

impl Workbench {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an upload and cache the result under the dataset id. Returns
    /// the number of candles that survived parsing; zero is a valid parse
    /// the caller should surface as "no valid rows found".
    pub fn load_csv(&mut self, dataset_id: &str, content: &str) -> Result<usize, ParseError> {
        let candles = parse_csv(content)?;
        let count = candles.len();
        info!(dataset_id, candles = count, "dataset loaded");
        self.cache.insert(dataset_id, content.to_string(), candles);
        Ok(count)
    }

    /// Switch the active dataset. This is a cancellation point: any
    /// in-progress region capture is abandoned with its temporary line.
    pub fn activate(&mut self, dataset_id: &str) {
        if self.active.as_deref() != Some(dataset_id) {
            self.labeler.reset();
            self.active = Some(dataset_id.to_string());
            debug!(dataset_id, "dataset activated");
        }
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Cascade delete: candle cache, raw text, and all annotations. If the
    /// dataset was active the labeler is reset as well.
    pub fn remove(&mut self, dataset_id: &str) {
        self.cache.remove(dataset_id);
        self.annotations.remove_all(dataset_id);
        if self.active.as_deref() == Some(dataset_id) {
            self.active = None;
            self.labeler.reset();
        }
        info!(dataset_id, "dataset removed");
    }

    pub fn select_mode(&mut self, mode: LabelMode) {
        self.labeler.select_mode(mode);
    }

    pub fn armed_mode(&self) -> Option<LabelMode> {
        self.labeler.armed_mode()
    }

    pub fn pending_region(&self) -> Option<(f64, i64)> {
        self.labeler.pending_region()
    }

    /// Process a chart click for the active dataset and apply the resulting
    /// annotation to the store. Clicks with no active dataset are ignored.
    pub fn chart_click(&mut self, time: i64, price: f64) -> ClickEffect {
        let Some(dataset_id) = self.active.clone() else {
            return ClickEffect::Ignored;
        };

        let effect = self.labeler.chart_click(time, price);
        match &effect {
            ClickEffect::AddPoint(point) => {
                self.annotations.add_point(&dataset_id, point.clone());
            }
            ClickEffect::AddLine(line) => {
                self.annotations.add_line(&dataset_id, line.clone());
            }
            ClickEffect::AddRegion(region) => {
                self.annotations.add_region(&dataset_id, region.clone());
            }
            ClickEffect::RegionStarted { .. } | ClickEffect::Ignored => {}
        }
        effect
    }

    pub fn candles(&self, dataset_id: &str) -> Option<&[Candle]> {
        self.cache.candles(dataset_id)
    }

    pub fn raw_csv(&self, dataset_id: &str) -> Option<&str> {
        self.cache.raw_csv(dataset_id)
    }

    pub fn annotations(&self, dataset_id: &str) -> AnnotationSet {
        self.annotations.annotations(dataset_id)
    }

    pub fn theme(&self) -> ThemeKind {
        self.theme
    }

    pub fn set_theme(&mut self, theme: ThemeKind) {
        self.theme = theme;
    }

    /// The full declarative chart state for a dataset. The temporary FVG
    /// boundary line only appears on the active dataset's frame.
    pub fn chart_frame(&self, dataset_id: &str) -> Option<ChartFrame> {
        let candles = self.cache.candles(dataset_id)?;
        let pending = if self.active.as_deref() == Some(dataset_id) {
            self.labeler.pending_region()
        } else {
            None
        };
        Some(compose(
            candles,
            &self.annotations.annotations(dataset_id),
            pending,
            self.theme.palette(),
            true,
        ))
    }

    /// Hover feedback for the candle at an exact time.
    pub fn hover(&self, dataset_id: &str, time: i64) -> Option<HoverPoint> {
        let total = self.cache.candles(dataset_id)?.len();
        let candle = self.cache.candle_at(dataset_id, time)?;
        Some(HoverPoint {
            time: candle.time,
            index: candle.index,
            total,
            raw: candle.raw.clone(),
        })
    }

    /// The training hand-off CSV for a dataset's annotations.
    pub fn training_csv(&self, dataset_id: &str) -> String {
        export::training_csv(&self.annotations.annotations(dataset_id))
    }

    /// The labeled CSV handed to the signal-generation collaborator.
    pub fn labeled_csv(&self, dataset_id: &str) -> Option<String> {
        let candles = self.cache.candles(dataset_id)?;
        Some(export::labeled_csv(
            candles,
            &self.annotations.annotations(dataset_id),
        ))
    }

    /// Merge a batch of collaborator-suggested points into a dataset.
    ///
    /// The collaborator call resolved after an await, so the world may have
    /// moved on: if the active dataset is no longer `dataset_id`, the whole
    /// batch is discarded. Points whose time matches no cached candle are
    /// dropped individually; the rest merge last-write-wins by time.
    pub fn apply_auto_labels(
        &mut self,
        dataset_id: &str,
        points: Vec<PointAnnotation>,
    ) -> AutoLabelOutcome {
        if self.active.as_deref() != Some(dataset_id) {
            warn!(dataset_id, "auto-label batch discarded, dataset no longer active");
            return AutoLabelOutcome {
                applied: 0,
                dropped: 0,
                discarded: true,
            };
        }

        let mut applied = 0;
        let mut dropped = 0;
        for point in points {
            if self.cache.candle_at(dataset_id, point.time).is_none() {
                dropped += 1;
                continue;
            }
            self.annotations.add_point(dataset_id, point);
            applied += 1;
        }
        if dropped > 0 {
            warn!(dataset_id, dropped, "auto-label points matched no candle");
        }
        info!(dataset_id, applied, dropped, "auto-label batch applied");
        AutoLabelOutcome {
            applied,
            dropped,
            discarded: false,
        }
    }
}
