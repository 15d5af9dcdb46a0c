//! Interactive labeling state machine
//!
//! A pure reducer over two external events: `select_mode` (the user presses
//! an annotation-type button) and `chart_click` (the user clicks the chart).
//! The reducer never touches the chart or the store itself; it returns a
//! [`ClickEffect`] for the caller to apply. The in-progress FVG first click
//! is exposed through [`Labeler::pending_region`] so the temporary boundary
//! line is derived state rather than a retained chart handle.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::annotate::{PointAnnotation, RegionAnnotation, SignalKind, StructureAnnotation, StructureKind};

/// The annotation modes a user can arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LabelMode {
    Buy,
    Sell,
    Hold,
    Bos,
    Choch,
    Fvg,
}

/// Labeling machine states. "Armed" means the next chart click creates an
/// annotation of that kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LabelerState {
    Idle,
    ArmedPoint(SignalKind),
    ArmedLine(StructureKind),
    /// FVG capture armed, waiting for the first corner
    ArmedRegion,
    /// First corner captured, waiting for the second
    ArmedRegionSecond { first_price: f64, first_time: i64 },
}

/// What a chart click produced. The caller applies the annotation to the
/// store and clears or draws the temporary boundary line as indicated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "effect", content = "annotation", rename_all = "camelCase")]
pub enum ClickEffect {
    AddPoint(PointAnnotation),
    AddLine(StructureAnnotation),
    /// First FVG corner captured; draw the temporary boundary line
    RegionStarted { price: f64, time: i64 },
    /// Second corner captured; the temporary line must be removed
    AddRegion(RegionAnnotation),
    /// Click while idle (or with no active dataset): nothing happens
    Ignored,
}

/// The labeling state machine.
#[derive(Debug, Default)]
pub struct Labeler {
    state: LabelerState,
}

impl Default for LabelerState {
    fn default() -> Self {
        LabelerState::Idle
    }
}

impl Labeler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LabelerState {
        &self.state
    }

    /// The currently armed mode, if any. A pending second FVG click still
    /// reports `Fvg` armed.
    pub fn armed_mode(&self) -> Option<LabelMode> {
        match self.state {
            LabelerState::Idle => None,
            LabelerState::ArmedPoint(SignalKind::Buy) => Some(LabelMode::Buy),
            LabelerState::ArmedPoint(SignalKind::Sell) => Some(LabelMode::Sell),
            LabelerState::ArmedPoint(SignalKind::Hold) => Some(LabelMode::Hold),
            LabelerState::ArmedLine(StructureKind::Bos) => Some(LabelMode::Bos),
            LabelerState::ArmedLine(StructureKind::Choch) => Some(LabelMode::Choch),
            LabelerState::ArmedRegion | LabelerState::ArmedRegionSecond { .. } => {
                Some(LabelMode::Fvg)
            }
        }
    }

    /// The first FVG corner awaiting its partner, if one is pending. While
    /// this is `Some`, the chart shows a temporary boundary line at that
    /// price; when it returns to `None` the line must disappear with it.
    pub fn pending_region(&self) -> Option<(f64, i64)> {
        match self.state {
            LabelerState::ArmedRegionSecond {
                first_price,
                first_time,
            } => Some((first_price, first_time)),
            _ => None,
        }
    }

    /// Arm an annotation mode. Selecting the mode that is already armed
    /// toggles back to idle; selecting a different one switches directly.
    /// Either way any in-progress region capture is discarded.
    pub fn select_mode(&mut self, mode: LabelMode) {
        self.state = if self.armed_mode() == Some(mode) {
            LabelerState::Idle
        } else {
            match mode {
                LabelMode::Buy => LabelerState::ArmedPoint(SignalKind::Buy),
                LabelMode::Sell => LabelerState::ArmedPoint(SignalKind::Sell),
                LabelMode::Hold => LabelerState::ArmedPoint(SignalKind::Hold),
                LabelMode::Bos => LabelerState::ArmedLine(StructureKind::Bos),
                LabelMode::Choch => LabelerState::ArmedLine(StructureKind::Choch),
                LabelMode::Fvg => LabelerState::ArmedRegion,
            }
        };
        debug!(?mode, state = ?self.state, "mode selected");
    }

    /// Process a chart click at a candle time and price.
    pub fn chart_click(&mut self, time: i64, price: f64) -> ClickEffect {
        match self.state {
            LabelerState::Idle => ClickEffect::Ignored,
            LabelerState::ArmedPoint(kind) => {
                self.state = LabelerState::Idle;
                ClickEffect::AddPoint(PointAnnotation::from_click(kind, time))
            }
            LabelerState::ArmedLine(kind) => {
                self.state = LabelerState::Idle;
                ClickEffect::AddLine(StructureAnnotation::from_click(kind, time, price))
            }
            LabelerState::ArmedRegion => {
                self.state = LabelerState::ArmedRegionSecond {
                    first_price: price,
                    first_time: time,
                };
                ClickEffect::RegionStarted { price, time }
            }
            LabelerState::ArmedRegionSecond {
                first_price,
                first_time,
            } => {
                self.state = LabelerState::Idle;
                ClickEffect::AddRegion(RegionAnnotation::from_clicks(first_price, first_time, price))
            }
        }
    }

    /// Forcibly return to idle, discarding any in-progress capture. Called
    /// when the active dataset changes.
    pub fn reset(&mut self) {
        self.state = LabelerState::Idle;
    }
}
