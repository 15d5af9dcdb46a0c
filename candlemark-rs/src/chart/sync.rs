//! Chart synchronization
//!
//! [`ChartSync`] owns the projection policy: when to re-fit the view, which
//! theme to use, and how hover feedback flows through. The actual drawing is
//! behind the [`ChartSurface`] trait so the engine never holds chart
//! library handles.

use serde::Serialize;
use tracing::debug;

use crate::annotate::AnnotationSet;
use crate::chart::{compose, ChartFrame, ThemeKind};
use crate::data::Candle;

/// Hover feedback for one candle
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoverPoint {
    pub time: i64,
    /// Pre-drop row position in the uploaded file
    pub index: usize,
    /// Number of candles in the dataset
    pub total: usize,
    /// Original source row text
    pub raw: String,
}

/// The draw/update contract a rendering backend implements.
///
/// `draw` receives the complete desired state every time; the surface must
/// replace its markers and price lines wholesale rather than patching.
pub trait ChartSurface {
    fn draw(&mut self, frame: &ChartFrame);
    fn set_hover(&mut self, hover: Option<HoverPoint>);
}

/// Projects engine state onto a [`ChartSurface`].
#[derive(Debug)]
pub struct ChartSync<S: ChartSurface> {
    surface: S,
    theme: ThemeKind,
    /// (len, first time, last time) of the last rendered candle set; the
    /// view re-fits exactly when this changes
    fingerprint: Option<(usize, i64, i64)>,
    last: Option<ChartFrame>,
}

impl<S: ChartSurface> ChartSync<S> {
    pub fn new(surface: S, theme: ThemeKind) -> Self {
        Self {
            surface,
            theme,
            fingerprint: None,
            last: None,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn theme(&self) -> ThemeKind {
        self.theme
    }

    /// Idempotent full resync. Re-fits the view when the candle set changed
    /// since the previous render.
    pub fn render(
        &mut self,
        candles: &[Candle],
        annotations: &AnnotationSet,
        pending_region: Option<(f64, i64)>,
    ) {
        let fingerprint = fingerprint(candles);
        let fit = self.fingerprint != Some(fingerprint);
        self.fingerprint = Some(fingerprint);

        let frame = compose(candles, annotations, pending_region, self.theme.palette(), fit);
        debug!(
            candles = candles.len(),
            markers = frame.markers.len(),
            fit,
            "chart resync"
        );
        self.surface.draw(&frame);
        self.last = Some(frame);
    }

    /// Pass hover feedback straight through to the surface.
    pub fn update_hover(&mut self, hover: Option<HoverPoint>) {
        self.surface.set_hover(hover);
    }

    /// Switch themes and redraw the last frame under the new palette. The
    /// data extent is unchanged, so no re-fit.
    pub fn update_theme(&mut self, theme: ThemeKind) {
        if self.theme == theme {
            return;
        }
        self.theme = theme;
        if let Some(mut frame) = self.last.take() {
            frame.theme = theme.palette();
            frame.fit = false;
            self.surface.draw(&frame);
            self.last = Some(frame);
        }
    }
}

fn fingerprint(candles: &[Candle]) -> (usize, i64, i64) {
    (
        candles.len(),
        candles.first().map(|c| c.time).unwrap_or(0),
        candles.last().map(|c| c.time).unwrap_or(0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::{PointAnnotation, SignalKind};
    use crate::chart::ChartTheme;

    /// Records every draw call for assertions.
    #[derive(Debug, Default)]
    struct FakeSurface {
        frames: Vec<ChartFrame>,
        hovers: Vec<Option<HoverPoint>>,
    }

    impl ChartSurface for FakeSurface {
        fn draw(&mut self, frame: &ChartFrame) {
            self.frames.push(frame.clone());
        }

        fn set_hover(&mut self, hover: Option<HoverPoint>) {
            self.hovers.push(hover);
        }
    }

    fn candles() -> Vec<Candle> {
        vec![
            Candle::new(100, 1.0, 2.0, 0.5, 1.5),
            Candle::new(200, 1.5, 2.5, 1.0, 2.0),
        ]
    }

    #[test]
    fn test_fit_only_on_candle_set_change() {
        let mut sync = ChartSync::new(FakeSurface::default(), ThemeKind::Dark);
        let data = candles();
        let set = AnnotationSet::default();

        sync.render(&data, &set, None);
        sync.render(&data, &set, None);

        let mut grown = data.clone();
        grown.push(Candle::new(300, 2.0, 3.0, 1.5, 2.5));
        sync.render(&grown, &set, None);

        let fits: Vec<bool> = sync.surface().frames.iter().map(|f| f.fit).collect();
        assert_eq!(fits, vec![true, false, true]);
    }

    #[test]
    fn test_markers_replaced_wholesale() {
        let mut sync = ChartSync::new(FakeSurface::default(), ThemeKind::Dark);
        let data = candles();

        let mut set = AnnotationSet::default();
        set.points.push(PointAnnotation::from_click(SignalKind::Buy, 100));
        sync.render(&data, &set, None);

        // replacing the point collection replaces the drawn markers
        set.points.clear();
        set.points.push(PointAnnotation::from_click(SignalKind::Sell, 200));
        sync.render(&data, &set, None);

        let frames = &sync.surface().frames;
        assert_eq!(frames[0].markers.len(), 1);
        assert_eq!(frames[0].markers[0].text, "BUY");
        assert_eq!(frames[1].markers.len(), 1);
        assert_eq!(frames[1].markers[0].text, "SELL");
    }

    #[test]
    fn test_hover_passthrough() {
        let mut sync = ChartSync::new(FakeSurface::default(), ThemeKind::Dark);
        let hover = HoverPoint {
            time: 100,
            index: 0,
            total: 2,
            raw: "2023-01-01,1,2,0.5,1.5".to_string(),
        };

        sync.update_hover(Some(hover.clone()));
        sync.update_hover(None);

        assert_eq!(sync.surface().hovers, vec![Some(hover), None]);
    }

    #[test]
    fn test_theme_change_redraws_without_refit() {
        let mut sync = ChartSync::new(FakeSurface::default(), ThemeKind::Dark);
        sync.render(&candles(), &AnnotationSet::default(), None);

        sync.update_theme(ThemeKind::Light);
        // same theme again is a no-op
        sync.update_theme(ThemeKind::Light);

        let frames = &sync.surface().frames;
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].theme, ChartTheme::light());
        assert!(!frames[1].fit);
    }
}
