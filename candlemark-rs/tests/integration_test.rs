//! End-to-end tests for the labeling engine

use candlemark_rs::prelude::*;

const MT_CSV: &str = "Date,Time,Open,High,Low,Close\n\
                      2023.01.01,14:00,150,152,149,151\n\
                      2023.01.01,15:00,151,153,150,152";

#[test]
fn test_upload_to_chart_flow() {
    let mut bench = Workbench::new();
    let count = bench.load_csv("ds", MT_CSV).unwrap();
    assert_eq!(count, 2);

    let candles = bench.candles("ds").unwrap();
    assert!(candles[0].time < candles[1].time);
    assert_eq!(candles[1].open, 151.0);

    let frame = bench.chart_frame("ds").unwrap();
    assert_eq!(frame.candles.len(), 2);
    assert!(frame.markers.is_empty());
}

#[test]
fn test_full_labeling_session() {
    let mut bench = Workbench::new();
    bench.load_csv("ds", MT_CSV).unwrap();
    bench.activate("ds");
    let (t1, t2) = {
        let candles = bench.candles("ds").unwrap();
        (candles[0].time, candles[1].time)
    };

    // BUY marker on the first candle
    bench.select_mode(LabelMode::Buy);
    bench.chart_click(t1, 150.2);

    // BOS line at a clicked price
    bench.select_mode(LabelMode::Bos);
    bench.chart_click(t2, 152.5);

    // FVG region across both candles
    bench.select_mode(LabelMode::Fvg);
    bench.chart_click(t1, 152.0);
    bench.chart_click(t2, 150.0);

    let set = bench.annotations("ds");
    assert_eq!(set.points.len(), 1);
    assert_eq!(set.lines.len(), 1);
    assert_eq!(set.regions.len(), 1);
    assert_eq!(set.regions[0].price_top, 152.0);
    assert_eq!(set.regions[0].price_bottom, 150.0);
    assert_eq!(set.regions[0].time, t1);

    // training export carries one row per annotation
    let csv = bench.training_csv("ds");
    let rows: Vec<&str> = csv.lines().collect();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0], "type,time,price,text,price2");
    assert!(rows[1].starts_with("POINT,"));
    assert!(rows[2].starts_with("BOS,"));
    assert!(rows[3].starts_with("FVG,"));
}

#[test]
fn test_marker_overwrite_on_same_candle() {
    let mut bench = Workbench::new();
    bench.load_csv("ds", MT_CSV).unwrap();
    bench.activate("ds");
    let t = bench.candles("ds").unwrap()[0].time;

    bench.select_mode(LabelMode::Buy);
    bench.chart_click(t, 150.0);
    bench.select_mode(LabelMode::Hold);
    bench.chart_click(t, 150.0);

    let points = bench.annotations("ds").points;
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].text, "HOLD");
}

#[test]
fn test_sync_layer_tracks_workbench_state() {
    #[derive(Default)]
    struct Recorder {
        frames: Vec<ChartFrame>,
    }
    impl ChartSurface for Recorder {
        fn draw(&mut self, frame: &ChartFrame) {
            self.frames.push(frame.clone());
        }
        fn set_hover(&mut self, _hover: Option<HoverPoint>) {}
    }

    let mut bench = Workbench::new();
    bench.load_csv("ds", MT_CSV).unwrap();
    bench.activate("ds");
    let t = bench.candles("ds").unwrap()[0].time;

    let mut sync = ChartSync::new(Recorder::default(), ThemeKind::Dark);
    sync.render(bench.candles("ds").unwrap(), &bench.annotations("ds"), None);

    bench.select_mode(LabelMode::Sell);
    bench.chart_click(t, 151.0);
    sync.render(
        bench.candles("ds").unwrap(),
        &bench.annotations("ds"),
        bench.pending_region(),
    );

    let frames = &sync.surface().frames;
    assert!(frames[0].fit);
    assert!(frames[0].markers.is_empty());
    assert!(!frames[1].fit);
    assert_eq!(frames[1].markers.len(), 1);
    assert_eq!(frames[1].markers[0].text, "SELL");
}

#[test]
fn test_labeled_csv_feeds_signal_flow() {
    let mut bench = Workbench::new();
    bench.load_csv("ds", MT_CSV).unwrap();
    bench.activate("ds");
    let t = bench.candles("ds").unwrap()[0].time;

    bench.select_mode(LabelMode::Buy);
    bench.chart_click(t, 150.0);

    let csv = bench.labeled_csv("ds").unwrap();
    let rows: Vec<&str> = csv.lines().collect();
    assert_eq!(rows[0], "time,open,high,low,close,label");
    assert!(rows[1].ends_with(",BUY"));
    assert!(rows[2].ends_with(','));
}
