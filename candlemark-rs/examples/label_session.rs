//! Example: parse a broker CSV export and run a short labeling session
//!
//! Run with: cargo run --example label_session

use candlemark_rs::prelude::*;

fn main() -> Result<()> {
    let csv = "\
<DATE>\t<TIME>\t<OPEN>\t<HIGH>\t<LOW>\t<CLOSE>
2023.06.01\t09:00:00\t1.0710\t1.0725\t1.0702\t1.0718
2023.06.01\t10:00:00\t1.0718\t1.0740\t1.0712\t1.0735
2023.06.01\t11:00:00\t1.0735\t1.0738\t1.0705\t1.0709
";

    let mut bench = Workbench::new();
    let count = bench.load_csv("eurusd-h1", csv)?;
    println!("parsed {} candles", count);
    bench.activate("eurusd-h1");

    let times: Vec<i64> = bench
        .candles("eurusd-h1")
        .unwrap_or_default()
        .iter()
        .map(|c| c.time)
        .collect();

    // Mark a buy, a break of structure, and a fair value gap
    bench.select_mode(LabelMode::Buy);
    bench.chart_click(times[0], 1.0710);

    bench.select_mode(LabelMode::Bos);
    bench.chart_click(times[1], 1.0740);

    bench.select_mode(LabelMode::Fvg);
    bench.chart_click(times[1], 1.0740);
    bench.chart_click(times[2], 1.0725);

    let set = bench.annotations("eurusd-h1");
    println!(
        "annotated: {} points, {} lines, {} regions",
        set.points.len(),
        set.lines.len(),
        set.regions.len()
    );

    println!("\ntraining hand-off CSV:\n{}", bench.training_csv("eurusd-h1"));
    Ok(())
}
