#![allow(dead_code)]

use tinytrader::adapters::frame_adapter::PriceFrame;
pub use tinytrader::domain::record::PriceRecord;
use tinytrader::domain::strategy::{FnRules, Strategy};

pub fn make_bar(date: &str, open: &str, high: &str, low: &str, close: &str, volume: &str) -> PriceRecord {
    PriceRecord::new()
        .with("date", date)
        .with("open", open)
        .with("high", high)
        .with("low", low)
        .with("close", close)
        .with("volume", volume)
}

/// Four daily bars closing 100, 105, 102, 108.
pub fn sample_data() -> Vec<PriceRecord> {
    vec![
        make_bar("2022-01-01", "99", "101", "98", "100", "1000"),
        make_bar("2022-01-02", "104", "106", "103", "105", "1100"),
        make_bar("2022-01-03", "101", "103", "100", "102", "1200"),
        make_bar("2022-01-04", "107", "109", "106", "108", "1300"),
    ]
}

/// The same bars as [`sample_data`], column-oriented.
pub fn sample_frame() -> PriceFrame {
    PriceFrame::new()
        .with_column("date", ["2022-01-01", "2022-01-02", "2022-01-03", "2022-01-04"])
        .with_column("open", ["99", "104", "101", "107"])
        .with_column("high", ["101", "106", "103", "109"])
        .with_column("low", ["98", "103", "100", "106"])
        .with_column("close", ["100", "105", "102", "108"])
        .with_column("volume", ["1000", "1100", "1200", "1300"])
}

/// Four one-minute bars closing 100, 101, 102, 103.
pub fn sample_intraday() -> Vec<PriceRecord> {
    vec![
        make_bar("2022-01-01 09:30:00", "100", "101", "99", "100", "500"),
        make_bar("2022-01-01 09:31:00", "100", "102", "100", "101", "600"),
        make_bar("2022-01-01 09:32:00", "101", "103", "101", "102", "550"),
        make_bar("2022-01-01 09:33:00", "102", "104", "102", "103", "580"),
    ]
}

/// Buy after a down close, sell after an up close, written as closures.
pub fn dip_buyer() -> Strategy<FnRules> {
    Strategy::new(
        "dip buyer",
        FnRules::new()
            .buy(|s, i| Ok(s.close_at(i)? < s.close_at(i - 1)?))
            .sell(|s, i| Ok(s.close_at(i)? > s.close_at(i - 1)?)),
    )
}

/// Buys on bar `buy` and sells on bar `sell`.
pub fn scripted(buy: usize, sell: usize) -> Strategy<FnRules> {
    Strategy::new(
        "scripted",
        FnRules::new()
            .buy(move |_, i| Ok(i == buy))
            .sell(move |_, i| Ok(i == sell)),
    )
}

/// Generated bars: `closes[i]` on consecutive days from 2022-01-01.
pub fn bars_from_closes(closes: &[f64]) -> Vec<PriceRecord> {
    let start = chrono::NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let date = start + chrono::Duration::days(i as i64);
            PriceRecord::new()
                .with("date", date.format("%Y-%m-%d").to_string())
                .with("close", *c)
        })
        .collect()
}
