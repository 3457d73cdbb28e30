//! Regional market trend series.
//!
//! A fixed twelve-month series of average sale price and sales volume for the
//! region. Display-only context for the valuation; nothing here feeds the model.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarketTrend {
    pub month: &'static str,
    pub avg_price: u64,
    pub volume: u32,
}

pub const MARKET_TRENDS: [MarketTrend; 12] = [
    MarketTrend { month: "Jan", avg_price: 540_000, volume: 120 },
    MarketTrend { month: "Feb", avg_price: 535_000, volume: 115 },
    MarketTrend { month: "Mar", avg_price: 550_000, volume: 145 },
    MarketTrend { month: "Apr", avg_price: 580_000, volume: 180 },
    MarketTrend { month: "May", avg_price: 610_000, volume: 210 },
    MarketTrend { month: "Jun", avg_price: 630_000, volume: 230 },
    MarketTrend { month: "Jul", avg_price: 625_000, volume: 195 },
    MarketTrend { month: "Aug", avg_price: 640_000, volume: 205 },
    MarketTrend { month: "Sep", avg_price: 615_000, volume: 160 },
    MarketTrend { month: "Oct", avg_price: 600_000, volume: 140 },
    MarketTrend { month: "Nov", avg_price: 590_000, volume: 110 },
    MarketTrend { month: "Dec", avg_price: 605_000, volume: 95 },
];

/// Summary statistics over the trend series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendSummary {
    pub min_price: u64,
    pub max_price: u64,
    pub mean_price: f64,
    pub total_volume: u32,
    /// Price change from the first to the last month, in percent.
    pub change_pct: f64,
}

pub fn summarize(trends: &[MarketTrend]) -> Option<TrendSummary> {
    let first = trends.first()?;
    let last = trends.last()?;

    let min_price = trends.iter().map(|t| t.avg_price).min()?;
    let max_price = trends.iter().map(|t| t.avg_price).max()?;
    let mean_price = trends.iter().map(|t| t.avg_price as f64).sum::<f64>() / trends.len() as f64;
    let total_volume = trends.iter().map(|t| t.volume).sum();
    let change_pct = (last.avg_price as f64 / first.avg_price as f64 - 1.0) * 100.0;

    Some(TrendSummary {
        min_price,
        max_price,
        mean_price,
        total_volume,
        change_pct,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_of_builtin_series() {
        let s = summarize(&MARKET_TRENDS).unwrap();
        assert_eq!(s.min_price, 535_000);
        assert_eq!(s.max_price, 640_000);
        assert_eq!(s.total_volume, 1_905);
        assert!((s.change_pct - 12.037).abs() < 0.01, "got {}", s.change_pct);
    }

    #[test]
    fn empty_series_has_no_summary() {
        assert!(summarize(&[]).is_none());
    }
}
