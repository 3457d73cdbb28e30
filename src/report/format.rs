//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the valuation code stays free of presentation concerns
//! - the CLI and the TUI render prices identically

use crate::domain::{PropertyFeatures, ValuationBreakdown, ValuationResult};
use crate::market::{MarketTrend, summarize};
use crate::valuation::{LOCATIONS, Location};

/// Format a whole-unit amount as dollars with thousands separators.
pub fn format_currency(amount: u64) -> String {
    format!("${}", group_thousands(amount))
}

/// Format a signed contribution, e.g. `-$105,000` or `+$616,000`.
pub fn format_signed_currency(amount: f64) -> String {
    let sign = if amount < 0.0 { '-' } else { '+' };
    let magnitude = amount.abs().round() as u64;
    format!("{sign}{}", format_currency(magnitude))
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Human-readable location label, e.g. `98103 (Seattle Central)`.
pub fn location_label(zip_code: &str) -> String {
    match LOCATIONS.lookup(zip_code) {
        Some(loc) => format!("{} ({})", loc.zip_code, loc.neighborhood),
        None => format!("{} (unlisted)", zip_code.trim()),
    }
}

/// Estimate, confidence band, and inputs.
pub fn format_valuation(features: &PropertyFeatures, result: &ValuationResult, as_of_year: i32) -> String {
    let mut out = String::new();

    out.push_str("=== prophet - Property Valuation ===\n");
    out.push_str(&format!("As-of year: {as_of_year}\n"));
    out.push_str(&format!("Estimated price: {}\n", format_currency(result.point_estimate)));
    out.push_str(&format!(
        "Range: {} - {}\n",
        format_currency(result.confidence_low),
        format_currency(result.confidence_high)
    ));

    out.push_str("\nProperty:\n");
    out.push_str(&format_features(features));

    out
}

pub fn format_features(features: &PropertyFeatures) -> String {
    let mut out = String::new();
    out.push_str(&format!("- living area : {} sqft\n", features.living_area_sqft));
    out.push_str(&format!("- bedrooms    : {}\n", features.bedrooms));
    out.push_str(&format!("- bathrooms   : {}\n", features.bathrooms));
    out.push_str(&format!("- year built  : {}\n", features.year_built));
    if let Some(year) = features.year_renovated {
        out.push_str(&format!("- renovated   : {year}\n"));
    }
    out.push_str(&format!("- grade       : {}/13\n", features.grade));
    out.push_str(&format!("- condition   : {}/5\n", features.condition));
    out.push_str(&format!("- location    : {}\n", location_label(&features.zip_code)));
    out
}

/// Term-by-term breakdown of the weighted sum.
pub fn format_breakdown(b: &ValuationBreakdown) -> String {
    let mut out = String::new();
    out.push_str("Breakdown:\n");
    let rows = [
        ("intercept", b.intercept),
        ("living area", b.living_area),
        ("bedrooms", b.bedrooms),
        ("bathrooms", b.bathrooms),
        ("grade", b.grade),
        ("age", b.age),
    ];
    for (label, value) in rows {
        out.push_str(&format!("  {label:<12} {:>14}\n", format_signed_currency(value)));
    }
    out.push_str(&format!("  {:<12} {:>14}\n", "subtotal", format_signed_currency(b.weighted_sum)));

    let listed = if b.location_listed { "" } else { " (unlisted zip)" };
    out.push_str(&format!("  {:<12} {:>14}{listed}\n", "location", format!("x{:.2}", b.multiplier)));
    out.push_str(&format!("  age {} year(s)\n", b.age_years));
    if b.floored {
        out.push_str("  price floor applied\n");
    }
    out
}

/// Recognized postal codes, highest multiplier first.
pub fn format_locations(locations: &[Location]) -> String {
    let mut rows = locations.to_vec();
    rows.sort_by(|a, b| b.multiplier.total_cmp(&a.multiplier));

    let mut out = String::new();
    out.push_str(&format!("{:<7} {:<18} {:>10}\n", "zip", "neighborhood", "multiplier"));
    out.push_str(&format!("{:-<7} {:-<18} {:->10}\n", "", "", ""));
    for loc in rows {
        out.push_str(&format!("{:<7} {:<18} {:>10.2}\n", loc.zip_code, loc.neighborhood, loc.multiplier));
    }
    out.push_str("Other zip codes are priced with multiplier 1.00.\n");
    out
}

/// Regional price trend table with a summary line.
pub fn format_trends(trends: &[MarketTrend]) -> String {
    let mut out = String::new();
    out.push_str("Regional price trends (last 12 months):\n");
    out.push_str(&format!("{:<5} {:>12} {:>8}\n", "month", "avg price", "volume"));
    out.push_str(&format!("{:-<5} {:->12} {:->8}\n", "", "", ""));
    for t in trends {
        out.push_str(&format!("{:<5} {:>12} {:>8}\n", t.month, format_currency(t.avg_price), t.volume));
    }
    if let Some(s) = summarize(trends) {
        out.push_str(&format!(
            "range {} - {} | mean {} | volume {} | change {:+.1}%\n",
            format_currency(s.min_price),
            format_currency(s.max_price),
            format_currency(s.mean_price.round() as u64),
            s.total_volume,
            s.change_pct,
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::MARKET_TRENDS;
    use crate::valuation::estimate;

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(0), "$0");
        assert_eq!(format_currency(999), "$999");
        assert_eq!(format_currency(1_000), "$1,000");
        assert_eq!(format_currency(150_000), "$150,000");
        assert_eq!(format_currency(1_663_200), "$1,663,200");
        assert_eq!(format_currency(12_345_678_901), "$12,345,678,901");
    }

    #[test]
    fn signed_currency_keeps_sign() {
        assert_eq!(format_signed_currency(-105_000.0), "-$105,000");
        assert_eq!(format_signed_currency(616_000.0), "+$616,000");
    }

    #[test]
    fn valuation_text_shows_price_and_range() {
        let features = PropertyFeatures::default();
        let result = estimate(&features, 2024);
        let text = format_valuation(&features, &result, 2024);
        assert!(text.contains("Estimated price: $1,663,200"));
        assert!(text.contains("Range: $1,530,144 - $1,796,256"));
        assert!(text.contains("98103 (Seattle Central)"));
    }

    #[test]
    fn breakdown_marks_unlisted_zip_and_floor() {
        let features = PropertyFeatures {
            living_area_sqft: 500.0,
            grade: 1,
            zip_code: "12345".to_string(),
            ..Default::default()
        };
        let text = format_breakdown(&estimate(&features, 2024).breakdown);
        assert!(text.contains("unlisted zip"));
        assert!(text.contains("price floor applied"));
    }

    #[test]
    fn locations_sorted_by_multiplier() {
        let text = format_locations(LOCATIONS.entries());
        let bellevue = text.find("Bellevue").unwrap();
        let auburn = text.find("Auburn").unwrap();
        assert!(bellevue < auburn);
    }

    #[test]
    fn location_order_is_stable_for_ties_and_total_with_nan() {
        let rows = [
            Location { zip_code: "00001", neighborhood: "Low", multiplier: 0.9 },
            Location { zip_code: "00002", neighborhood: "TieA", multiplier: 1.2 },
            Location { zip_code: "00003", neighborhood: "Broken", multiplier: f64::NAN },
            Location { zip_code: "00004", neighborhood: "TieB", multiplier: 1.2 },
        ];
        let text = format_locations(&rows);
        let pos = |name: &str| text.find(name).unwrap();
        assert!(pos("Broken") < pos("TieA"));
        assert!(pos("TieA") < pos("TieB"));
        assert!(pos("TieB") < pos("Low"));
    }

    #[test]
    fn trends_table_lists_every_month() {
        let text = format_trends(&MARKET_TRENDS);
        for t in &MARKET_TRENDS {
            assert!(text.contains(t.month));
        }
        assert!(text.contains("change +12.0%"));
    }
}
