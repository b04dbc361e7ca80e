//! Human-readable magnitudes and growth percentages.

use serde::{Deserialize, Serialize};

use crate::Series;

/// Display category of a growth figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrowthCategory {
    Positive,
    Negative,
    Neutral,
}

impl GrowthCategory {
    pub const fn colour(self) -> &'static str {
        match self {
            Self::Positive => "green",
            Self::Negative => "red",
            Self::Neutral => "gray",
        }
    }
}

const GROWTH_CAP: f64 = 999.0;

/// `950`, `1.5K`, `2M`, `7.2B`. One decimal with a redundant `.0` dropped.
pub fn format_magnitude(n: i64) -> String {
    let abs = n.unsigned_abs();
    let (scaled, suffix) = if abs >= 1_000_000_000 {
        (n as f64 / 1e9, "B")
    } else if abs >= 1_000_000 {
        (n as f64 / 1e6, "M")
    } else if abs >= 1_000 {
        (n as f64 / 1e3, "K")
    } else {
        return n.to_string();
    };

    let formatted = format!("{scaled:.1}");
    let trimmed = formatted.strip_suffix(".0").unwrap_or(&formatted);
    format!("{trimmed}{suffix}")
}

/// Signed whole-percent growth text and its category.
///
/// `None` stands for unbounded growth from a zero base and renders as the
/// positive cap. Magnitudes above 999% are capped as `±999%+`.
pub fn format_growth(pct: Option<f64>) -> (String, GrowthCategory) {
    let Some(pct) = pct else {
        return (String::from("+999%+"), GrowthCategory::Positive);
    };
    if pct == 0.0 {
        return (String::from("0%"), GrowthCategory::Neutral);
    }

    let sign = if pct >= 0.0 { '+' } else { '-' };
    let magnitude = pct.abs();
    let text = if magnitude > GROWTH_CAP {
        format!("{sign}999%+")
    } else {
        format!("{sign}{magnitude:.0}%")
    };

    let category = if pct > 0.0 {
        GrowthCategory::Positive
    } else if pct < 0.0 {
        GrowthCategory::Negative
    } else {
        GrowthCategory::Neutral
    };
    (text, category)
}

/// Percentage change from `from` to `to`, relative to `|from|`.
///
/// A zero base gives `Some(0.0)` when nothing changed and `None` (unbounded)
/// otherwise.
pub fn growth_between(from: f64, to: f64) -> Option<f64> {
    if from == 0.0 {
        return if to == 0.0 { Some(0.0) } else { None };
    }
    Some((to - from) / from.abs() * 100.0)
}

/// Growth of the latest considered point over the point one year earlier.
///
/// The outer `None` means there is not a full year of history. With
/// `skip_latest` the newest (usually partial) observation is ignored.
pub fn year_over_year(series: &Series, skip_latest: bool) -> Option<Option<f64>> {
    let values = series.values();
    let latest = values.len().checked_sub(if skip_latest { 2 } else { 1 })?;
    let prior = latest.checked_sub(series.granularity().periods_per_year())?;
    Some(growth_between(values[prior], values[latest]))
}

/// Round to `sig` significant figures.
pub fn round_sig(x: f64, sig: u32) -> f64 {
    if x == 0.0 || !x.is_finite() {
        return x;
    }
    let digits = sig as i32 - x.abs().log10().floor() as i32 - 1;
    if digits >= 0 {
        let factor = 10f64.powi(digits);
        (x * factor).round() / factor
    } else {
        let factor = 10f64.powi(-digits);
        (x / factor).round() * factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Granularity, SeriesDate, SourceKind, TimePoint};

    #[test]
    fn formats_magnitudes_with_suffixes() {
        assert_eq!(format_magnitude(950), "950");
        assert_eq!(format_magnitude(1500), "1.5K");
        assert_eq!(format_magnitude(2_000_000), "2M");
        assert_eq!(format_magnitude(7_200_000_000), "7.2B");
        assert_eq!(format_magnitude(-1500), "-1.5K");
        assert_eq!(format_magnitude(0), "0");
        assert_eq!(format_magnitude(1000), "1K");
    }

    #[test]
    fn formats_growth_edges() {
        assert_eq!(
            format_growth(Some(0.0)),
            (String::from("0%"), GrowthCategory::Neutral)
        );
        assert_eq!(
            format_growth(None),
            (String::from("+999%+"), GrowthCategory::Positive)
        );
        assert_eq!(
            format_growth(Some(1500.0)),
            (String::from("+999%+"), GrowthCategory::Positive)
        );
        assert_eq!(
            format_growth(Some(-42.3)),
            (String::from("-42%"), GrowthCategory::Negative)
        );
        assert_eq!(
            format_growth(Some(-1200.0)),
            (String::from("-999%+"), GrowthCategory::Negative)
        );
        assert_eq!(format_growth(Some(12.6)).0, "+13%");
    }

    #[test]
    fn maps_categories_to_colours() {
        assert_eq!(GrowthCategory::Positive.colour(), "green");
        assert_eq!(GrowthCategory::Negative.colour(), "red");
        assert_eq!(GrowthCategory::Neutral.colour(), "gray");
    }

    #[test]
    fn growth_from_zero_base() {
        assert_eq!(growth_between(0.0, 0.0), Some(0.0));
        assert_eq!(growth_between(0.0, 5.0), None);
        assert_eq!(growth_between(200.0, 250.0), Some(25.0));
        assert_eq!(growth_between(-100.0, -50.0), Some(50.0));
    }

    #[test]
    fn year_over_year_looks_back_twelve_months() {
        let start = SeriesDate::parse("01/15/2023").expect("date");
        let points = (0..14)
            .map(|i| {
                let date = start
                    .add_days(30 * i)
                    .period_end(Granularity::Monthly)
                    .expect("month end");
                TimePoint::new(date, 100.0 + 10.0 * i as f64)
            })
            .collect();
        let series =
            Series::new(Granularity::Monthly, SourceKind::SearchVolume, points).expect("series");

        // index 13 vs 1: 230 over 110
        let full = year_over_year(&series, false).expect("enough history");
        assert!((full.expect("bounded") - 109.0909).abs() < 1e-3);
        // index 12 vs 0: 220 over 100
        assert_eq!(year_over_year(&series, true), Some(Some(120.0)));

        let short = Series::new(
            Granularity::Monthly,
            SourceKind::SearchVolume,
            series.points()[..12].to_vec(),
        )
        .expect("series");
        assert_eq!(year_over_year(&short, false), None);
    }

    #[test]
    fn rounds_to_significant_figures() {
        assert_eq!(round_sig(123_456.0, 3), 123_000.0);
        assert_eq!(round_sig(0.012345, 3), 0.0123);
        assert_eq!(round_sig(0.0, 3), 0.0);
        assert_eq!(round_sig(-9.876, 2), -9.9);
    }
}
