//! Pearson correlation between aligned price and interest values.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{AlignedPair, EntityId, SeriesDate, ValidationError};

/// Trailing window used for the short-term correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Window {
    Days(u32),
    Weeks(u32),
    Months(u32),
}

impl Default for Window {
    fn default() -> Self {
        Self::Months(2)
    }
}

impl Window {
    /// Earliest date kept when the latest observation is `latest`, or
    /// `None` when the window reaches past the start of the calendar and
    /// therefore keeps everything.
    pub fn start_from(self, latest: SeriesDate) -> Option<SeriesDate> {
        match self {
            Self::Days(n) => latest.checked_add_days(-i64::from(n)),
            Self::Weeks(n) => latest.checked_add_days(-7 * i64::from(n)),
            Self::Months(n) => latest.sub_months(n),
        }
    }
}

impl Display for Window {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Days(n) => write!(f, "{n}d"),
            Self::Weeks(n) => write!(f, "{n}w"),
            Self::Months(n) => write!(f, "{n}m"),
        }
    }
}

impl FromStr for Window {
    type Err = ValidationError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidWindow {
            value: input.to_owned(),
        };

        let normalized = input.trim().to_ascii_lowercase();
        let split = normalized
            .find(|ch: char| !ch.is_ascii_digit())
            .ok_or_else(invalid)?;
        let (count, unit) = normalized.split_at(split);
        let count: u32 = count.parse().map_err(|_| invalid())?;
        if count == 0 {
            return Err(invalid());
        }

        match unit.trim() {
            "d" | "day" | "days" => Ok(Self::Days(count)),
            "w" | "week" | "weeks" => Ok(Self::Weeks(count)),
            "m" | "mo" | "month" | "months" => Ok(Self::Months(count)),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Window {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Window> for String {
    fn from(value: Window) -> Self {
        value.to_string()
    }
}

/// Long- and short-term correlation for one entity. `None` means the
/// coefficient is undefined for that window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationResult {
    pub entity: EntityId,
    pub long_term: Option<f64>,
    pub short_term: Option<f64>,
    pub short_window: Window,
    pub long_term_points: usize,
    pub short_term_points: usize,
}

/// Pearson coefficient of positionally paired values.
///
/// Pairs with a non-finite side are dropped. Returns `None` when fewer than
/// two pairs remain or either side is constant; otherwise the coefficient
/// clamped to `[-1, 1]` and rounded to two decimals.
pub fn safe_correlation(x: &[f64], y: &[f64]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(a, b)| (*a, *b))
        .collect();
    if pairs.len() < 2
        || is_constant(pairs.iter().map(|p| p.0))
        || is_constant(pairs.iter().map(|p| p.1))
    {
        return None;
    }

    let count = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / count;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / count;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (a, b) in &pairs {
        let (dx, dy) = (a - mean_x, b - mean_y);
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denominator = (var_x * var_y).sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        return None;
    }

    let r = (cov / denominator).clamp(-1.0, 1.0);
    Some((r * 100.0).round() / 100.0)
}

fn is_constant(mut values: impl Iterator<Item = f64>) -> bool {
    match values.next() {
        Some(first) => values.all(|value| value == first),
        None => true,
    }
}

/// Correlate price (`left`) against interest (`right`) over the whole pair
/// and over the trailing `short_window`.
pub fn correlate(entity: &EntityId, aligned: &AlignedPair, short_window: Window) -> CorrelationResult {
    let long_term = safe_correlation(&aligned.left_values(), &aligned.right_values());

    let start = aligned
        .dates()
        .last()
        .and_then(|latest| short_window.start_from(latest));
    let recent = match start {
        Some(start) => aligned.since(start),
        None => aligned.clone(),
    };
    let short_term = safe_correlation(&recent.left_values(), &recent.right_values());

    CorrelationResult {
        entity: entity.clone(),
        long_term,
        short_term,
        short_window,
        long_term_points: aligned.len(),
        short_term_points: recent.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SourceKind, TimePoint};

    fn pair(dates: &[&str], left: &[f64], right: &[f64]) -> AlignedPair {
        let points = |values: &[f64]| -> Vec<TimePoint> {
            dates
                .iter()
                .zip(values)
                .map(|(d, v)| TimePoint::new(SeriesDate::parse(d).expect("date"), *v))
                .collect()
        };
        AlignedPair::new(SourceKind::Price, SourceKind::SearchVolume, points(left), points(right))
            .expect("pair")
    }

    #[test]
    fn perfectly_linear_series_correlate_to_one() {
        assert_eq!(safe_correlation(&[1.0, 2.0, 3.0], &[10.0, 20.0, 30.0]), Some(1.0));
        assert_eq!(safe_correlation(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]), Some(-1.0));
    }

    #[test]
    fn rounds_to_two_decimals() {
        let r = safe_correlation(&[1.0, 2.0, 3.0, 4.0], &[1.0, 3.0, 2.0, 4.0]).expect("defined");
        assert_eq!(r, 0.8);
    }

    #[test]
    fn constant_side_is_undefined() {
        assert_eq!(safe_correlation(&[5.0, 5.0, 5.0], &[1.0, 2.0, 3.0]), None);
        assert_eq!(safe_correlation(&[1.0, 2.0, 3.0], &[7.0, 7.0, 7.0]), None);
    }

    #[test]
    fn drops_non_finite_pairs_before_counting() {
        let x = [1.0, f64::NAN, 3.0];
        let y = [2.0, 4.0, f64::INFINITY];
        assert_eq!(safe_correlation(&x, &y), None);

        let x = [1.0, f64::NAN, 2.0, 3.0];
        let y = [1.0, 9.0, 2.0, 3.0];
        assert_eq!(safe_correlation(&x, &y), Some(1.0));
    }

    #[test]
    fn short_window_keeps_trailing_months() {
        let aligned = pair(
            &["01/31/2024", "02/29/2024", "03/29/2024", "04/30/2024"],
            &[1.0, 2.0, 3.0, 4.0],
            &[50.0, 20.0, 30.0, 40.0],
        );
        let entity = EntityId::parse("AAPL").expect("entity");
        let result = correlate(&entity, &aligned, Window::Months(2));
        assert_eq!(result.short_term_points, 3);
        assert_eq!(result.long_term_points, 4);
        assert!(result.long_term.is_some());
        assert_eq!(result.short_term, Some(1.0));
    }

    #[test]
    fn short_window_with_one_point_is_undefined() {
        let aligned = pair(&["01/01/2024", "06/01/2024"], &[1.0, 2.0], &[3.0, 4.0]);
        let entity = EntityId::parse("nvda").expect("entity");
        let result = correlate(&entity, &aligned, Window::Days(10));
        assert_eq!(result.long_term, Some(1.0));
        assert_eq!(result.short_term, None);
    }

    #[test]
    fn window_longer_than_the_calendar_keeps_every_point() {
        let aligned = pair(
            &["01/31/2024", "02/29/2024", "03/29/2024", "04/30/2024"],
            &[1.0, 2.0, 3.0, 4.0],
            &[50.0, 20.0, 30.0, 40.0],
        );
        let entity = EntityId::parse("AAPL").expect("entity");

        for raw in ["200000m", "4294967295d", "4294967295w"] {
            let window: Window = raw.parse().expect("window");
            let latest = aligned.dates().last().expect("latest");
            assert_eq!(window.start_from(latest), None, "{raw}");

            let result = correlate(&entity, &aligned, window);
            assert_eq!(result.short_term_points, 4, "{raw}");
            assert_eq!(result.short_term, result.long_term, "{raw}");
        }
    }

    #[test]
    fn parses_window_strings() {
        assert_eq!("2m".parse::<Window>().expect("2m"), Window::Months(2));
        assert_eq!("3 weeks".parse::<Window>().expect("weeks"), Window::Weeks(3));
        assert_eq!("45D".parse::<Window>().expect("days"), Window::Days(45));
        for raw in ["", "m", "0d", "2y", "-1m"] {
            assert!(raw.parse::<Window>().is_err(), "{raw}");
        }
        assert_eq!(Window::default().to_string(), "2m");
    }
}
