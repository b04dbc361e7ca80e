//! Down-sampling to a coarser cadence.

use serde::{Deserialize, Serialize};

use crate::{Granularity, Series, TimePoint, ValidationError};

/// How the points of one period collapse into a single value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    First,
    #[default]
    Last,
    Min,
    Max,
    Sum,
    Mean,
}

impl Aggregation {
    fn apply(self, values: &[f64]) -> f64 {
        match self {
            Self::First => values[0],
            Self::Last => values[values.len() - 1],
            Self::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            Self::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Self::Sum => values.iter().sum(),
            Self::Mean => values.iter().sum::<f64>() / values.len() as f64,
        }
    }
}

/// One point per non-empty `target` period, dated at the period end.
pub fn resample(
    series: &Series,
    target: Granularity,
    aggregation: Aggregation,
) -> Result<Series, ValidationError> {
    if target < series.granularity() {
        return Err(ValidationError::InvalidResample {
            from: series.granularity().to_string(),
            to: target.to_string(),
        });
    }

    let mut points: Vec<TimePoint> = Vec::new();
    let mut bucket: Vec<f64> = Vec::new();
    let mut current = None;

    for point in series.points() {
        let end = point.date.period_end(target)?;
        if let Some(open) = current.filter(|open| *open != end) {
            points.push(TimePoint::new(open, aggregation.apply(&bucket)));
            bucket.clear();
        }
        current = Some(end);
        bucket.push(point.value);
    }
    if let Some(open) = current {
        points.push(TimePoint::new(open, aggregation.apply(&bucket)));
    }

    Series::new(target, series.kind(), points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{codec, SourceKind};

    fn daily(raw: &str) -> Series {
        codec::parse(raw, Granularity::Daily, SourceKind::Price).expect("series")
    }

    #[test]
    fn collapses_days_into_month_ends() {
        let prices = daily("01/30/2024: 10, 01/31/2024: 12, 02/01/2024: 11, 02/15/2024: 15");
        let last = resample(&prices, Granularity::Monthly, Aggregation::Last).expect("resample");
        assert_eq!(codec::format(&last), "01/31/2024: 12, 02/29/2024: 15");

        let mean = resample(&prices, Granularity::Monthly, Aggregation::Mean).expect("resample");
        assert_eq!(mean.values(), vec![11.0, 13.0]);

        let max = resample(&prices, Granularity::Monthly, Aggregation::Max).expect("resample");
        assert_eq!(max.values(), vec![12.0, 15.0]);
    }

    #[test]
    fn groups_weeks_monday_to_sunday() {
        // 01/07/2024 is a Sunday, 01/08/2024 a Monday.
        let prices = daily("01/05/2024: 1, 01/07/2024: 2, 01/08/2024: 3");
        let weekly = resample(&prices, Granularity::Weekly, Aggregation::Sum).expect("resample");
        assert_eq!(codec::format(&weekly), "01/07/2024: 3, 01/14/2024: 3");
    }

    #[test]
    fn week_past_the_calendar_edge_is_an_error() {
        let prices = daily("12/30/9999: 1, 12/31/9999: 2");
        let err = resample(&prices, Granularity::Weekly, Aggregation::Last).expect_err("edge");
        assert!(matches!(err, ValidationError::DateOutOfRange { .. }));

        let monthly = resample(&prices, Granularity::Monthly, Aggregation::Last).expect("month");
        assert_eq!(codec::format(&monthly), "12/31/9999: 2");
    }

    #[test]
    fn refuses_to_upsample() {
        let monthly = codec::parse("01/31/2024: 1", Granularity::Monthly, SourceKind::SearchVolume)
            .expect("series");
        let err = resample(&monthly, Granularity::Daily, Aggregation::First).expect_err("finer");
        assert!(matches!(err, ValidationError::InvalidResample { .. }));
    }
}
