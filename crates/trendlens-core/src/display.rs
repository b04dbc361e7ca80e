//! Display-only transforms: joining a projection onto history and scaling a
//! partial trailing period.

use serde::Serialize;

use crate::chart::{date_label, value_key, ChartRecord};
use crate::{Granularity, Series, SeriesDate, SourceKind, TimePoint, ValidationError};

/// A dated point of a spliced series. Historical points carry `actual`,
/// projected points carry `projected`, and the last historical point
/// carries both so the two chart segments meet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DisplayPoint {
    pub date: SeriesDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projected: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplaySeries {
    granularity: Granularity,
    kind: SourceKind,
    points: Vec<DisplayPoint>,
}

impl DisplaySeries {
    pub fn points(&self) -> &[DisplayPoint] {
        &self.points
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    /// History followed by the projection as one series.
    pub fn combined(&self) -> Series {
        let points = self
            .points
            .iter()
            .filter_map(|point| {
                point
                    .actual
                    .or(point.projected)
                    .map(|value| TimePoint::new(point.date, value))
            })
            .collect();
        Series::from_validated(self.granularity, self.kind, points)
    }

    pub fn chart_records(&self) -> Vec<ChartRecord> {
        let actual_key = value_key(self.kind, false);
        let projected_key = value_key(self.kind, true);

        self.points
            .iter()
            .map(|point| {
                let mut record =
                    ChartRecord::new(date_label(point.date, self.granularity, self.kind));
                if let Some(value) = point.actual {
                    record = record.with_value(actual_key.as_str(), value);
                }
                if let Some(value) = point.projected {
                    record = record.with_value(projected_key.as_str(), value);
                }
                record
            })
            .collect()
    }
}

/// Append an externally forecast `projected` series to `historical` for
/// charting. No forecasting happens here.
pub fn splice_for_display(
    historical: &Series,
    projected: &Series,
) -> Result<DisplaySeries, ValidationError> {
    if let (Some(last), Some(first)) = (historical.last(), projected.first()) {
        if first.date <= last.date {
            return Err(ValidationError::ProjectionOverlap {
                last_historical: last.date.format_mdy(),
            });
        }
    }

    let bridge = historical.len().saturating_sub(1);
    let mut points: Vec<DisplayPoint> = historical
        .points()
        .iter()
        .enumerate()
        .map(|(index, point)| DisplayPoint {
            date: point.date,
            actual: Some(point.value),
            projected: (index == bridge).then_some(point.value),
        })
        .collect();
    points.extend(projected.points().iter().map(|point| DisplayPoint {
        date: point.date,
        actual: None,
        projected: Some(point.value),
    }));

    Ok(DisplaySeries {
        granularity: historical.granularity(),
        kind: historical.kind(),
        points,
    })
}

/// Scale the last observation up to a full period when `as_of` falls inside
/// its still-running period. The estimate is dated at the period end.
///
/// Returns `None` when the period is already complete or `as_of` lies
/// outside it.
pub fn estimate_current_period(series: &Series, as_of: SeriesDate) -> Option<TimePoint> {
    let last = series.last()?;
    let granularity = series.granularity();
    let start = last.date.period_start(granularity).ok()?;
    let end = last.date.period_end(granularity).ok()?;
    if as_of < start || as_of >= end {
        return None;
    }

    let elapsed = start.days_until(as_of) + 1;
    let total = start.days_until(end) + 1;
    Some(TimePoint::new(
        end,
        last.value * total as f64 / elapsed as f64,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec;

    fn monthly(raw: &str) -> Series {
        codec::parse(raw, Granularity::Monthly, SourceKind::SearchVolume).expect("series")
    }

    #[test]
    fn bridges_history_and_projection() {
        let historical = monthly("01/31/2024: 100, 02/29/2024: 120");
        let projected = monthly("03/31/2024: 130, 04/30/2024: 140");
        let display = splice_for_display(&historical, &projected).expect("splice");

        let points = display.points();
        assert_eq!(points.len(), 4);
        assert_eq!(points[0].projected, None);
        assert_eq!(points[1].actual, Some(120.0));
        assert_eq!(points[1].projected, Some(120.0));
        assert_eq!(points[2].actual, None);
        assert_eq!(
            codec::format(&display.combined()),
            "01/31/2024: 100, 02/29/2024: 120, 03/31/2024: 130, 04/30/2024: 140"
        );

        let records = display.chart_records();
        assert_eq!(records[1].get("volume (estimated)"), Some(120.0));
        assert_eq!(records[3].get("volume"), None);
    }

    #[test]
    fn rejects_projection_overlapping_history() {
        let historical = monthly("01/31/2024: 100, 02/29/2024: 120");
        let projected = monthly("02/29/2024: 130");
        let err = splice_for_display(&historical, &projected).expect_err("overlap");
        assert_eq!(
            err,
            ValidationError::ProjectionOverlap {
                last_historical: String::from("02/29/2024")
            }
        );
    }

    #[test]
    fn scales_a_partial_month() {
        let series = monthly("01/31/2024: 100, 02/29/2024: 50");
        let as_of = SeriesDate::parse("02/10/2024").expect("date");
        let estimate = estimate_current_period(&series, as_of).expect("partial");
        assert_eq!(estimate.date.format_mdy(), "02/29/2024");
        assert!((estimate.value - 145.0).abs() < 1e-9);
    }

    #[test]
    fn leaves_complete_periods_alone() {
        let series = monthly("01/31/2024: 100");
        let as_of = SeriesDate::parse("01/31/2024").expect("date");
        assert!(estimate_current_period(&series, as_of).is_none());
        let later = SeriesDate::parse("03/01/2024").expect("date");
        assert!(estimate_current_period(&series, later).is_none());
    }

    #[test]
    fn week_at_the_calendar_edge_has_no_estimate() {
        let series = codec::parse("12/31/9999: 40", Granularity::Weekly, SourceKind::SocialViews)
            .expect("series");
        let as_of = SeriesDate::parse("12/31/9999").expect("date");
        assert!(estimate_current_period(&series, as_of).is_none());
    }
}
