use serde::{Deserialize, Serialize};

use crate::{Granularity, SeriesDate, SourceKind, ValidationError};

/// One dated observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    pub date: SeriesDate,
    pub value: f64,
}

impl TimePoint {
    pub const fn new(date: SeriesDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Ordered observations with strictly increasing, unique dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SeriesRecord")]
pub struct Series {
    granularity: Granularity,
    kind: SourceKind,
    points: Vec<TimePoint>,
}

impl Series {
    pub fn new(
        granularity: Granularity,
        kind: SourceKind,
        points: Vec<TimePoint>,
    ) -> Result<Self, ValidationError> {
        validate_finite(&points)?;
        if let Some(index) = first_violation(&points, |prev, next| prev < next) {
            return Err(ValidationError::DatesNotIncreasing { index });
        }

        Ok(Self {
            granularity,
            kind,
            points,
        })
    }

    /// Caller guarantees strictly increasing dates and finite values.
    pub(crate) fn from_validated(
        granularity: Granularity,
        kind: SourceKind,
        points: Vec<TimePoint>,
    ) -> Self {
        debug_assert!(Self::new(granularity, kind, points.clone()).is_ok());
        Self {
            granularity,
            kind,
            points,
        }
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    pub fn points(&self) -> &[TimePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&TimePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&TimePoint> {
        self.points.last()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|point| point.value).collect()
    }

    pub fn dates(&self) -> impl Iterator<Item = SeriesDate> + '_ {
        self.points.iter().map(|point| point.date)
    }

    pub fn value_at(&self, date: SeriesDate) -> Option<f64> {
        self.points
            .binary_search_by(|point| point.date.cmp(&date))
            .ok()
            .map(|index| self.points[index].value)
    }

    /// Copy without the most recent observation, typically an incomplete
    /// trailing period.
    pub fn without_latest(&self) -> Self {
        let keep = self.points.len().saturating_sub(1);
        Self {
            granularity: self.granularity,
            kind: self.kind,
            points: self.points[..keep].to_vec(),
        }
    }

    pub fn into_points(self) -> Vec<TimePoint> {
        self.points
    }
}

#[derive(Deserialize)]
struct SeriesRecord {
    granularity: Granularity,
    kind: SourceKind,
    points: Vec<TimePoint>,
}

impl TryFrom<SeriesRecord> for Series {
    type Error = ValidationError;

    fn try_from(value: SeriesRecord) -> Result<Self, Self::Error> {
        Self::new(value.granularity, value.kind, value.points)
    }
}

/// Observations whose dates were replaced by dates of another series.
///
/// Several points may share a date, so dates are only non-decreasing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnappedSeries {
    granularity: Granularity,
    kind: SourceKind,
    points: Vec<TimePoint>,
}

impl SnappedSeries {
    pub fn new(
        granularity: Granularity,
        kind: SourceKind,
        points: Vec<TimePoint>,
    ) -> Result<Self, ValidationError> {
        validate_finite(&points)?;
        if let Some(index) = first_violation(&points, |prev, next| prev <= next) {
            return Err(ValidationError::DatesOutOfOrder { index });
        }

        Ok(Self {
            granularity,
            kind,
            points,
        })
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    pub fn points(&self) -> &[TimePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl From<Series> for SnappedSeries {
    fn from(value: Series) -> Self {
        Self {
            granularity: value.granularity,
            kind: value.kind,
            points: value.points,
        }
    }
}

impl From<&Series> for SnappedSeries {
    fn from(value: &Series) -> Self {
        Self::from(value.clone())
    }
}

fn validate_finite(points: &[TimePoint]) -> Result<(), ValidationError> {
    match points.iter().position(|point| !point.value.is_finite()) {
        Some(index) => Err(ValidationError::NonFiniteValue { index }),
        None => Ok(()),
    }
}

fn first_violation(
    points: &[TimePoint],
    ordered: impl Fn(SeriesDate, SeriesDate) -> bool,
) -> Option<usize> {
    points
        .windows(2)
        .position(|pair| !ordered(pair[0].date, pair[1].date))
        .map(|index| index + 1)
}
