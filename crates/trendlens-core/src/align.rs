//! Date snapping and joining of differently-sampled series.
//!
//! Snapping replaces dates only; values are never interpolated.

use serde::{Deserialize, Serialize};

use crate::{CoreError, Series, SeriesDate, SnappedSeries, SourceKind, TimePoint, ValidationError};

/// Which side is moved onto the other side's calendar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlignDirection {
    /// Interest dates snap onto trading days of the price series.
    #[default]
    InterestOntoPrice,
    /// Price dates snap onto the interest series' period ends.
    PriceOntoInterest,
}

/// Two equal-length sequences over one shared, non-decreasing date index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedPair {
    left_kind: SourceKind,
    right_kind: SourceKind,
    left: Vec<TimePoint>,
    right: Vec<TimePoint>,
}

impl AlignedPair {
    pub fn new(
        left_kind: SourceKind,
        right_kind: SourceKind,
        left: Vec<TimePoint>,
        right: Vec<TimePoint>,
    ) -> Result<Self, ValidationError> {
        if left.len() != right.len() {
            return Err(ValidationError::MisalignedPair {
                index: left.len().min(right.len()),
            });
        }
        if let Some(index) = left.iter().zip(&right).position(|(l, r)| l.date != r.date) {
            return Err(ValidationError::MisalignedPair { index });
        }
        if let Some(index) = left.windows(2).position(|pair| pair[0].date > pair[1].date) {
            return Err(ValidationError::DatesOutOfOrder { index: index + 1 });
        }

        Ok(Self {
            left_kind,
            right_kind,
            left,
            right,
        })
    }

    pub fn left(&self) -> &[TimePoint] {
        &self.left
    }

    pub fn right(&self) -> &[TimePoint] {
        &self.right
    }

    pub fn left_kind(&self) -> SourceKind {
        self.left_kind
    }

    pub fn right_kind(&self) -> SourceKind {
        self.right_kind
    }

    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    pub fn dates(&self) -> impl Iterator<Item = SeriesDate> + '_ {
        self.left.iter().map(|point| point.date)
    }

    pub fn left_values(&self) -> Vec<f64> {
        self.left.iter().map(|point| point.value).collect()
    }

    pub fn right_values(&self) -> Vec<f64> {
        self.right.iter().map(|point| point.value).collect()
    }

    /// Rows whose date is on or after `start`.
    pub fn since(&self, start: SeriesDate) -> Self {
        let from = self.left.partition_point(|point| point.date < start);
        Self {
            left_kind: self.left_kind,
            right_kind: self.right_kind,
            left: self.left[from..].to_vec(),
            right: self.right[from..].to_vec(),
        }
    }
}

/// Replace every date of `source` with the nearest date of `reference`.
///
/// Dates before the reference range snap to its first date and dates after
/// it to its last. Between two reference dates the smaller day distance
/// wins; an exact tie goes to the earlier reference date.
pub fn snap(source: &Series, reference: &Series) -> SnappedSeries {
    let calendar: Vec<SeriesDate> = reference.dates().collect();
    let points = if calendar.is_empty() {
        Vec::new()
    } else {
        source
            .points()
            .iter()
            .map(|point| TimePoint::new(nearest(&calendar, point.date), point.value))
            .collect()
    };

    SnappedSeries::new(reference.granularity(), source.kind(), points)
        .expect("snapping a sorted series onto a sorted calendar keeps dates ordered")
}

fn nearest(calendar: &[SeriesDate], date: SeriesDate) -> SeriesDate {
    let pos = calendar.partition_point(|candidate| *candidate < date);
    if pos == 0 {
        return calendar[0];
    }
    if pos == calendar.len() {
        return calendar[calendar.len() - 1];
    }

    let before = calendar[pos - 1];
    let after = calendar[pos];
    if before.days_until(date) <= date.days_until(after) {
        before
    } else {
        after
    }
}

/// Inner join on date. Every left row pairs with every right row carrying
/// the same date; dates found on one side only are dropped.
pub fn join(left: &SnappedSeries, right: &SnappedSeries) -> Result<AlignedPair, CoreError> {
    let (l, r) = (left.points(), right.points());
    let mut left_rows = Vec::new();
    let mut right_rows = Vec::new();

    let (mut i, mut j) = (0, 0);
    while i < l.len() && j < r.len() {
        match l[i].date.cmp(&r[j].date) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                let date = l[i].date;
                let left_end = i + l[i..].iter().take_while(|p| p.date == date).count();
                let right_end = j + r[j..].iter().take_while(|p| p.date == date).count();
                for left_point in &l[i..left_end] {
                    for right_point in &r[j..right_end] {
                        left_rows.push(*left_point);
                        right_rows.push(*right_point);
                    }
                }
                i = left_end;
                j = right_end;
            }
        }
    }

    if left_rows.is_empty() {
        return Err(CoreError::EmptyAlignment);
    }

    Ok(AlignedPair::new(
        left.kind(),
        right.kind(),
        left_rows,
        right_rows,
    )?)
}

/// Snap one side onto the other and join. The price side is always `left`.
pub fn align(
    price: &Series,
    interest: &Series,
    direction: AlignDirection,
) -> Result<AlignedPair, CoreError> {
    match direction {
        AlignDirection::InterestOntoPrice => {
            let snapped = snap(interest, price);
            join(&SnappedSeries::from(price), &snapped)
        }
        AlignDirection::PriceOntoInterest => {
            let snapped = snap(price, interest);
            join(&snapped, &SnappedSeries::from(interest))
        }
    }
}
