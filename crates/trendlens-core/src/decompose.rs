//! Additive seasonal-trend decomposition (STL) of a single series.
//!
//! The fit follows Cleveland et al. (1990) without robustness iterations:
//! each inner pass smooths the cycle-subseries, removes their low-frequency
//! content, and re-estimates the trend from the deseasonalized data.

use serde::{Deserialize, Serialize};

use crate::loess::{fit_at, moving_average, smooth};
use crate::{CoreError, Series, SeriesDate, TimePoint, ValidationError};

/// Loess spans and pass count for [`decompose_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StlConfig {
    pub seasonal_span: usize,
    pub inner_iterations: usize,
    pub trend_span: Option<usize>,
    pub low_pass_span: Option<usize>,
}

impl Default for StlConfig {
    fn default() -> Self {
        Self {
            seasonal_span: 7,
            inner_iterations: 2,
            trend_span: None,
            low_pass_span: None,
        }
    }
}

impl StlConfig {
    /// Smallest odd span `>= 1.5 * period / (1 - 1.5 / seasonal_span)`.
    pub fn trend_span_for(&self, period: usize) -> usize {
        self.trend_span.unwrap_or_else(|| {
            let raw = 1.5 * period as f64 / (1.0 - 1.5 / self.seasonal_span as f64);
            next_odd(raw.ceil() as usize)
        })
    }

    /// Smallest odd span greater than `period`.
    pub fn low_pass_span_for(&self, period: usize) -> usize {
        self.low_pass_span
            .unwrap_or_else(|| next_odd(period + 1))
    }

    fn validate(&self, period: usize) -> Result<(), ValidationError> {
        for span in [
            self.seasonal_span,
            self.trend_span_for(period),
            self.low_pass_span_for(period),
        ] {
            if span < 3 || span % 2 == 0 {
                return Err(ValidationError::InvalidSpan { value: span });
            }
        }
        Ok(())
    }
}

fn next_odd(value: usize) -> usize {
    if value % 2 == 0 {
        value + 1
    } else {
        value
    }
}

/// Observed, trend, seasonal and residual components over one date index,
/// plus momentum (first difference of the trend, dated at the later point).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decomposition {
    period: usize,
    observed: Series,
    trend: Series,
    seasonal: Series,
    residual: Series,
    momentum: Series,
}

/// One date of a [`Decomposition`], used for tabular output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DecompositionRow {
    pub date: SeriesDate,
    pub observed: f64,
    pub trend: f64,
    pub seasonal: f64,
    pub residual: f64,
    pub momentum: Option<f64>,
}

impl Decomposition {
    pub fn period(&self) -> usize {
        self.period
    }

    pub fn observed(&self) -> &Series {
        &self.observed
    }

    pub fn trend(&self) -> &Series {
        &self.trend
    }

    pub fn seasonal(&self) -> &Series {
        &self.seasonal
    }

    pub fn residual(&self) -> &Series {
        &self.residual
    }

    pub fn momentum(&self) -> &Series {
        &self.momentum
    }

    pub fn len(&self) -> usize {
        self.observed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }

    pub fn rows(&self) -> Vec<DecompositionRow> {
        let observed = self.observed.points();
        let trend = self.trend.points();
        let seasonal = self.seasonal.points();
        let residual = self.residual.points();

        (0..observed.len())
            .map(|i| DecompositionRow {
                date: observed[i].date,
                observed: observed[i].value,
                trend: trend[i].value,
                seasonal: seasonal[i].value,
                residual: residual[i].value,
                momentum: i
                    .checked_sub(1)
                    .and_then(|prev| self.momentum.points().get(prev))
                    .map(|point| point.value),
            })
            .collect()
    }

    /// Every component rounded to a whole number, momentum recomputed from
    /// the rounded trend.
    pub fn rounded(&self) -> Self {
        let round = |series: &Series| {
            let points = series
                .points()
                .iter()
                .map(|point| TimePoint::new(point.date, point.value.round()))
                .collect();
            Series::from_validated(series.granularity(), series.kind(), points)
        };

        let trend = round(&self.trend);
        Self {
            period: self.period,
            observed: round(&self.observed),
            momentum: momentum_of(&trend),
            trend,
            seasonal: round(&self.seasonal),
            residual: round(&self.residual),
        }
    }
}

/// Decompose with the default [`StlConfig`].
pub fn decompose(series: &Series, period: usize) -> Result<Decomposition, CoreError> {
    decompose_with(series, period, &StlConfig::default())
}

pub fn decompose_with(
    series: &Series,
    period: usize,
    config: &StlConfig,
) -> Result<Decomposition, CoreError> {
    if period < 2 {
        return Err(ValidationError::InvalidPeriod { value: period }.into());
    }
    let required = period
        .checked_mul(2)
        .ok_or(ValidationError::InvalidPeriod { value: period })?;
    if series.len() < required {
        return Err(CoreError::InsufficientData {
            required,
            actual: series.len(),
        });
    }
    config.validate(period)?;

    let y = series.values();
    let n = y.len();
    let trend_span = config.trend_span_for(period);
    let low_pass_span = config.low_pass_span_for(period);

    let mut trend = vec![0.0; n];
    let mut seasonal = vec![0.0; n];
    for _ in 0..config.inner_iterations.max(1) {
        let detrended: Vec<f64> = y.iter().zip(&trend).map(|(v, t)| v - t).collect();
        let cycle = smooth_cycle_subseries(&detrended, period, config.seasonal_span);
        let low_pass = low_pass_filter(&cycle, period, low_pass_span);
        seasonal = (0..n).map(|i| cycle[period + i] - low_pass[i]).collect();

        let deseasonalized: Vec<f64> = y.iter().zip(&seasonal).map(|(v, s)| v - s).collect();
        trend = smooth(&deseasonalized, trend_span);
    }
    let residual: Vec<f64> = (0..n).map(|i| y[i] - trend[i] - seasonal[i]).collect();

    let component = |values: Vec<f64>| {
        let points = series
            .points()
            .iter()
            .zip(values)
            .map(|(point, value)| TimePoint::new(point.date, value))
            .collect();
        Series::new(series.granularity(), series.kind(), points)
    };

    let trend = component(trend)?;
    Ok(Decomposition {
        period,
        observed: series.clone(),
        momentum: momentum_of(&trend),
        trend,
        seasonal: component(seasonal)?,
        residual: component(residual)?,
    })
}

fn momentum_of(trend: &Series) -> Series {
    let points = trend
        .points()
        .windows(2)
        .map(|pair| TimePoint::new(pair[1].date, pair[1].value - pair[0].value))
        .collect();
    Series::from_validated(trend.granularity(), trend.kind(), points)
}

// Smooths each cycle-subseries and extends it by one cycle on both ends, so
// the result has `n + 2 * period` values and index `period + i` lines up
// with input position `i`.
fn smooth_cycle_subseries(values: &[f64], period: usize, span: usize) -> Vec<f64> {
    let n = values.len();
    let mut cycle = vec![0.0; n + 2 * period];

    for phase in 0..period {
        let sub: Vec<f64> = values.iter().skip(phase).step_by(period).copied().collect();
        let k = sub.len();
        let fitted = smooth(&sub, span);

        let head_right = span.min(k) - 1;
        let head = fit_at(&sub, span, -1.0, 0, head_right).unwrap_or(fitted[0]);
        let tail_left = k.saturating_sub(span);
        let tail = fit_at(&sub, span, k as f64, tail_left, k - 1).unwrap_or(fitted[k - 1]);

        cycle[phase] = head;
        for (m, value) in fitted.into_iter().enumerate() {
            cycle[(m + 1) * period + phase] = value;
        }
        cycle[(k + 1) * period + phase] = tail;
    }

    cycle
}

fn low_pass_filter(cycle: &[f64], period: usize, span: usize) -> Vec<f64> {
    let averaged = moving_average(&moving_average(&moving_average(cycle, period), period), 3);
    smooth(&averaged, span)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Granularity, SourceKind};

    fn series(values: &[f64]) -> Series {
        let start = SeriesDate::parse("01/01/2024").expect("date");
        let points = values
            .iter()
            .enumerate()
            .map(|(i, value)| TimePoint::new(start.add_days(i as i64), *value))
            .collect();
        Series::new(Granularity::Daily, SourceKind::SearchVolume, points).expect("series")
    }

    fn seasonal_values(len: usize) -> Vec<f64> {
        let pattern = [5.0, -3.0, -2.0];
        (0..len)
            .map(|i| 100.0 + 4.0 * i as f64 + pattern[i % 3])
            .collect()
    }

    #[test]
    fn default_spans_match_period() {
        let config = StlConfig::default();
        assert_eq!(config.trend_span_for(3), 7);
        assert_eq!(config.low_pass_span_for(3), 5);
        assert_eq!(config.trend_span_for(7), 15);
        assert_eq!(config.low_pass_span_for(7), 9);
        assert_eq!(config.trend_span_for(12), 23);
    }

    #[test]
    fn components_sum_to_observed() {
        let input = series(&seasonal_values(24));
        let result = decompose(&input, 3).expect("decompose");
        assert_eq!(result.len(), 24);
        for row in result.rows() {
            let sum = row.trend + row.seasonal + row.residual;
            assert!((sum - row.observed).abs() < 1e-9, "{row:?}");
        }
    }

    #[test]
    fn rounded_components_stay_within_tolerance() {
        let values = [1000.0, 1100.0, 1050.0, 1200.0, 1300.0, 1250.0];
        let result = decompose(&series(&values), 3).expect("decompose").rounded();
        for row in result.rows() {
            assert_eq!(row.trend.fract(), 0.0);
            assert!((row.trend + row.seasonal + row.residual - row.observed).abs() <= 3.0);
        }
        let trend = result.trend().values();
        assert_eq!(result.momentum().values()[0], trend[1] - trend[0]);
    }

    #[test]
    fn recovers_a_periodic_pattern() {
        let result = decompose(&series(&seasonal_values(30)), 3).expect("decompose");
        let seasonal = result.seasonal().values();
        for i in 6..24 {
            assert_eq!(seasonal[i] > 0.0, i % 3 == 0, "phase {i}: {seasonal:?}");
        }
    }

    #[test]
    fn momentum_is_one_shorter_and_dated_at_the_later_point() {
        let input = series(&seasonal_values(12));
        let result = decompose(&input, 3).expect("decompose");
        assert_eq!(result.momentum().len(), 11);
        assert_eq!(
            result.momentum().first().expect("first").date,
            input.points()[1].date
        );
        assert!(result.rows()[0].momentum.is_none());
        assert!(result.rows()[1].momentum.is_some());
    }

    #[test]
    fn requires_two_full_cycles() {
        let err = decompose(&series(&[1.0, 2.0, 3.0, 4.0, 5.0]), 3).expect_err("too short");
        assert!(matches!(
            err,
            CoreError::InsufficientData {
                required: 6,
                actual: 5
            }
        ));
    }

    #[test]
    fn period_too_large_to_double_is_invalid() {
        let input = series(&seasonal_values(12));
        let period = usize::MAX / 2 + 1;
        let err = decompose(&input, period).expect_err("overflowing period");
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::InvalidPeriod { value }) if value == period
        ));
    }

    #[test]
    fn rejects_degenerate_period_and_even_spans() {
        let input = series(&seasonal_values(12));
        let err = decompose(&input, 1).expect_err("period");
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::InvalidPeriod { value: 1 })
        ));

        let config = StlConfig {
            seasonal_span: 6,
            ..StlConfig::default()
        };
        let err = decompose_with(&input, 3, &config).expect_err("span");
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::InvalidSpan { value: 6 })
        ));
    }
}
