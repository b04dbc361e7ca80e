//! End-to-end analysis of one entity: parse, normalize, align, decompose,
//! correlate, format.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::align::{align, AlignDirection};
use crate::chart::{chart_records, ChartRecord};
use crate::correlation::{correlate, CorrelationResult, Window};
use crate::decompose::{decompose_with, Decomposition, StlConfig};
use crate::display::splice_for_display;
use crate::format::{format_growth, format_magnitude, year_over_year, GrowthCategory};
use crate::resample::{resample, Aggregation};
use crate::{codec, CoreError, EntityId, Granularity, Series, SeriesDate, SourceKind};

/// Raw inputs for one entity, as delivered by the storage layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub entity: EntityId,
    pub interest_raw: String,
    pub price_raw: String,
    pub granularity: Granularity,
    pub interest_kind: SourceKind,
    /// Externally forecast continuation of the interest series.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projected_raw: Option<String>,
}

impl AnalysisRequest {
    pub fn new(
        entity: EntityId,
        interest_raw: impl Into<String>,
        price_raw: impl Into<String>,
        granularity: Granularity,
        interest_kind: SourceKind,
    ) -> Self {
        Self {
            entity,
            interest_raw: interest_raw.into(),
            price_raw: price_raw.into(),
            granularity,
            interest_kind,
            projected_raw: None,
        }
    }

    pub fn with_projection(mut self, projected_raw: impl Into<String>) -> Self {
        self.projected_raw = Some(projected_raw.into());
        self
    }
}

/// Tunables shared by every request of a run. Missing JSON fields take
/// their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub short_window: Window,
    pub align_direction: AlignDirection,
    /// Seasonal period override; the granularity's default otherwise.
    pub period: Option<usize>,
    /// Drop the newest interest point before decomposition and growth.
    pub exclude_partial_period: bool,
    /// Collapse daily prices to the interest cadence before alignment.
    pub resample_price: Option<Aggregation>,
    pub stl: StlConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            short_window: Window::default(),
            align_direction: AlignDirection::default(),
            period: None,
            exclude_partial_period: false,
            resample_price: None,
            stl: StlConfig::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn period_for(&self, granularity: Granularity) -> usize {
        self.period.unwrap_or_else(|| granularity.default_period())
    }
}

/// Year-over-year growth of the latest considered point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", content = "percent", rename_all = "kebab-case")]
pub enum YoyGrowth {
    /// Less than a year of history.
    Unavailable,
    /// Growth from a zero base.
    Unbounded,
    Finite(f64),
}

impl YoyGrowth {
    pub fn from_lookback(value: Option<Option<f64>>) -> Self {
        match value {
            None => Self::Unavailable,
            Some(None) => Self::Unbounded,
            Some(Some(pct)) => Self::Finite(pct),
        }
    }

    pub fn percent(self) -> Option<f64> {
        match self {
            Self::Finite(pct) => Some(pct),
            _ => None,
        }
    }

    /// Display text and category, or `None` without enough history.
    pub fn label(self) -> Option<(String, GrowthCategory)> {
        match self {
            Self::Unavailable => None,
            Self::Unbounded => Some(format_growth(None)),
            Self::Finite(pct) => Some(format_growth(Some(pct))),
        }
    }
}

/// Card-level figures for one entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSummary {
    pub entity: EntityId,
    pub latest_date: SeriesDate,
    pub latest_value: f64,
    pub magnitude: String,
    pub yoy: YoyGrowth,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub growth_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub growth_category: Option<GrowthCategory>,
}

impl TrendSummary {
    /// Summarize `series`; `skip_latest` ignores its newest point.
    pub fn from_series(entity: EntityId, series: &Series, skip_latest: bool) -> Option<Self> {
        let considered = if skip_latest && series.len() > 1 {
            series.points().get(series.len() - 2)
        } else {
            series.last()
        }?;

        let yoy = YoyGrowth::from_lookback(year_over_year(series, skip_latest));
        let label = yoy.label();
        Some(Self {
            entity,
            latest_date: considered.date,
            latest_value: considered.value,
            magnitude: format_magnitude(considered.value.round() as i64),
            yoy,
            growth_category: label.as_ref().map(|(_, category)| *category),
            growth_label: label.map(|(text, _)| text),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendReport {
    pub entity: EntityId,
    pub granularity: Granularity,
    pub interest_kind: SourceKind,
    /// Interest series with dates moved to their period end.
    pub interest: Series,
    /// Decomposition with every component rounded to whole numbers.
    pub decomposition: Decomposition,
    pub correlation: CorrelationResult,
    pub chart: Vec<ChartRecord>,
    pub summary: TrendSummary,
}

/// Runs analysis requests with one shared [`AnalysisConfig`].
#[derive(Debug, Clone, Default)]
pub struct TrendAnalyzer {
    config: AnalysisConfig,
}

impl TrendAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    #[tracing::instrument(
        skip_all,
        fields(entity = %request.entity, granularity = %request.granularity)
    )]
    pub fn analyze(&self, request: &AnalysisRequest) -> Result<TrendReport, CoreError> {
        let granularity = request.granularity;

        let raw_interest = codec::parse(&request.interest_raw, granularity, request.interest_kind)?;
        let interest = codec::normalize_to_period_end(&raw_interest, granularity)?;
        let mut price = codec::parse(&request.price_raw, Granularity::Daily, SourceKind::Price)?;
        if let Some(aggregation) = self.config.resample_price {
            price = resample(&price, granularity, aggregation)?;
        }
        tracing::debug!(
            interest_points = interest.len(),
            price_points = price.len(),
            "parsed series"
        );

        let fitted = if self.config.exclude_partial_period {
            interest.without_latest()
        } else {
            interest.clone()
        };
        let period = self.config.period_for(granularity);
        let decomposition = decompose_with(&fitted, period, &self.config.stl)?.rounded();
        tracing::debug!(period, observations = fitted.len(), "decomposed interest");

        let aligned = align(&price, &interest, self.config.align_direction)?;
        let correlation = correlate(&request.entity, &aligned, self.config.short_window);
        tracing::debug!(
            aligned = aligned.len(),
            long_term = ?correlation.long_term,
            short_term = ?correlation.short_term,
            "correlated price and interest"
        );

        let chart = match &request.projected_raw {
            Some(raw) => {
                let projected = codec::parse(raw, granularity, request.interest_kind)?;
                let projected = codec::normalize_to_period_end(&projected, granularity)?;
                splice_for_display(&interest, &projected)?.chart_records()
            }
            None => chart_records(&interest),
        };

        let summary = TrendSummary::from_series(
            request.entity.clone(),
            &interest,
            self.config.exclude_partial_period,
        )
        .ok_or(CoreError::InsufficientData {
            required: 1,
            actual: 0,
        })?;

        Ok(TrendReport {
            entity: request.entity.clone(),
            granularity,
            interest_kind: request.interest_kind,
            interest,
            decomposition,
            correlation,
            chart,
            summary,
        })
    }

    /// Analyze independent requests in parallel. Results keep input order.
    pub fn analyze_many(&self, requests: &[AnalysisRequest]) -> Vec<Result<TrendReport, CoreError>> {
        let results: Vec<Result<TrendReport, CoreError>> = requests
            .par_iter()
            .map(|request| self.analyze(request))
            .collect();

        let failed = results.iter().filter(|result| result.is_err()).count();
        if failed > 0 {
            tracing::warn!(failed, total = results.len(), "some analyses failed");
        }
        results
    }
}
