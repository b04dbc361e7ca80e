//! # Trendlens Core
//!
//! Analytics core for comparing keyword interest against equity prices.
//!
//! ## Overview
//!
//! This crate turns two raw text series per entity (an interest series from
//! search or social platforms and a daily price series) into chart-ready
//! analytics:
//!
//! - **Series codec** for the compact `MM/DD/YYYY: value` wire format
//! - **Date alignment** by snapping one calendar onto another
//! - **Seasonal-trend decomposition** (STL) with a momentum signal
//! - **Correlation** over the full history and a trailing window
//! - **Display formatting** for magnitudes and growth percentages
//!
//! Every operation is a pure function over immutable values. The core does
//! no I/O; callers hand in raw strings and receive typed results.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`align`] | Nearest-date snapping and inner joins |
//! | [`chart`] | Flat chart records keyed by source |
//! | [`codec`] | Parsing, formatting and period-end normalization |
//! | [`correlation`] | Guarded Pearson correlation and trailing windows |
//! | [`decompose`] | STL decomposition and momentum |
//! | [`display`] | Projection splicing and partial-period estimates |
//! | [`domain`] | Domain models (SeriesDate, Series, EntityId) |
//! | [`envelope`] | Response envelope with metadata |
//! | [`error`] | Core error types |
//! | [`format`] | K/M/B magnitudes and growth labels |
//! | [`pipeline`] | Per-entity analysis and parallel batches |
//! | [`ranking`] | Sorting of entity summaries |
//! | [`resample`] | Down-sampling to a coarser cadence |
//!
//! ## Quick Start
//!
//! ```rust
//! use trendlens_core::{AnalysisRequest, EntityId, Granularity, SourceKind, TrendAnalyzer};
//!
//! let request = AnalysisRequest::new(
//!     EntityId::parse("AAPL").unwrap(),
//!     "01/01/2024: 1000, 02/01/2024: 1100, 03/01/2024: 1050, \
//!      04/01/2024: 1200, 05/01/2024: 1300, 06/01/2024: 1250",
//!     "01/31/2024: 184.4, 02/29/2024: 180.8, 03/28/2024: 171.5, \
//!      04/30/2024: 170.3, 05/31/2024: 192.3, 06/28/2024: 210.6",
//!     Granularity::Monthly,
//!     SourceKind::SearchVolume,
//! );
//!
//! let report = TrendAnalyzer::default().analyze(&request).unwrap();
//! assert_eq!(report.interest.len(), 6);
//! assert!(report.correlation.long_term.is_some());
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! interest text ──▶ parse ──▶ normalize ──┬──▶ decompose ──▶ rounded components
//!                                         │
//! price text ─────▶ parse ──▶ (resample) ─┴──▶ align ──▶ correlate
//!                                                              │
//!                                     format ◀── summary ◀─────┘
//! ```
//!
//! ## Error Handling
//!
//! Parsing failures are [`FormatError`], broken invariants are
//! [`ValidationError`], and both roll up into [`CoreError`] together with
//! the decomposition and alignment failures. An undefined correlation is a
//! `None` value, never an error.

pub mod align;
pub mod chart;
pub mod codec;
pub mod correlation;
pub mod decompose;
pub mod display;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod format;
mod loess;
pub mod pipeline;
pub mod ranking;
pub mod resample;

// Re-export commonly used types at crate root for convenience

// Alignment
pub use align::{align, join, snap, AlignDirection, AlignedPair};

// Chart output
pub use chart::{chart_records, ChartRecord};

// Correlation
pub use correlation::{correlate, safe_correlation, CorrelationResult, Window};

// Decomposition
pub use decompose::{decompose, decompose_with, Decomposition, DecompositionRow, StlConfig};

// Display transforms
pub use display::{estimate_current_period, splice_for_display, DisplayPoint, DisplaySeries};

// Domain models
pub use domain::{EntityId, Granularity, Series, SeriesDate, SnappedSeries, SourceKind, TimePoint};

// Envelope types
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta, SCHEMA_VERSION};

// Error types
pub use error::{CoreError, FormatError, ValidationError};

// Formatting
pub use format::{
    format_growth, format_magnitude, growth_between, round_sig, year_over_year, GrowthCategory,
};

// Pipeline
pub use pipeline::{
    AnalysisConfig, AnalysisRequest, TrendAnalyzer, TrendReport, TrendSummary, YoyGrowth,
};

// Ranking
pub use ranking::{sort_summaries, SortOrder};

// Resampling
pub use resample::{resample, Aggregation};
