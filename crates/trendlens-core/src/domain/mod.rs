//! # Domain Models
//!
//! Canonical domain types for trendlens series analytics.
//!
//! ## Overview
//!
//! All models validate their invariants at construction time, so downstream
//! stages never see half-shaped records:
//!
//! - **Type-safe**: a [`Series`] always has strictly increasing dates
//! - **Validated**: constructors return [`ValidationError`](crate::ValidationError)
//! - **Serializable**: full serde support for JSON
//!
//! ## Models
//!
//! | Type | Description |
//! |------|-------------|
//! | [`SeriesDate`] | Calendar date written as `MM/DD/YYYY` |
//! | [`TimePoint`] | One dated observation |
//! | [`Series`] | Ordered observations tagged with granularity and source |
//! | [`SnappedSeries`] | Series whose dates were snapped onto another calendar |
//! | [`Granularity`] | Daily, weekly or monthly cadence |
//! | [`SourceKind`] | Search volume, social views or price |
//! | [`EntityId`] | Ticker, keyword or hashtag being analysed |

mod date;
mod entity;
mod granularity;
mod series;
mod source_kind;

pub use date::SeriesDate;
pub use entity::EntityId;
pub use granularity::Granularity;
pub use series::{Series, SnappedSeries, TimePoint};
pub use source_kind::SourceKind;
