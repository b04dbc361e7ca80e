use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::pipeline::{TrendSummary, YoyGrowth};
use crate::ValidationError;

/// Ordering applied to a list of entity summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    YoyGrowthDesc,
    YoyGrowthAsc,
    VolumeDesc,
    VolumeAsc,
    AlphabeticalDesc,
    AlphabeticalAsc,
}

impl SortOrder {
    pub const ALL: [Self; 6] = [
        Self::YoyGrowthDesc,
        Self::YoyGrowthAsc,
        Self::VolumeDesc,
        Self::VolumeAsc,
        Self::AlphabeticalDesc,
        Self::AlphabeticalAsc,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::YoyGrowthDesc => "yoy-growth-desc",
            Self::YoyGrowthAsc => "yoy-growth-asc",
            Self::VolumeDesc => "volume-desc",
            Self::VolumeAsc => "volume-asc",
            Self::AlphabeticalDesc => "alphabetical-desc",
            Self::AlphabeticalAsc => "alphabetical-asc",
        }
    }
}

impl Display for SortOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = ValidationError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalized = input.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|order| order.as_str() == normalized)
            .ok_or_else(|| ValidationError::InvalidSortOrder {
                value: input.to_owned(),
            })
    }
}

/// Sort summaries in place. Stable, so ties keep their input order.
///
/// Growth from a zero base ranks above any finite growth; summaries without
/// a year of history always sort last.
pub fn sort_summaries(summaries: &mut [TrendSummary], order: SortOrder) {
    match order {
        SortOrder::YoyGrowthDesc => summaries.sort_by(|a, b| compare_growth(b.yoy, a.yoy)),
        SortOrder::YoyGrowthAsc => summaries.sort_by(|a, b| compare_growth(a.yoy, b.yoy)),
        SortOrder::VolumeDesc => summaries.sort_by(|a, b| b.latest_value.total_cmp(&a.latest_value)),
        SortOrder::VolumeAsc => summaries.sort_by(|a, b| a.latest_value.total_cmp(&b.latest_value)),
        SortOrder::AlphabeticalDesc => summaries.sort_by(|a, b| name_key(b).cmp(&name_key(a))),
        SortOrder::AlphabeticalAsc => summaries.sort_by(|a, b| name_key(a).cmp(&name_key(b))),
    }

    if matches!(order, SortOrder::YoyGrowthDesc | SortOrder::YoyGrowthAsc) {
        let unavailable = |summary: &TrendSummary| summary.yoy == YoyGrowth::Unavailable;
        summaries.sort_by_key(unavailable);
    }
}

fn compare_growth(a: YoyGrowth, b: YoyGrowth) -> Ordering {
    rank(a).0.cmp(&rank(b).0).then(rank(a).1.total_cmp(&rank(b).1))
}

fn rank(growth: YoyGrowth) -> (u8, f64) {
    match growth {
        YoyGrowth::Unavailable => (0, 0.0),
        YoyGrowth::Finite(pct) => (1, pct),
        YoyGrowth::Unbounded => (2, 0.0),
    }
}

fn name_key(summary: &TrendSummary) -> String {
    summary.entity.as_str().to_lowercase()
}
