use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Sampling cadence of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Daily,
    Weekly,
    Monthly,
}

impl Granularity {
    pub const ALL: [Self; 3] = [Self::Daily, Self::Weekly, Self::Monthly];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    /// Observations per seasonal cycle used when the caller gives no period.
    ///
    /// Monthly data uses a quarterly cycle; daily and weekly data use 7.
    pub const fn default_period(self) -> usize {
        match self {
            Self::Daily => 7,
            Self::Weekly => 7,
            Self::Monthly => 3,
        }
    }

    /// Observations per calendar year, used for year-over-year lookbacks.
    pub const fn periods_per_year(self) -> usize {
        match self {
            Self::Daily => 365,
            Self::Weekly => 52,
            Self::Monthly => 12,
        }
    }
}

impl Display for Granularity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" | "d" | "1d" => Ok(Self::Daily),
            "weekly" | "w" | "1w" => Ok(Self::Weekly),
            "monthly" | "m" | "1mo" => Ok(Self::Monthly),
            other => Err(ValidationError::InvalidGranularity {
                value: other.to_owned(),
            }),
        }
    }
}
