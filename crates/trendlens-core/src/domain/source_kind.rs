use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Where a series' values come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    /// Search engine query volume for a keyword.
    SearchVolume,
    /// Social platform view counts for a hashtag.
    SocialViews,
    /// Equity closing price.
    Price,
}

impl SourceKind {
    pub const ALL: [Self; 3] = [Self::SearchVolume, Self::SocialViews, Self::Price];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SearchVolume => "search-volume",
            Self::SocialViews => "social-views",
            Self::Price => "price",
        }
    }

    /// Key under which chart records carry this source's values.
    pub const fn value_key(self) -> &'static str {
        match self {
            Self::SearchVolume => "volume",
            Self::SocialViews => "views",
            Self::Price => "price",
        }
    }

    pub const fn is_interest(self) -> bool {
        matches!(self, Self::SearchVolume | Self::SocialViews)
    }
}

impl Display for SourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "search-volume" | "search" | "google search" => Ok(Self::SearchVolume),
            "social-views" | "social" | "tiktok" => Ok(Self::SocialViews),
            "price" => Ok(Self::Price),
            other => Err(ValidationError::InvalidSourceKind {
                value: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_platform_aliases() {
        assert_eq!(
            SourceKind::from_str("Tiktok").expect("must parse"),
            SourceKind::SocialViews
        );
        assert_eq!(
            SourceKind::from_str("Google Search").expect("must parse"),
            SourceKind::SearchVolume
        );
    }

    #[test]
    fn rejects_unknown_source() {
        let err = SourceKind::from_str("twitter").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidSourceKind { .. }));
    }
}
