use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Ordinal likelihood reported by the content-safety classifiers
///
/// Variants are declared in rank order so the derived `Ord` matches the
/// classifier scale. Any value the classifier sends that is not on the scale
/// (for example `LIKELIHOOD_UNSPECIFIED`) decodes as `Unknown`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Likelihood {
    #[default]
    Unknown,
    VeryUnlikely,
    Unlikely,
    Possible,
    Likely,
    VeryLikely,
}

impl Likelihood {
    /// Lowest likelihood at which content is treated as unsafe
    pub const FLAG_THRESHOLD: Self = Self::Possible;

    /// Moderation policy shared by the image and video pipelines
    #[must_use]
    pub fn is_flagged(self) -> bool {
        self >= Self::FLAG_THRESHOLD
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::VeryUnlikely => "VERY_UNLIKELY",
            Self::Unlikely => "UNLIKELY",
            Self::Possible => "POSSIBLE",
            Self::Likely => "LIKELY",
            Self::VeryLikely => "VERY_LIKELY",
        }
    }
}

impl fmt::Display for Likelihood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Likelihood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "UNKNOWN" => Ok(Self::Unknown),
            "VERY_UNLIKELY" => Ok(Self::VeryUnlikely),
            "UNLIKELY" => Ok(Self::Unlikely),
            "POSSIBLE" => Ok(Self::Possible),
            "LIKELY" => Ok(Self::Likely),
            "VERY_LIKELY" => Ok(Self::VeryLikely),
            _ => Err(format!("Invalid likelihood: {s}")),
        }
    }
}

impl<'de> Deserialize<'de> for Likelihood {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or_default())
    }
}
