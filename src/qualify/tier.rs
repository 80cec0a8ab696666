use serde::{Deserialize, Serialize};
use std::fmt;

/// Bucketed score range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Low,
    Medium,
    Good,
    Excellent,
}

impl QualityTier {
    pub const ALL: [QualityTier; 4] = [
        QualityTier::Low,
        QualityTier::Medium,
        QualityTier::Good,
        QualityTier::Excellent,
    ];

    /// [0,25] low, [26,50] medium, [51,75] good, [76,100] excellent.
    /// Scores above 100 are treated as 100.
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=25 => QualityTier::Low,
            26..=50 => QualityTier::Medium,
            51..=75 => QualityTier::Good,
            _ => QualityTier::Excellent,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityTier::Low => "low",
            QualityTier::Medium => "medium",
            QualityTier::Good => "good",
            QualityTier::Excellent => "excellent",
        }
    }

    /// Score range label, e.g. "26-50"
    pub fn range_label(&self) -> &'static str {
        match self {
            QualityTier::Low => "0-25",
            QualityTier::Medium => "26-50",
            QualityTier::Good => "51-75",
            QualityTier::Excellent => "76-100",
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// High quality means strictly above the threshold.
pub fn is_high_quality(score: u8, min_score: u8) -> bool {
    score > min_score
}
