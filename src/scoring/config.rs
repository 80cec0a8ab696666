use serde::{Deserialize, Serialize};

/// Main scoring configuration.
///
/// Every weight the engine uses lives here; the engine itself only knows
/// the combination rule. Each section and factor is optional and a missing
/// factor contributes zero points.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   local:
///     rating_points: 40
///     review_points_per_log: 5
///     review_points_cap: 30
///     presence: { none: 30, social_only: 25, official: 0 }
///   company:
///     funding_stages: { seed: 15, series_a: 25 }
///     funding_stage_cap: 35
///     industry: { targets: ["SaaS", "FinTech"], points: 20 }
///     employees:
///       - { range: "10-100", points: 20 }
///       - { range: ">100", points: 10 }
///     recent_funding: { window: "180d", points: 20 }
///   qualification:
///     min_score: 50
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Weights for maps-style local business leads
    #[serde(default)]
    pub local: Option<LocalScoring>,

    /// Weights for funded company leads
    #[serde(default)]
    pub company: Option<CompanyScoring>,

    /// High-quality threshold
    #[serde(default)]
    pub qualification: Option<QualificationConfig>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            local: Some(LocalScoring::default()),
            company: Some(CompanyScoring::default()),
            qualification: Some(QualificationConfig::default()),
        }
    }
}

impl ScoringConfig {
    /// Effective high-quality threshold (strictly greater than this)
    pub fn min_score(&self) -> u8 {
        self.qualification
            .as_ref()
            .map(|q| q.min_score)
            .unwrap_or(DEFAULT_MIN_SCORE)
    }
}

/// Local-business "Opportunity Score" weights.
///
/// Rating and review volume raise the score; an official website lowers it,
/// since the business already has a web presence.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LocalScoring {
    /// Points awarded for a perfect 5.0 rating, scaled linearly below that
    #[serde(default)]
    pub rating_points: Option<f64>,

    /// Points per natural-log unit of (1 + review_count)
    #[serde(default)]
    pub review_points_per_log: Option<f64>,

    /// Upper bound on review-volume points
    #[serde(default)]
    pub review_points_cap: Option<f64>,

    /// Points by website status
    #[serde(default)]
    pub presence: Option<PresencePoints>,

    /// Thresholds for the "no site but well reviewed" opportunity filter
    #[serde(default)]
    pub opportunity: Option<OpportunityConfig>,
}

impl Default for LocalScoring {
    fn default() -> Self {
        Self {
            rating_points: Some(40.0),
            review_points_per_log: Some(5.0),
            review_points_cap: Some(30.0),
            presence: Some(PresencePoints {
                none: 30.0,
                social_only: 25.0,
                official: 0.0,
            }),
            opportunity: Some(OpportunityConfig::default()),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PresencePoints {
    pub none: f64,
    pub social_only: f64,
    pub official: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OpportunityConfig {
    pub min_rating: f64,
    pub min_reviews: u64,
}

impl Default for OpportunityConfig {
    fn default() -> Self {
        Self {
            min_rating: 4.0,
            min_reviews: 15,
        }
    }
}

/// Funded-company weights. Bonuses are summed, then clamped to 0-100.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CompanyScoring {
    /// Points per funding stage
    #[serde(default)]
    pub funding_stages: Option<FundingStagePoints>,

    /// Maximum points the funding-stage factor may contribute
    #[serde(default)]
    pub funding_stage_cap: Option<f64>,

    /// Flat bonus when the industry matches a target
    #[serde(default)]
    pub industry: Option<IndustryConfig>,

    /// Head-count bands, first match wins
    #[serde(default)]
    pub employees: Option<Vec<EmployeeBand>>,

    /// Flat bonus when the last round closed inside the window
    #[serde(default)]
    pub recent_funding: Option<RecentFundingConfig>,

    /// Flat bonus per detected website deficiency
    #[serde(default)]
    pub website_issues: Option<WebsiteIssuesConfig>,
}

impl Default for CompanyScoring {
    fn default() -> Self {
        Self {
            funding_stages: Some(FundingStagePoints::default()),
            funding_stage_cap: Some(35.0),
            industry: Some(IndustryConfig {
                targets: [
                    "SaaS",
                    "FinTech",
                    "HealthTech",
                    "E-commerce",
                    "AI/ML",
                    "EdTech",
                    "PropTech",
                    "Marketing",
                    "Enterprise Software",
                    "Consumer Apps",
                    "B2B Services",
                    "Developer Tools",
                ]
                .iter()
                .map(|s| s.to_string())
                .collect(),
                points: 20.0,
            }),
            employees: Some(vec![
                EmployeeBand {
                    range: "<5".to_string(),
                    points: 0.0,
                },
                EmployeeBand {
                    range: "5-9".to_string(),
                    points: 10.0,
                },
                EmployeeBand {
                    range: "10-100".to_string(),
                    points: 20.0,
                },
                EmployeeBand {
                    range: "101-250".to_string(),
                    points: 10.0,
                },
                EmployeeBand {
                    range: ">250".to_string(),
                    points: 5.0,
                },
            ]),
            recent_funding: Some(RecentFundingConfig {
                window: "180days".to_string(),
                points: 20.0,
            }),
            website_issues: Some(WebsiteIssuesConfig::default()),
        }
    }
}

/// Points per funding round. Later rounds score more, up to the cap.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FundingStagePoints {
    #[serde(default)]
    pub pre_seed: f64,
    #[serde(default)]
    pub seed: f64,
    #[serde(default)]
    pub series_a: f64,
    #[serde(default)]
    pub series_b: f64,
    #[serde(default)]
    pub series_c: f64,
    #[serde(default)]
    pub series_d_plus: f64,
}

impl Default for FundingStagePoints {
    fn default() -> Self {
        Self {
            pre_seed: 10.0,
            seed: 15.0,
            series_a: 25.0,
            series_b: 30.0,
            series_c: 35.0,
            series_d_plus: 35.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct IndustryConfig {
    /// Matched case-insensitively as substrings of the lead's industry
    pub targets: Vec<String>,
    pub points: f64,
}

/// Head-count band.
/// Range format: "<N", "<=N", ">N", ">=N", "N-M" (inclusive range), "N"
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EmployeeBand {
    pub range: String,
    pub points: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RecentFundingConfig {
    /// Lookback window, e.g. "180days", "6months"
    pub window: String,
    pub points: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct WebsiteIssuesConfig {
    /// Load time above this counts as slow, e.g. "3s"
    pub slow_load_after: String,
    pub slow_load: f64,
    pub missing_viewport: f64,
    pub outdated_tech: f64,
    /// Case-insensitive substrings searched in the generator tag and script URLs
    #[serde(default)]
    pub outdated_signatures: Vec<String>,
}

impl Default for WebsiteIssuesConfig {
    fn default() -> Self {
        Self {
            slow_load_after: "3s".to_string(),
            slow_load: 10.0,
            missing_viewport: 10.0,
            outdated_tech: 10.0,
            outdated_signatures: [
                "jquery-1.",
                "jquery/1.",
                "jquery.min.js?ver=1.",
                "jquery-migrate-1.",
                "wordpress 3.",
                "wordpress 4.",
                "joomla! 1.",
                "drupal 6",
                "drupal 7",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

pub const DEFAULT_MIN_SCORE: u8 = 50;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct QualificationConfig {
    /// A lead is high quality when its score is strictly greater than this
    pub min_score: u8,
}

impl Default for QualificationConfig {
    fn default() -> Self {
        Self {
            min_score: DEFAULT_MIN_SCORE,
        }
    }
}
