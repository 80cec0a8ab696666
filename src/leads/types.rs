use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::lenient;
use crate::qualify::QualityTier;

/// A candidate record handed in by a source adapter.
///
/// The two profiles share nothing beyond `name` and `website`, so they are
/// kept as separate structs and tagged with `profile: local | company`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "profile", rename_all = "kebab-case")]
pub enum Lead {
    Local(LocalBusiness),
    Company(Company),
}

impl Lead {
    pub fn name(&self) -> &str {
        match self {
            Lead::Local(b) => &b.name,
            Lead::Company(c) => &c.name,
        }
    }

    pub fn website(&self) -> Option<&str> {
        match self {
            Lead::Local(b) => b.website.as_deref(),
            Lead::Company(c) => c.website.as_deref(),
        }
    }

    /// Profile label as it appears in input files ("local" or "company")
    pub fn profile(&self) -> &'static str {
        match self {
            Lead::Local(_) => "local",
            Lead::Company(_) => "company",
        }
    }

    /// Key used for deduplication: lowercase name plus lowercase website
    pub fn dedup_key(&self) -> String {
        format!(
            "{}|{}",
            self.name().trim().to_lowercase(),
            self.website().unwrap_or("").trim().to_lowercase()
        )
    }
}

/// Maps-style local business (restaurant, salon, plumber, ...)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LocalBusiness {
    pub name: String,
    #[serde(default, alias = "url")]
    pub website: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Outreach address
    #[serde(default, alias = "contact_email")]
    pub email: Option<String>,
    /// Star rating, clamped to 0.0-5.0 on input
    #[serde(default, deserialize_with = "lenient::rating")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub review_count: Option<u64>,
}

/// Funded company, typically from a B2B API
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Company {
    #[serde(alias = "company_name")]
    pub name: String,
    #[serde(default, alias = "website_url")]
    pub website: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub funding_stage: Option<FundingStage>,
    /// Amount raised in currency units. Accepts "$8M"-style text on input.
    #[serde(default, deserialize_with = "lenient::money")]
    pub funding_amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub funding_date: Option<NaiveDate>,
    #[serde(
        default,
        alias = "estimated_num_employees",
        deserialize_with = "lenient::employee_count"
    )]
    pub employee_count: Option<EmployeeCount>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "linkedin_url")]
    pub linkedin: Option<String>,
    #[serde(default, alias = "contact_email")]
    pub email: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default, alias = "website_analysis")]
    pub website_audit: Option<WebsiteAudit>,
}

/// Funding round, parsed loosely from "Series A", "series_a", "SEED", ...
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FundingStage {
    Unfunded,
    PreSeed,
    Seed,
    SeriesA,
    SeriesB,
    SeriesC,
    /// Series D and every later round
    SeriesDPlus,
    Other(String),
}

impl FundingStage {
    pub fn parse(s: &str) -> Self {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == ' ' || c == '_' { '-' } else { c })
            .collect();

        match normalized.as_str() {
            "none" | "unfunded" | "bootstrapped" => FundingStage::Unfunded,
            "pre-seed" | "preseed" => FundingStage::PreSeed,
            "seed" => FundingStage::Seed,
            "series-a" => FundingStage::SeriesA,
            "series-b" => FundingStage::SeriesB,
            "series-c" => FundingStage::SeriesC,
            other => match other.strip_prefix("series-") {
                Some(round) if is_later_round(round) => FundingStage::SeriesDPlus,
                _ => FundingStage::Other(s.trim().to_string()),
            },
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FundingStage::Unfunded => "none",
            FundingStage::PreSeed => "pre-seed",
            FundingStage::Seed => "seed",
            FundingStage::SeriesA => "series-a",
            FundingStage::SeriesB => "series-b",
            FundingStage::SeriesC => "series-c",
            FundingStage::SeriesDPlus => "series-d+",
            FundingStage::Other(s) => s,
        }
    }
}

/// "d", "d+", "e", "f", ... (single letter at or after d, optional trailing +)
fn is_later_round(round: &str) -> bool {
    let letter = round.strip_suffix('+').unwrap_or(round);
    let mut chars = letter.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if ('d'..='z').contains(&c))
}

impl From<String> for FundingStage {
    fn from(s: String) -> Self {
        FundingStage::parse(&s)
    }
}

impl From<FundingStage> for String {
    fn from(stage: FundingStage) -> Self {
        stage.as_str().to_string()
    }
}

impl fmt::Display for FundingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Head count as reported upstream: an exact number, an inclusive band
/// ("10-50"), or an open-ended band ("250+").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmployeeCount {
    Exact(u64),
    Range(u64, u64),
    AtLeast(u64),
}

impl EmployeeCount {
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().replace(',', "");
        if let Some(low) = s.strip_suffix('+') {
            return low.trim().parse().ok().map(EmployeeCount::AtLeast);
        }
        if let Some((low, high)) = s.split_once('-') {
            let low: u64 = low.trim().parse().ok()?;
            let high: u64 = high.trim().parse().ok()?;
            return Some(if low <= high {
                EmployeeCount::Range(low, high)
            } else {
                EmployeeCount::Range(high, low)
            });
        }
        s.parse().ok().map(EmployeeCount::Exact)
    }

    /// Single value used for band matching. Ranges use their midpoint.
    pub fn representative(&self) -> u64 {
        match *self {
            EmployeeCount::Exact(n) => n,
            EmployeeCount::Range(low, high) => low + (high - low) / 2,
            EmployeeCount::AtLeast(n) => n,
        }
    }
}

impl fmt::Display for EmployeeCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmployeeCount::Exact(n) => write!(f, "{}", n),
            EmployeeCount::Range(low, high) => write!(f, "{}-{}", low, high),
            EmployeeCount::AtLeast(n) => write!(f, "{}+", n),
        }
    }
}

impl Serialize for EmployeeCount {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            EmployeeCount::Exact(n) => serializer.serialize_u64(*n),
            other => serializer.collect_str(other),
        }
    }
}

/// Result of inspecting a company's website.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WebsiteAudit {
    #[serde(default, alias = "load_time")]
    pub load_time_secs: Option<f64>,
    /// `Some(false)` when the page has no `<meta name="viewport">`
    #[serde(default)]
    pub has_viewport: Option<bool>,
    #[serde(default)]
    pub generator: Option<String>,
    /// `src` attributes of external scripts
    #[serde(default)]
    pub scripts: Vec<String>,
}

/// Web presence of a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WebsiteStatus {
    None,
    SocialOnly,
    Official,
}

impl WebsiteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WebsiteStatus::None => "NONE",
            WebsiteStatus::SocialOnly => "SOCIAL_ONLY",
            WebsiteStatus::Official => "OFFICIAL",
        }
    }
}

impl fmt::Display for WebsiteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lead with its derived fields. Built once by the pipeline, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredLead {
    #[serde(flatten)]
    pub lead: Lead,
    pub website_status: WebsiteStatus,
    pub score: u8,
    pub tier: QualityTier,
    pub high_quality: bool,
}
