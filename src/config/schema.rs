use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::scoring::ScoringConfig;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub scoring: Option<ScoringConfig>,
    #[serde(default)]
    pub fetch: Option<FetchConfig>,
    #[serde(default)]
    pub apollo: Option<ApolloConfig>,
    #[serde(default)]
    pub export: Option<ExportConfig>,
    #[serde(default)]
    pub outreach: Option<OutreachConfig>,
}

impl Config {
    /// Full default configuration, as written by `lead-scout init`
    pub fn full_default() -> Self {
        Self {
            scoring: Some(ScoringConfig::default()),
            fetch: Some(FetchConfig::default()),
            apollo: Some(ApolloConfig::default()),
            export: Some(ExportConfig::default()),
            outreach: Some(OutreachConfig::default()),
        }
    }
}

/// Network policy shared by every source adapter.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FetchConfig {
    /// Per-request timeout, e.g. "10s"
    pub timeout: String,
    /// Attempts after the first one before a request is given up
    pub max_retries: usize,
    /// Website audits in flight at once
    pub max_concurrent: usize,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: "10s".to_string(),
            max_retries: 3,
            max_concurrent: 5,
            user_agent: concat!("lead-scout/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Apollo.io company search parameters.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ApolloConfig {
    pub base_url: String,
    pub per_page: u32,
    #[serde(default)]
    pub employee_ranges: Vec<String>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub keyword_tags: Vec<String>,
}

impl Default for ApolloConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.apollo.io".to_string(),
            per_page: 100,
            employee_ranges: vec!["10,50".to_string(), "50,100".to_string(), "100,250".to_string()],
            locations: vec!["United States".to_string()],
            keyword_tags: vec![
                "saas".to_string(),
                "software".to_string(),
                "technology".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
    #[default]
    Both,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ExportConfig {
    #[serde(default)]
    pub format: ExportFormat,
    /// Directory for export files (default: current directory)
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Only report and export high-quality leads
    #[serde(default)]
    pub high_quality_only: bool,
}

/// Signature and defaults for generated outreach emails.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OutreachConfig {
    pub sender_name: String,
    pub sender_company: String,
    #[serde(default)]
    pub sender_website: Option<String>,
    /// Mutual connection named by the referral template
    #[serde(default)]
    pub referrer: Option<String>,
}

impl Default for OutreachConfig {
    fn default() -> Self {
        Self {
            sender_name: "Your Name".to_string(),
            sender_company: "Your Studio".to_string(),
            sender_website: None,
            referrer: None,
        }
    }
}
