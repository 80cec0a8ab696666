use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio_retry::Retry;

use super::http::HttpPolicy;
use crate::config::ApolloConfig;
use crate::leads::lenient;
use crate::leads::{Company, EmployeeCount, FundingStage, Lead};

const SEARCH_PATH: &str = "/v1/mixed_companies/search";

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    page: u32,
    per_page: u32,
    organization_num_employees_ranges: &'a [String],
    organization_locations: &'a [String],
    q_organization_keyword_tags: &'a [String],
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organizations: Vec<Organization>,
}

#[derive(Debug, Deserialize)]
struct Organization {
    name: Option<String>,
    website_url: Option<String>,
    industry: Option<String>,
    estimated_num_employees: Option<u64>,
    city: Option<String>,
    state: Option<String>,
    country: Option<String>,
    linkedin_url: Option<String>,
    short_description: Option<String>,
    latest_funding_stage: Option<String>,
    latest_funding_round_date: Option<String>,
    total_funding: Option<f64>,
}

impl Organization {
    fn into_lead(self) -> Option<Lead> {
        let name = self.name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())?;

        let location: Vec<String> = [self.city, self.state, self.country]
            .into_iter()
            .flatten()
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect();

        Some(Lead::Company(Company {
            name,
            website: self.website_url,
            industry: self.industry,
            funding_stage: self.latest_funding_stage.as_deref().map(FundingStage::parse),
            funding_amount: self.total_funding.filter(|v| v.is_finite()).map(|v| v.max(0.0)),
            funding_date: self
                .latest_funding_round_date
                .as_deref()
                .and_then(lenient::parse_date),
            employee_count: self.estimated_num_employees.map(EmployeeCount::Exact),
            location: (!location.is_empty()).then(|| location.join(", ")),
            description: self.short_description,
            linkedin: self.linkedin_url,
            email: None,
            source: Some("Apollo.io".to_string()),
            website_audit: None,
        }))
    }
}

/// Apollo.io company search client.
pub struct ApolloSource {
    client: reqwest::Client,
    api_key: String,
    config: ApolloConfig,
    policy: HttpPolicy,
}

impl ApolloSource {
    pub fn new(
        client: reqwest::Client,
        api_key: String,
        config: ApolloConfig,
        policy: HttpPolicy,
    ) -> Self {
        Self {
            client,
            api_key,
            config,
            policy,
        }
    }

    /// Fetch one page of companies and normalize them into company leads.
    /// Organizations without a name are skipped.
    pub async fn search_companies(&self, page: u32) -> Result<Vec<Lead>> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), SEARCH_PATH);
        let body = SearchRequest {
            page,
            per_page: self.config.per_page,
            organization_num_employees_ranges: &self.config.employee_ranges,
            organization_locations: &self.config.locations,
            q_organization_keyword_tags: &self.config.keyword_tags,
        };

        let response: SearchResponse = Retry::spawn(self.policy.retry_strategy(), || async {
            let response = self
                .client
                .post(&url)
                .header("Cache-Control", "no-cache")
                .header("X-Api-Key", &self.api_key)
                .json(&body)
                .send()
                .await
                .map_err(|e| anyhow!("Apollo request failed: {}", e))?;

            let status = response.status();
            if status.as_u16() == 401 || status.as_u16() == 403 {
                return Err(anyhow!(
                    "Apollo rejected the API key (HTTP {}). Check APOLLO_API_KEY",
                    status.as_u16()
                ));
            }
            if status.as_u16() == 429 {
                return Err(anyhow!("Apollo API rate limit exceeded. Wait and try again."));
            }
            if !status.is_success() {
                return Err(anyhow!("Apollo API error: HTTP {}", status.as_u16()));
            }

            response
                .json::<SearchResponse>()
                .await
                .map_err(|e| anyhow!("Failed to parse Apollo response: {}", e))
        })
        .await?;

        let total = response.organizations.len();
        let leads: Vec<Lead> = response
            .organizations
            .into_iter()
            .filter_map(Organization::into_lead)
            .collect();

        if leads.len() < total {
            tracing::debug!("Skipped {} unnamed organizations", total - leads.len());
        }
        tracing::info!("Found {} companies from Apollo.io (page {})", leads.len(), page);

        Ok(leads)
    }

    /// Fetch `pages` pages, stopping early at the first empty page.
    pub async fn search_pages(&self, pages: u32) -> Result<Vec<Lead>> {
        let mut all = Vec::new();
        for page in 1..=pages.max(1) {
            let leads = self.search_companies(page).await?;
            if leads.is_empty() {
                break;
            }
            all.extend(leads);
        }
        Ok(all)
    }
}
