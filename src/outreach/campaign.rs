use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

use super::templates::{choose_template, compose, follow_up, Email, TemplateKind};
use crate::config::OutreachConfig;
use crate::leads::{Lead, ScoredLead};
use crate::output::export::{escape_csv, write_atomic};
use crate::scoring::WebsiteIssuesConfig;

const CAMPAIGN_HEADER: &str = "company_name,to,template,subject,body,lead_score,industry,funding_stage";

/// One mail-merge row: the email plus the lead it was written for.
#[derive(Debug, Clone)]
pub struct CampaignRow<'a> {
    pub lead: &'a ScoredLead,
    pub email: Email,
}

/// How a campaign picks its emails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CampaignKind {
    /// Best template per lead
    #[default]
    Auto,
    /// Same template for every lead
    Template(TemplateKind),
    /// Follow-ups for a first email sent this many days ago
    FollowUp(u32),
}

/// Write one email per lead, in input order.
pub fn build_campaign<'a>(
    leads: &'a [ScoredLead],
    kind: CampaignKind,
    sender: &OutreachConfig,
    issues: Option<&WebsiteIssuesConfig>,
) -> Vec<CampaignRow<'a>> {
    leads
        .iter()
        .map(|lead| {
            let email = match kind {
                CampaignKind::Auto => compose(lead, choose_template(lead, issues), sender, issues),
                CampaignKind::Template(template) => compose(lead, template, sender, issues),
                CampaignKind::FollowUp(days) => follow_up(lead, days, sender),
            };
            CampaignRow { lead, email }
        })
        .collect()
}

fn row(entry: &CampaignRow<'_>) -> String {
    let (industry, stage) = match &entry.lead.lead {
        Lead::Company(c) => (
            c.industry.clone(),
            c.funding_stage.as_ref().map(|s| s.to_string()),
        ),
        Lead::Local(b) => (b.category.clone(), None),
    };
    let email = &entry.email;
    format!(
        "{},{},{},{},{},{},{},{}",
        escape_csv(&email.company_name),
        email.to.as_deref().map(escape_csv).unwrap_or_default(),
        email.template,
        escape_csv(&email.subject),
        escape_csv(&email.body),
        entry.lead.score,
        industry.as_deref().map(escape_csv).unwrap_or_default(),
        stage.as_deref().map(escape_csv).unwrap_or_default(),
    )
}

/// Mail-merge CSV, header included. Bodies keep their line breaks inside quotes.
pub fn to_campaign_csv(rows: &[CampaignRow<'_>]) -> String {
    let mut csv = String::from(CAMPAIGN_HEADER);
    csv.push('\n');
    for entry in rows {
        csv.push_str(&row(entry));
        csv.push('\n');
    }
    csv
}

/// Write `email_campaign_<stamp>.csv` into `dir` and return its path.
pub fn export_campaign(rows: &[CampaignRow<'_>], dir: &Path, stamp: NaiveDateTime) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let path = dir.join(format!("email_campaign_{}.csv", stamp.format("%Y%m%d_%H%M%S")));
    write_atomic(&path, &to_campaign_csv(rows))?;
    tracing::info!("Exported {} campaign emails to {}", rows.len(), path.display());
    Ok(path)
}
