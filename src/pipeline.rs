use chrono::NaiveDate;
use futures::stream::{FuturesUnordered, StreamExt};

use crate::leads::{classify, Lead, ScoredLead, WebsiteStatus};
use crate::qualify::is_high_quality;
use crate::scoring::{calculate_score, ScoringConfig};
use crate::sources::{audit_website, HttpPolicy};

/// A lead that was dropped before scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadFailure {
    /// Position in the input batch
    pub index: usize,
    pub name: String,
    pub reason: String,
}

/// Leads that made it through auditing plus the ones that did not.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub leads: Vec<Lead>,
    pub failures: Vec<LeadFailure>,
}

/// Score one lead and attach its derived fields
pub fn score_lead(lead: Lead, config: &ScoringConfig, today: NaiveDate) -> ScoredLead {
    let result = calculate_score(&lead, config, today);
    ScoredLead {
        lead,
        website_status: result.website_status,
        score: result.score,
        tier: result.tier,
        high_quality: is_high_quality(result.score, config.min_score()),
    }
}

/// Score a batch. Output order matches input order.
pub fn qualify_batch(leads: Vec<Lead>, config: &ScoringConfig, today: NaiveDate) -> Vec<ScoredLead> {
    leads
        .into_iter()
        .map(|lead| score_lead(lead, config, today))
        .collect()
}

/// Sort for display: highest score first, ties keep input order
pub fn sort_for_report(leads: &mut [ScoredLead]) {
    leads.sort_by(|a, b| b.score.cmp(&a.score));
}

fn needs_audit(lead: &Lead) -> bool {
    match lead {
        Lead::Company(company) => {
            company.website_audit.is_none()
                && classify(company.website.as_deref()) == WebsiteStatus::Official
        }
        Lead::Local(_) => false,
    }
}

/// Audit the official websites of company leads that carry no audit yet.
///
/// At most `policy.max_concurrent` requests run at once. A lead whose audit
/// still fails after retries is dropped and reported; everything else comes
/// back in input order.
pub async fn audit_leads(client: &reqwest::Client, leads: Vec<Lead>, policy: &HttpPolicy) -> BatchReport {
    let mut slots: Vec<Option<Lead>> = Vec::with_capacity(leads.len());
    let mut pending = Vec::new();

    for (index, lead) in leads.into_iter().enumerate() {
        if needs_audit(&lead) {
            pending.push((index, lead));
            slots.push(None);
        } else {
            slots.push(Some(lead));
        }
    }

    let total = pending.len();
    if total > 0 {
        tracing::info!("Auditing {} company websites", total);
    }

    let mut failures = Vec::new();
    let mut futures = FuturesUnordered::new();
    let mut pending_iter = pending.into_iter();

    let audit_one = |(index, lead): (usize, Lead)| async move {
        let url = lead.website().unwrap_or_default().to_string();
        let result = audit_website(client, &url, policy).await;
        (index, lead, result)
    };

    // Fill initial batch
    for _ in 0..policy.max_concurrent.max(1) {
        if let Some(item) = pending_iter.next() {
            futures.push(audit_one(item));
        }
    }

    while let Some((index, lead, result)) = futures.next().await {
        match result {
            Ok(audit) => {
                let lead = match lead {
                    Lead::Company(mut company) => {
                        company.website_audit = Some(audit);
                        Lead::Company(company)
                    }
                    other => other,
                };
                slots[index] = Some(lead);
            }
            Err(e) => {
                tracing::warn!("Dropping '{}': {:#}", lead.name(), e);
                failures.push(LeadFailure {
                    index,
                    name: lead.name().to_string(),
                    reason: format!("{:#}", e),
                });
            }
        }

        if let Some(item) = pending_iter.next() {
            futures.push(audit_one(item));
        }
    }

    failures.sort_by_key(|f| f.index);

    BatchReport {
        leads: slots.into_iter().flatten().collect(),
        failures,
    }
}
