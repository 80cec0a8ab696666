use std::collections::BTreeMap;

use super::tier::QualityTier;
use crate::leads::{Lead, ScoredLead, WebsiteStatus};
use crate::scoring::OpportunityConfig;

/// Keep only high-quality leads, preserving input order
pub fn filter_high_quality(leads: Vec<ScoredLead>) -> Vec<ScoredLead> {
    leads.into_iter().filter(|lead| lead.high_quality).collect()
}

/// Keep local businesses with no official website but a strong reputation.
/// Company leads are never opportunities in this sense.
pub fn filter_opportunities(leads: &[ScoredLead], config: &OpportunityConfig) -> Vec<ScoredLead> {
    leads
        .iter()
        .filter(|scored| is_opportunity(scored, config))
        .cloned()
        .collect()
}

fn is_opportunity(scored: &ScoredLead, config: &OpportunityConfig) -> bool {
    let Lead::Local(ref business) = scored.lead else {
        return false;
    };
    scored.website_status != WebsiteStatus::Official
        && business.rating.unwrap_or(0.0) >= config.min_rating
        && business.review_count.unwrap_or(0) >= config.min_reviews
}

/// Count leads per tier. Every tier is present, even with zero leads.
pub fn tier_distribution(leads: &[ScoredLead]) -> BTreeMap<QualityTier, usize> {
    let mut counts: BTreeMap<QualityTier, usize> =
        QualityTier::ALL.iter().map(|tier| (*tier, 0)).collect();
    for lead in leads {
        *counts.entry(lead.tier).or_insert(0) += 1;
    }
    counts
}

/// Mean score, or `None` for an empty batch
pub fn average_score(leads: &[ScoredLead]) -> Option<f64> {
    if leads.is_empty() {
        return None;
    }
    let total: u64 = leads.iter().map(|l| u64::from(l.score)).sum();
    Some(total as f64 / leads.len() as f64)
}
