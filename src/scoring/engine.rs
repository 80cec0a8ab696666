use chrono::NaiveDate;

use super::config::{CompanyScoring, LocalScoring, ScoringConfig};
use super::factors::{detect_outdated, match_industry, parse_window, RangeOp};
use crate::leads::lenient::MAX_RATING;
use crate::leads::{classify, Company, FundingStage, Lead, LocalBusiness, WebsiteStatus};
use crate::qualify::QualityTier;

pub const MAX_SCORE: f64 = 100.0;

#[derive(Debug, Clone, PartialEq)]
pub struct FactorContribution {
    pub label: String,       // e.g. "Rating", "Funding stage", "Slow load"
    pub description: String, // e.g. "4.8 stars", "series-a -> +25"
    pub before: f64,         // Running total before this factor
    pub after: f64,          // Running total after this factor
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub factors: Vec<FactorContribution>,
    /// Sum of all factors before clamping
    pub raw_total: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    pub score: u8,
    pub tier: QualityTier,
    pub website_status: WebsiteStatus,
    pub breakdown: ScoreBreakdown,
}

/// Running sum that records every factor it adds.
struct Tally {
    total: f64,
    factors: Vec<FactorContribution>,
}

impl Tally {
    fn new() -> Self {
        Self {
            total: 0.0,
            factors: Vec::new(),
        }
    }

    fn add(&mut self, label: &str, description: String, points: f64) {
        let before = self.total;
        self.total += points;
        self.factors.push(FactorContribution {
            label: label.to_string(),
            description,
            before,
            after: self.total,
        });
    }

    fn finish(self, website_status: WebsiteStatus) -> ScoreResult {
        let clamped = if self.total.is_finite() {
            self.total.clamp(0.0, MAX_SCORE)
        } else {
            0.0
        };
        let score = clamped.round() as u8;
        ScoreResult {
            score,
            tier: QualityTier::from_score(score),
            website_status,
            breakdown: ScoreBreakdown {
                factors: self.factors,
                raw_total: self.total,
            },
        }
    }
}

/// Score a lead. Pure: the same lead, config and date always give the same
/// result. `today` anchors the funding-recency window.
pub fn calculate_score(lead: &Lead, config: &ScoringConfig, today: NaiveDate) -> ScoreResult {
    let website_status = classify(lead.website());
    let mut tally = Tally::new();

    match lead {
        Lead::Local(business) => {
            if let Some(ref local) = config.local {
                score_local(&mut tally, business, website_status, local);
            }
        }
        Lead::Company(company) => {
            if let Some(ref weights) = config.company {
                score_company(&mut tally, company, weights, today);
            }
        }
    }

    tally.finish(website_status)
}

fn finite_or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

fn score_local(
    tally: &mut Tally,
    business: &LocalBusiness,
    status: WebsiteStatus,
    weights: &LocalScoring,
) {
    if let Some(rating_points) = weights.rating_points {
        let rating = finite_or_zero(business.rating).clamp(0.0, MAX_RATING);
        tally.add(
            "Rating",
            format!("{:.1} stars", rating),
            rating / MAX_RATING * rating_points,
        );
    }

    if let Some(per_log) = weights.review_points_per_log {
        let reviews = business.review_count.unwrap_or(0);
        let mut points = (1.0 + reviews as f64).ln() * per_log;
        if let Some(cap) = weights.review_points_cap {
            points = points.min(cap);
        }
        tally.add("Reviews", format!("{} reviews", reviews), points);
    }

    if let Some(ref presence) = weights.presence {
        let points = match status {
            WebsiteStatus::None => presence.none,
            WebsiteStatus::SocialOnly => presence.social_only,
            WebsiteStatus::Official => presence.official,
        };
        tally.add("Web presence", status.to_string(), points);
    }
}

fn score_company(tally: &mut Tally, company: &Company, weights: &CompanyScoring, today: NaiveDate) {
    // Funding stage, capped
    if let (Some(table), Some(stage)) = (&weights.funding_stages, &company.funding_stage) {
        let points = match stage {
            FundingStage::PreSeed => table.pre_seed,
            FundingStage::Seed => table.seed,
            FundingStage::SeriesA => table.series_a,
            FundingStage::SeriesB => table.series_b,
            FundingStage::SeriesC => table.series_c,
            FundingStage::SeriesDPlus => table.series_d_plus,
            FundingStage::Unfunded | FundingStage::Other(_) => 0.0,
        };
        let points = match weights.funding_stage_cap {
            Some(cap) => points.min(cap),
            None => points,
        };
        tally.add("Funding stage", format!("{} -> {:+}", stage, points), points);
    }

    if let (Some(industry_cfg), Some(industry)) = (&weights.industry, &company.industry) {
        if let Some(target) = match_industry(industry, &industry_cfg.targets) {
            tally.add(
                "Industry",
                format!("'{}' matches '{}'", industry, target),
                industry_cfg.points,
            );
        }
    }

    if let (Some(bands), Some(count)) = (&weights.employees, company.employee_count) {
        let value = count.representative();
        let matched = bands.iter().find(|band| {
            RangeOp::parse(&band.range)
                .map(|range| range.matches(value))
                .unwrap_or(false)
        });
        if let Some(band) = matched {
            tally.add(
                "Employees",
                format!("{} employees, matched '{}'", count, band.range),
                band.points,
            );
        }
    }

    if let (Some(recency), Some(funded_on)) = (&weights.recent_funding, company.funding_date) {
        if let Ok(window) = parse_window(&recency.window) {
            let age_secs = (today - funded_on).num_seconds();
            if age_secs >= 0 && (age_secs as u64) <= window.as_secs() {
                tally.add(
                    "Recent funding",
                    format!("funded {} days ago", age_secs / 86_400),
                    recency.points,
                );
            }
        }
    }

    if let (Some(issues), Some(audit)) = (&weights.website_issues, &company.website_audit) {
        if let (Ok(cutoff), Some(load_time)) =
            (parse_window(&issues.slow_load_after), audit.load_time_secs)
        {
            if load_time.is_finite() && load_time > cutoff.as_secs_f64() {
                tally.add(
                    "Slow load",
                    format!("{:.2}s > {}", load_time, issues.slow_load_after),
                    issues.slow_load,
                );
            }
        }

        if audit.has_viewport == Some(false) {
            tally.add(
                "Missing viewport",
                "no mobile viewport meta tag".to_string(),
                issues.missing_viewport,
            );
        }

        if let Some(signature) = detect_outdated(audit, &issues.outdated_signatures) {
            tally.add(
                "Outdated tech",
                format!("matched '{}'", signature),
                issues.outdated_tech,
            );
        }
    }
}
