use super::config::{CompanyScoring, LocalScoring, ScoringConfig};
use super::engine::MAX_SCORE;
use super::factors::{parse_window, RangeOp};

fn check_points(errors: &mut Vec<String>, path: &str, value: f64) {
    if !value.is_finite() || !(0.0..=MAX_SCORE).contains(&value) {
        errors.push(format!("{}: must be between 0 and {}, got {}", path, MAX_SCORE, value));
    }
}

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref local) = config.local {
        validate_local(&mut errors, local);
    }

    if let Some(ref company) = config.company {
        validate_company(&mut errors, company);
    }

    if let Some(ref qualification) = config.qualification {
        if f64::from(qualification.min_score) > MAX_SCORE {
            errors.push(format!(
                "scoring.qualification.min_score: must be at most {}",
                MAX_SCORE
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_local(errors: &mut Vec<String>, local: &LocalScoring) {
    if let Some(points) = local.rating_points {
        check_points(errors, "scoring.local.rating_points", points);
    }
    if let Some(per_log) = local.review_points_per_log {
        if !per_log.is_finite() || per_log < 0.0 {
            errors.push("scoring.local.review_points_per_log: must be non-negative".to_string());
        }
    }
    if let Some(cap) = local.review_points_cap {
        check_points(errors, "scoring.local.review_points_cap", cap);
    }
    if local.review_points_per_log.is_some() && local.review_points_cap.is_none() {
        errors.push(
            "scoring.local.review_points_cap: required when review_points_per_log is set"
                .to_string(),
        );
    }

    if let Some(ref presence) = local.presence {
        check_points(errors, "scoring.local.presence.none", presence.none);
        check_points(errors, "scoring.local.presence.social_only", presence.social_only);
        check_points(errors, "scoring.local.presence.official", presence.official);
        // A full point keeps the gap after rounding
        if presence.none - presence.official < 1.0 {
            errors.push(
                "scoring.local.presence: 'none' must score at least 1 point higher than 'official'"
                    .to_string(),
            );
        }

        // An official site must stay below the clamp, or it ties with 'none' at 100
        let official_ceiling = local.rating_points.unwrap_or(0.0)
            + local
                .review_points_per_log
                .and(local.review_points_cap)
                .unwrap_or(0.0)
            + presence.official;
        if official_ceiling > MAX_SCORE - 1.0 {
            errors.push(format!(
                "scoring.local: rating_points + review_points_cap + presence.official must be at most {}, got {}",
                MAX_SCORE - 1.0,
                official_ceiling
            ));
        }
        if presence.social_only < presence.official {
            errors.push(
                "scoring.local.presence: 'social_only' must not score lower than 'official'"
                    .to_string(),
            );
        }
    }

    if let Some(ref opportunity) = local.opportunity {
        if !(0.0..=5.0).contains(&opportunity.min_rating) {
            errors.push("scoring.local.opportunity.min_rating: must be between 0 and 5".to_string());
        }
    }
}

fn validate_company(errors: &mut Vec<String>, company: &CompanyScoring) {
    if let Some(ref stages) = company.funding_stages {
        for (name, points) in [
            ("pre_seed", stages.pre_seed),
            ("seed", stages.seed),
            ("series_a", stages.series_a),
            ("series_b", stages.series_b),
            ("series_c", stages.series_c),
            ("series_d_plus", stages.series_d_plus),
        ] {
            check_points(errors, &format!("scoring.company.funding_stages.{}", name), points);
        }
    }
    if let Some(cap) = company.funding_stage_cap {
        check_points(errors, "scoring.company.funding_stage_cap", cap);
    }

    if let Some(ref industry) = company.industry {
        check_points(errors, "scoring.company.industry.points", industry.points);
        for (i, target) in industry.targets.iter().enumerate() {
            if target.trim().is_empty() {
                errors.push(format!(
                    "scoring.company.industry.targets[{}]: must not be empty",
                    i
                ));
            }
        }
    }

    if let Some(ref bands) = company.employees {
        for (i, band) in bands.iter().enumerate() {
            if let Err(e) = RangeOp::parse(&band.range) {
                errors.push(format!(
                    "scoring.company.employees[{}].range: invalid '{}' - {}",
                    i, band.range, e
                ));
            }
            check_points(errors, &format!("scoring.company.employees[{}].points", i), band.points);
        }
    }

    if let Some(ref recency) = company.recent_funding {
        if let Err(e) = parse_window(&recency.window) {
            errors.push(format!(
                "scoring.company.recent_funding.window: invalid '{}' - {}",
                recency.window, e
            ));
        }
        check_points(errors, "scoring.company.recent_funding.points", recency.points);
    }

    if let Some(ref issues) = company.website_issues {
        if let Err(e) = parse_window(&issues.slow_load_after) {
            errors.push(format!(
                "scoring.company.website_issues.slow_load_after: invalid '{}' - {}",
                issues.slow_load_after, e
            ));
        }
        check_points(errors, "scoring.company.website_issues.slow_load", issues.slow_load);
        check_points(
            errors,
            "scoring.company.website_issues.missing_viewport",
            issues.missing_viewport,
        );
        check_points(
            errors,
            "scoring.company.website_issues.outdated_tech",
            issues.outdated_tech,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{EmployeeBand, PresencePoints, QualificationConfig, RecentFundingConfig};

    fn empty_config() -> ScoringConfig {
        ScoringConfig {
            local: None,
            company: None,
            qualification: None,
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_scoring(&ScoringConfig::default()).is_ok());
    }

    #[test]
    fn test_empty_config() {
        assert!(validate_scoring(&empty_config()).is_ok());
    }

    #[test]
    fn test_points_out_of_range() {
        let mut local = LocalScoring::default();
        local.rating_points = Some(150.0);
        let config = ScoringConfig {
            local: Some(local),
            ..empty_config()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("scoring.local.rating_points"));
    }

    #[test]
    fn test_official_must_score_below_none() {
        let mut local = LocalScoring::default();
        local.presence = Some(PresencePoints {
            none: 10.0,
            social_only: 10.0,
            official: 20.0,
        });
        let config = ScoringConfig {
            local: Some(local),
            ..empty_config()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("'none' must score at least 1 point higher"));
    }

    #[test]
    fn test_presence_gap_below_one_point() {
        let mut local = LocalScoring::default();
        local.presence = Some(PresencePoints {
            none: 0.4,
            social_only: 0.0,
            official: 0.0,
        });
        let config = ScoringConfig {
            local: Some(local),
            ..empty_config()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("at least 1 point higher"));
    }

    fn saturating_local(rating_points: f64) -> LocalScoring {
        LocalScoring {
            rating_points: Some(rating_points),
            review_points_per_log: Some(5.0),
            review_points_cap: Some(30.0),
            presence: Some(PresencePoints {
                none: 30.0,
                social_only: 25.0,
                official: 0.0,
            }),
            ..LocalScoring::default()
        }
    }

    #[test]
    fn test_official_that_reaches_clamp_is_rejected() {
        let config = ScoringConfig {
            local: Some(saturating_local(100.0)),
            ..empty_config()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("scoring.local:"));
        assert!(errors[0].contains("got 130"));
    }

    #[test]
    fn test_review_cap_ignored_without_slope() {
        let mut local = saturating_local(69.0);
        local.review_points_per_log = None;
        local.review_points_cap = Some(60.0);
        let config = ScoringConfig {
            local: Some(local),
            ..empty_config()
        };
        assert!(validate_scoring(&config).is_ok());
    }

    #[test]
    fn test_accepted_ceiling_keeps_none_above_official() {
        use crate::leads::{Lead, LocalBusiness};
        use crate::scoring::calculate_score;
        use chrono::NaiveDate;

        let config = ScoringConfig {
            local: Some(saturating_local(69.0)),
            ..empty_config()
        };
        assert!(validate_scoring(&config).is_ok());

        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let lead = |website: Option<&str>| {
            Lead::Local(LocalBusiness {
                name: "Joe's".to_string(),
                rating: Some(5.0),
                review_count: Some(10_000_000),
                website: website.map(str::to_string),
                ..LocalBusiness::default()
            })
        };
        let none = calculate_score(&lead(None), &config, today).score;
        let official = calculate_score(&lead(Some("https://joes.com")), &config, today).score;
        assert_eq!(none, 100);
        assert_eq!(official, 99);
    }

    #[test]
    fn test_review_slope_requires_cap() {
        let mut local = LocalScoring::default();
        local.review_points_cap = None;
        let config = ScoringConfig {
            local: Some(local),
            ..empty_config()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("review_points_cap"));
    }

    #[test]
    fn test_invalid_employee_band() {
        let mut company = CompanyScoring::default();
        company.employees = Some(vec![EmployeeBand {
            range: "lots".to_string(),
            points: 10.0,
        }]);
        let config = ScoringConfig {
            company: Some(company),
            ..empty_config()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.company.employees[0].range"));
    }

    #[test]
    fn test_invalid_window() {
        let mut company = CompanyScoring::default();
        company.recent_funding = Some(RecentFundingConfig {
            window: "half a year".to_string(),
            points: 20.0,
        });
        let config = ScoringConfig {
            company: Some(company),
            ..empty_config()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.company.recent_funding.window"));
    }

    #[test]
    fn test_min_score_above_100() {
        let config = ScoringConfig {
            qualification: Some(QualificationConfig { min_score: 120 }),
            ..empty_config()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("min_score"));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut company = CompanyScoring::default();
        company.funding_stage_cap = Some(-5.0); // Error 1
        company.employees = Some(vec![EmployeeBand {
            range: "bad".to_string(), // Error 2
            points: 500.0,            // Error 3
        }]);
        let config = ScoringConfig {
            company: Some(company),
            ..empty_config()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
