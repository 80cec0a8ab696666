use chrono::NaiveDate;
use proptest::prelude::*;

use lead_scout::leads::{
    classify, Company, EmployeeCount, FundingStage, Lead, LocalBusiness, WebsiteAudit,
    WebsiteStatus, SOCIAL_DOMAINS,
};
use lead_scout::pipeline::qualify_batch;
use lead_scout::qualify::{filter_high_quality, is_high_quality, QualityTier};
use lead_scout::scoring::{calculate_score, ScoringConfig};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

fn local(rating: f64, reviews: u64, website: Option<&str>) -> Lead {
    Lead::Local(LocalBusiness {
        name: "Business".to_string(),
        rating: Some(rating),
        review_count: Some(reviews),
        website: website.map(str::to_string),
        ..LocalBusiness::default()
    })
}

fn score(lead: &Lead) -> u8 {
    calculate_score(lead, &ScoringConfig::default(), today()).score
}

fn apply_case(s: &str, mask: &[bool]) -> String {
    s.chars()
        .zip(mask.iter().cycle())
        .map(|(c, upper)| if *upper { c.to_ascii_uppercase() } else { c })
        .collect()
}

fn website_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        Just(Some("https://joespizza.com".to_string())),
        Just(Some("instagram.com/joes".to_string())),
        Just(Some("not a url at all".to_string())),
        "[a-z]{1,12}\\.(com|io|net)".prop_map(Some),
    ]
}

fn stage_strategy() -> impl Strategy<Value = Option<FundingStage>> {
    prop_oneof![
        Just(None),
        Just(Some(FundingStage::Seed)),
        Just(Some(FundingStage::SeriesA)),
        Just(Some(FundingStage::SeriesDPlus)),
        Just(Some(FundingStage::Other("grant".to_string()))),
    ]
}

fn company_strategy() -> impl Strategy<Value = Lead> {
    (
        stage_strategy(),
        prop::option::of(0u64..100_000),
        prop::option::of(-400i64..400),
        prop::option::of(any::<f64>()),
        prop::option::of(any::<bool>()),
        website_strategy(),
    )
        .prop_map(|(stage, employees, days_ago, load_time, viewport, website)| {
            Lead::Company(Company {
                name: "Company".to_string(),
                website,
                industry: Some("SaaS".to_string()),
                funding_stage: stage,
                funding_date: days_ago.map(|d| today() - chrono::Duration::days(d)),
                employee_count: employees.map(EmployeeCount::Exact),
                website_audit: Some(WebsiteAudit {
                    load_time_secs: load_time,
                    has_viewport: viewport,
                    generator: Some("WordPress 4.9".to_string()),
                    scripts: vec!["/js/jquery-1.8.3.min.js".to_string()],
                }),
                ..Company::default()
            })
        })
}

proptest! {
    #[test]
    fn local_score_is_bounded(
        rating in any::<f64>(),
        reviews in any::<u64>(),
        website in website_strategy(),
    ) {
        let lead = local(rating, reviews, website.as_deref());
        let result = calculate_score(&lead, &ScoringConfig::default(), today());
        prop_assert!(result.score <= 100);
        prop_assert_eq!(result.tier, QualityTier::from_score(result.score));
    }

    #[test]
    fn company_score_is_bounded(lead in company_strategy()) {
        prop_assert!(score(&lead) <= 100);
    }

    #[test]
    fn local_score_monotonic_in_rating(
        a in 0.0f64..=5.0,
        b in 0.0f64..=5.0,
        reviews in 0u64..10_000,
        website in website_strategy(),
    ) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let site = website.as_deref();
        prop_assert!(score(&local(low, reviews, site)) <= score(&local(high, reviews, site)));
    }

    #[test]
    fn local_score_monotonic_in_reviews(
        rating in 0.0f64..=5.0,
        a in 0u64..1_000_000,
        b in 0u64..1_000_000,
        website in website_strategy(),
    ) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let site = website.as_deref();
        prop_assert!(score(&local(rating, low, site)) <= score(&local(rating, high, site)));
    }

    #[test]
    fn no_website_outscores_official(rating in 0.0f64..=5.0, reviews in 0u64..1_000_000) {
        let none = score(&local(rating, reviews, None));
        let official = score(&local(rating, reviews, Some("https://example.com")));
        prop_assert!(none > official);
    }

    #[test]
    fn social_domains_classify_as_social_only(
        index in 0..SOCIAL_DOMAINS.len(),
        mask in prop::collection::vec(any::<bool>(), 1..8),
        scheme in prop_oneof![Just(""), Just("http://"), Just("https://")],
        www in any::<bool>(),
        slug in "[a-z0-9]{0,10}",
    ) {
        let entry = SOCIAL_DOMAINS[index];
        let prefix = if www { "www." } else { "" };
        let url = apply_case(&format!("{}{}{}/{}", scheme, prefix, entry, slug), &mask);
        prop_assert_eq!(classify(Some(&url)), WebsiteStatus::SocialOnly, "url: {}", url);
    }

    #[test]
    fn ordinary_domains_classify_as_official(name in "[a-z]{3,12}", tld in "(com|io|co|shop)") {
        let url = format!("{}.{}", name, tld);
        prop_assume!(!SOCIAL_DOMAINS.iter().any(|d| d.starts_with(url.as_str())));
        prop_assert_eq!(classify(Some(&url)), WebsiteStatus::Official);
    }

    #[test]
    fn scoring_is_idempotent(lead in company_strategy()) {
        let config = ScoringConfig::default();
        let first = calculate_score(&lead, &config, today());
        let second = calculate_score(&lead, &config, today());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn high_quality_filter_keeps_exactly_scores_above_threshold(
        ratings in prop::collection::vec((0.0f64..=5.0, 0u64..5_000, any::<bool>()), 0..25),
    ) {
        let leads: Vec<Lead> = ratings
            .iter()
            .map(|(rating, reviews, has_site)| {
                local(*rating, *reviews, has_site.then_some("https://example.com"))
            })
            .collect();
        let scored = qualify_batch(leads, &ScoringConfig::default(), today());
        let expected: Vec<u8> = scored.iter().map(|s| s.score).filter(|s| *s > 50).collect();
        let kept: Vec<u8> = filter_high_quality(scored).iter().map(|s| s.score).collect();
        prop_assert_eq!(kept, expected);
    }
}

#[test]
fn threshold_boundary() {
    assert_eq!(QualityTier::from_score(50), QualityTier::Medium);
    assert!(!is_high_quality(50, 50));
    assert_eq!(QualityTier::from_score(51), QualityTier::Good);
    assert!(is_high_quality(51, 50));
}

#[test]
fn scenario_instagram_is_social_only() {
    assert_eq!(
        classify(Some("https://instagram.com/somebiz")),
        WebsiteStatus::SocialOnly
    );
}

#[test]
fn scenario_same_reputation_no_site_beats_official() {
    let none = score(&local(4.8, 500, None));
    let official = score(&local(4.8, 500, Some("https://example.com")));
    assert!(none > official);
}

#[test]
fn scenario_funded_saas_company_is_strong() {
    let lead = Lead::Company(Company {
        name: "Acme".to_string(),
        website: Some("https://acme.io".to_string()),
        industry: Some("SaaS".to_string()),
        funding_stage: Some(FundingStage::SeriesA),
        funding_date: Some(today() - chrono::Duration::days(30)),
        employee_count: Some(EmployeeCount::Exact(45)),
        website_audit: Some(WebsiteAudit {
            load_time_secs: Some(5.0),
            ..WebsiteAudit::default()
        }),
        ..Company::default()
    });
    assert!(score(&lead) > 70);
}
