use url::{Host, Url};

use super::types::WebsiteStatus;

/// Domains that host a profile page rather than a business's own site.
/// Entries with a path only match URLs under that path.
pub const SOCIAL_DOMAINS: &[&str] = &[
    "facebook.com",
    "fb.com",
    "instagram.com",
    "yelp.com",
    "linkedin.com/company",
    "linkedin.com/in",
    "whatsapp.com",
    "wa.me",
    "twitter.com",
    "x.com",
    "tiktok.com",
    "linktr.ee",
    "beacons.ai",
    "bio.link",
    "linkin.bio",
    "taplink.cc",
    "google.com/maps",
    "goo.gl/maps",
    "maps.app.goo.gl",
];

/// Classify a lead's website.
///
/// Never fails: empty or malformed input degrades to `None`. A missing
/// scheme is tolerated ("instagram.com/somebiz").
pub fn classify(url: Option<&str>) -> WebsiteStatus {
    let Some(raw) = url.map(str::trim).filter(|s| !s.is_empty()) else {
        return WebsiteStatus::None;
    };

    let Some(parsed) = parse_absolute(raw) else {
        return WebsiteStatus::None;
    };

    let host = match parsed.host() {
        Some(Host::Domain(domain)) if domain.contains('.') => domain.to_lowercase(),
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => return WebsiteStatus::Official,
        _ => return WebsiteStatus::None,
    };
    let host = host.strip_prefix("www.").unwrap_or(&host);
    let path = parsed.path().to_lowercase();

    if SOCIAL_DOMAINS
        .iter()
        .any(|entry| matches_entry(host, &path, entry))
    {
        WebsiteStatus::SocialOnly
    } else {
        WebsiteStatus::Official
    }
}

fn parse_absolute(raw: &str) -> Option<Url> {
    if raw.contains("://") {
        Url::parse(raw).ok()
    } else {
        Url::parse(&format!("https://{}", raw)).ok()
    }
}

fn matches_entry(host: &str, path: &str, entry: &str) -> bool {
    let (domain, prefix) = match entry.split_once('/') {
        Some((domain, prefix)) => (domain, Some(prefix)),
        None => (entry, None),
    };

    let domain_match = host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|rest| rest.ends_with('.'));
    if !domain_match {
        return false;
    }

    match prefix {
        None => true,
        Some(prefix) => {
            let rest = path.trim_start_matches('/');
            rest == prefix || rest.starts_with(&format!("{}/", prefix))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_and_empty_are_none() {
        assert_eq!(classify(None), WebsiteStatus::None);
        assert_eq!(classify(Some("")), WebsiteStatus::None);
        assert_eq!(classify(Some("   ")), WebsiteStatus::None);
    }

    #[test]
    fn test_social_domains_any_case_with_or_without_scheme() {
        assert_eq!(classify(Some("https://instagram.com/somebiz")), WebsiteStatus::SocialOnly);
        assert_eq!(classify(Some("HTTP://WWW.FACEBOOK.COM/Joes")), WebsiteStatus::SocialOnly);
        assert_eq!(classify(Some("linktr.ee/joes")), WebsiteStatus::SocialOnly);
        assert_eq!(
            classify(Some("https://www.linkedin.com/company/example")),
            WebsiteStatus::SocialOnly
        );
        assert_eq!(classify(Some("m.facebook.com/joes")), WebsiteStatus::SocialOnly);
    }

    #[test]
    fn test_lookalike_domains_are_official() {
        assert_eq!(classify(Some("https://notinstagram.com")), WebsiteStatus::Official);
        assert_eq!(classify(Some("https://instagram.com.example.org")), WebsiteStatus::Official);
    }

    #[test]
    fn test_path_scoped_entries() {
        assert_eq!(
            classify(Some("https://www.google.com/maps/place/Joes")),
            WebsiteStatus::SocialOnly
        );
        assert_eq!(classify(Some("https://google.com/mapsforge")), WebsiteStatus::Official);
    }

    #[test]
    fn test_linkedin_only_profile_pages_are_social() {
        assert_eq!(classify(Some("linkedin.com/in/jane-doe")), WebsiteStatus::SocialOnly);
        assert_eq!(
            classify(Some("https://LinkedIn.com/Company/acme/about")),
            WebsiteStatus::SocialOnly
        );
        assert_eq!(classify(Some("https://linkedin.com/pulse/x")), WebsiteStatus::Official);
        assert_eq!(classify(Some("https://www.linkedin.com")), WebsiteStatus::Official);
    }

    #[test]
    fn test_official_sites() {
        assert_eq!(classify(Some("https://example-official.com")), WebsiteStatus::Official);
        assert_eq!(classify(Some("joespizza.co.uk/menu")), WebsiteStatus::Official);
    }

    #[test]
    fn test_malformed_urls_degrade_to_none() {
        assert_eq!(classify(Some("not a url")), WebsiteStatus::None);
        assert_eq!(classify(Some("http://")), WebsiteStatus::None);
        assert_eq!(classify(Some("localhost")), WebsiteStatus::None);
    }
}
