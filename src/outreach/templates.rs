use std::fmt;

use crate::config::OutreachConfig;
use crate::leads::{Company, FundingStage, Lead, LocalBusiness, ScoredLead, WebsiteStatus};
use crate::scoring::factors::{detect_outdated, parse_window};
use crate::scoring::WebsiteIssuesConfig;

/// Which outreach email to write for a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum TemplateKind {
    /// Congratulate a recent round and pitch scaling the site
    FundedStartup,
    /// Lead with the deficiencies the website audit found
    OutdatedWebsite,
    /// General introduction
    ColdOutreach,
    /// Introduction through a mutual connection
    Referral,
    /// Local business with no site or only a social page
    NoWebsite,
    #[value(skip)]
    FollowUp,
}

impl TemplateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateKind::FundedStartup => "funded_startup",
            TemplateKind::OutdatedWebsite => "outdated_website",
            TemplateKind::ColdOutreach => "cold_outreach",
            TemplateKind::Referral => "referral",
            TemplateKind::NoWebsite => "no_website",
            TemplateKind::FollowUp => "follow_up",
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rendered email, ready for mail merge.
#[derive(Debug, Clone, PartialEq)]
pub struct Email {
    /// Lead's contact address, when the input carried one
    pub to: Option<String>,
    pub company_name: String,
    pub subject: String,
    pub body: String,
    pub template: TemplateKind,
}

/// Deficiencies worth mentioning, one line each.
///
/// Uses the same cutoff and signatures the scoring engine rewards, so an
/// email never cites a problem the score did not count.
pub fn website_issues(company: &Company, issues: &WebsiteIssuesConfig) -> Vec<String> {
    let Some(audit) = company.website_audit.as_ref() else {
        return Vec::new();
    };
    let mut found = Vec::new();

    if let (Ok(cutoff), Some(load_time)) = (parse_window(&issues.slow_load_after), audit.load_time_secs) {
        if load_time.is_finite() && load_time > cutoff.as_secs_f64() {
            found.push(format!(
                "Pages take {:.1}s to load (visitors start leaving after about 2s)",
                load_time
            ));
        }
    }
    if audit.has_viewport == Some(false) {
        found.push("No mobile viewport, so phones get the desktop layout".to_string());
    }
    if let Some(signature) = detect_outdated(audit, &issues.outdated_signatures) {
        found.push(format!("Built on dated technology ({})", signature));
    }
    found
}

fn has_recent_round(company: &Company) -> bool {
    matches!(&company.funding_stage, Some(stage) if *stage != FundingStage::Unfunded)
        && company.funding_date.is_some()
}

/// Pick the template that fits a lead best.
///
/// Companies with a dated round get the funding pitch, then companies whose
/// audit found problems get the website pitch. Local businesses without an
/// official site get the no-website pitch. Everything else is cold outreach.
pub fn choose_template(scored: &ScoredLead, issues: Option<&WebsiteIssuesConfig>) -> TemplateKind {
    match &scored.lead {
        Lead::Company(company) => {
            if has_recent_round(company) {
                TemplateKind::FundedStartup
            } else if issues.is_some_and(|cfg| !website_issues(company, cfg).is_empty()) {
                TemplateKind::OutdatedWebsite
            } else {
                TemplateKind::ColdOutreach
            }
        }
        Lead::Local(_) if scored.website_status != WebsiteStatus::Official => {
            TemplateKind::NoWebsite
        }
        Lead::Local(_) => TemplateKind::ColdOutreach,
    }
}

/// "Series A", "seed", "$8M"-style labels for email copy
fn stage_label(stage: &FundingStage) -> String {
    match stage {
        FundingStage::Unfunded => String::new(),
        FundingStage::PreSeed => "pre-seed".to_string(),
        FundingStage::Seed => "seed".to_string(),
        FundingStage::SeriesA => "Series A".to_string(),
        FundingStage::SeriesB => "Series B".to_string(),
        FundingStage::SeriesC => "Series C".to_string(),
        FundingStage::SeriesDPlus => "Series D+".to_string(),
        FundingStage::Other(s) => s.clone(),
    }
}

pub(crate) fn format_money(amount: f64) -> Option<String> {
    if !amount.is_finite() || amount <= 0.0 {
        return None;
    }
    let (value, suffix) = if amount >= 1e9 {
        (amount / 1e9, "B")
    } else if amount >= 1e6 {
        (amount / 1e6, "M")
    } else if amount >= 1e3 {
        (amount / 1e3, "K")
    } else {
        (amount, "")
    };
    let text = format!("{:.1}", value);
    let text = text.strip_suffix(".0").unwrap_or(&text);
    Some(format!("${}{}", text, suffix))
}

/// Same lead, same subject: the line is chosen from the name, not at random.
fn pick<'a>(name: &str, options: &'a [String]) -> &'a str {
    let seed: usize = name.bytes().map(usize::from).sum();
    options.get(seed % options.len().max(1)).map(String::as_str).unwrap_or_default()
}

fn signature(sender: &OutreachConfig) -> String {
    let mut lines = vec![sender.sender_name.clone(), sender.sender_company.clone()];
    if let Some(site) = sender.sender_website.as_deref().filter(|s| !s.is_empty()) {
        lines.push(site.to_string());
    }
    lines.join("\n")
}

fn nonempty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn funded_startup(company: &Company, sender: &OutreachConfig) -> (String, String) {
    let name = &company.name;
    let stage = company
        .funding_stage
        .as_ref()
        .map(stage_label)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "recent".to_string());
    let industry = nonempty(company.industry.as_deref()).unwrap_or("tech");
    let amount = company
        .funding_amount
        .and_then(format_money)
        .map(|a| format!(" of {}", a))
        .unwrap_or_default();

    let subjects = [
        format!("Congrats on the {} round, {}", stage, name),
        format!("Helping {} teams scale their web presence", stage),
        format!("{}'s next chapter and {}", name, sender.sender_company),
    ];
    let body = format!(
        "Hi there,\n\n\
         Congrats on your {stage} round{amount}! I came across {name} and like what you are building in {industry}.\n\n\
         After a raise the website starts doing a lot of the selling. {company} builds fast, \
         conversion-focused sites for funded teams, on stacks that grow with you.\n\n\
         Would a 15-minute call next week make sense to see whether we can help {name}?\n\n\
         Best,\n{signature}\n",
        stage = stage,
        amount = amount,
        name = name,
        industry = industry,
        company = sender.sender_company,
        signature = signature(sender),
    );
    (pick(name, &subjects).to_string(), body)
}

fn outdated_website(company: &Company, issues: &[String], sender: &OutreachConfig) -> (String, String) {
    let name = &company.name;
    let subjects = [
        format!("A quick observation about {}'s website", name),
        "Your website may be costing you customers".to_string(),
        format!("Performance opportunity for {}", name),
    ];
    let findings = if issues.is_empty() {
        "- A few places where speed and mobile layout could improve".to_string()
    } else {
        issues.iter().map(|i| format!("- {}", i)).collect::<Vec<_>>().join("\n")
    };
    let body = format!(
        "Hi,\n\n\
         I was looking at {name}'s website and noticed a few things that may be hurting conversions:\n\n\
         {findings}\n\n\
         Most mobile visitors leave when a page takes more than three seconds. {company} rebuilds \
         sites so they load fast and work on every screen.\n\n\
         Would a free audit with specific recommendations for {name} be useful?\n\n\
         Best,\n{signature}\n",
        name = name,
        findings = findings,
        company = sender.sender_company,
        signature = signature(sender),
    );
    (pick(name, &subjects).to_string(), body)
}

fn cold_outreach(name: &str, field: Option<&str>, sender: &OutreachConfig) -> (String, String) {
    let field = nonempty(field).unwrap_or("your industry");
    let subjects = [
        format!("Quick question about {}'s website", name),
        format!("Better web experiences for {} businesses", field),
        format!("{} + {}?", name, sender.sender_company),
    ];
    let body = format!(
        "Hi,\n\n\
         I have been following {name} and like what you are doing in {field}.\n\n\
         {company} builds websites that drive business results: fast, easy to update and designed around \
         what your customers need.\n\n\
         Are you happy with how your current site performs? If not, I would be glad to share what has \
         worked for others in {field}.\n\n\
         Best,\n{signature}\n",
        name = name,
        field = field,
        company = sender.sender_company,
        signature = signature(sender),
    );
    (pick(name, &subjects).to_string(), body)
}

fn referral(name: &str, sender: &OutreachConfig) -> (String, String) {
    let referrer = nonempty(sender.referrer.as_deref()).unwrap_or("A mutual connection");
    let subjects = [
        format!("{} suggested I reach out", referrer),
        format!("Introduction from {}", referrer),
        format!("{} thought we should connect", referrer),
    ];
    let body = format!(
        "Hi,\n\n\
         {referrer} mentioned that {name} might be looking to upgrade its website, so I wanted to say hello.\n\n\
         {company} builds high-performance sites for growing companies. We start from your business goals \
         and build for speed and conversions.\n\n\
         Would you be open to a short intro call?\n\n\
         Best,\n{signature}\n",
        referrer = referrer,
        name = name,
        company = sender.sender_company,
        signature = signature(sender),
    );
    (pick(name, &subjects).to_string(), body)
}

fn no_website(business: &LocalBusiness, status: WebsiteStatus, sender: &OutreachConfig) -> (String, String) {
    let name = &business.name;
    let presence = match status {
        WebsiteStatus::SocialOnly => "is only online through a social media page",
        _ => "does not have a website yet",
    };
    let reputation = match (business.rating, business.review_count) {
        (Some(rating), Some(reviews)) if reviews > 0 => {
            format!(" Your {:.1}-star rating across {} reviews shows customers love you.", rating, reviews)
        }
        _ => String::new(),
    };
    let place = nonempty(business.location.as_deref())
        .map(|l| format!(" in {}", l))
        .unwrap_or_default();
    let subjects = [
        format!("A website for {}", name),
        format!("Helping {} get found online", name),
        format!("More customers for {}{}", name, place),
    ];
    let body = format!(
        "Hi,\n\n\
         I came across {name}{place} and noticed it {presence}.{reputation}\n\n\
         Many people check a business's website before they call or visit. {company} builds simple, \
         mobile-friendly sites for local businesses, with your hours, menu or services and a way to get in touch.\n\n\
         Could I send over a free mockup of what a site for {name} could look like?\n\n\
         Best,\n{signature}\n",
        name = name,
        place = place,
        presence = presence,
        reputation = reputation,
        company = sender.sender_company,
        signature = signature(sender),
    );
    (pick(name, &subjects).to_string(), body)
}

fn contact(lead: &Lead) -> Option<String> {
    let email = match lead {
        Lead::Local(b) => b.email.as_deref(),
        Lead::Company(c) => c.email.as_deref(),
    };
    nonempty(email).map(str::to_string)
}

/// Render the `kind` email for one lead.
///
/// A template that does not fit the lead's profile falls back to the closest
/// one: funding and website-audit pitches need a company, the no-website
/// pitch needs a local business.
pub fn compose(
    scored: &ScoredLead,
    kind: TemplateKind,
    sender: &OutreachConfig,
    issues: Option<&WebsiteIssuesConfig>,
) -> Email {
    let lead = &scored.lead;
    let (template, (subject, body)) = match (kind, lead) {
        (TemplateKind::FundedStartup, Lead::Company(c)) => (kind, funded_startup(c, sender)),
        (TemplateKind::OutdatedWebsite, Lead::Company(c)) => {
            let found = issues.map(|cfg| website_issues(c, cfg)).unwrap_or_default();
            (kind, outdated_website(c, &found, sender))
        }
        (TemplateKind::NoWebsite, Lead::Local(b)) => (kind, no_website(b, scored.website_status, sender)),
        (TemplateKind::Referral, _) => (kind, referral(lead.name(), sender)),
        (TemplateKind::FollowUp, _) => return follow_up(scored, 0, sender),
        (_, Lead::Local(b)) if scored.website_status != WebsiteStatus::Official => (
            TemplateKind::NoWebsite,
            no_website(b, scored.website_status, sender),
        ),
        (_, Lead::Local(b)) => (
            TemplateKind::ColdOutreach,
            cold_outreach(&b.name, b.category.as_deref(), sender),
        ),
        (_, Lead::Company(c)) => (
            TemplateKind::ColdOutreach,
            cold_outreach(&c.name, c.industry.as_deref(), sender),
        ),
    };

    Email {
        to: contact(lead),
        company_name: lead.name().to_string(),
        subject,
        body,
        template,
    }
}

/// Follow-up for a first email sent `days_since_first` days ago.
///
/// Up to 3 days is a gentle nudge, up to 7 days closes the loop, and anything
/// later shares a resource with no ask.
pub fn follow_up(scored: &ScoredLead, days_since_first: u32, sender: &OutreachConfig) -> Email {
    let name = scored.lead.name();
    let (subject, body) = if days_since_first <= 3 {
        (
            format!("Re: {} + {}", name, sender.sender_company),
            format!(
                "Hi,\n\n\
                 Following up on my note from a few days ago, since inboxes get busy.\n\n\
                 Are you still interested in exploring how we could improve {}'s web presence? \
                 If now is not the right time, no worries.\n\n\
                 Best,\n{}\n",
                name, sender.sender_name
            ),
        )
    } else if days_since_first <= 7 {
        (
            format!("One last note about {}", name),
            format!(
                "Hi,\n\n\
                 I wanted to reach out once more before closing the loop.\n\n\
                 If the website is not a priority right now, I understand completely. If it becomes one, \
                 I am happy to talk whenever suits you.\n\n\
                 Best of luck with {}!\n\n\
                 {}\n",
                name, sender.sender_name
            ),
        )
    } else {
        (
            format!("A resource for {}", name),
            format!(
                "Hi,\n\n\
                 Hope all is well! We recently wrote up how we cut load times in half for a client, and \
                 thought it might be useful for {}.\n\n\
                 No ask, just sharing.\n\n\
                 Best,\n{}\n",
                name, sender.sender_name
            ),
        )
    };

    Email {
        to: contact(&scored.lead),
        company_name: name.to_string(),
        subject,
        body,
        template: TemplateKind::FollowUp,
    }
}
