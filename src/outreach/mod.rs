//! Outreach emails for scored leads, plus the mail-merge campaign export.

pub mod campaign;
pub mod templates;

pub use campaign::{build_campaign, export_campaign, to_campaign_csv, CampaignKind, CampaignRow};
pub use templates::{choose_template, compose, follow_up, website_issues, Email, TemplateKind};
