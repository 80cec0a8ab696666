pub mod classify;
pub mod lenient;
pub mod storage;
pub mod types;

pub use classify::{classify, SOCIAL_DOMAINS};
pub use storage::{dedup_leads, load_leads};
pub use types::{
    Company, EmployeeCount, FundingStage, Lead, LocalBusiness, ScoredLead, WebsiteAudit,
    WebsiteStatus,
};
