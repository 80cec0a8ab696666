pub mod config;
pub mod credentials;
pub mod leads;
pub mod output;
pub mod outreach;
pub mod pipeline;
pub mod qualify;
pub mod scoring;
pub mod sources;
