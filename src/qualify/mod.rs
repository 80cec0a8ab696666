pub mod filter;
pub mod tier;

pub use filter::{average_score, filter_high_quality, filter_opportunities, tier_distribution};
pub use tier::{is_high_quality, QualityTier};
