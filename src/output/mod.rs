pub mod export;
pub mod formatter;

pub use export::{export_leads, to_company_csv, to_json, to_local_csv};
pub use formatter::{
    format_lead_detail, format_scored_table, format_tier_summary, format_tsv, should_use_colors,
};
