use anyhow::{bail, Result};
use std::time::Duration;

use crate::leads::WebsiteAudit;

#[derive(Debug, Clone)]
pub enum RangeOp {
    LessThan(u64),
    LessEqual(u64),
    GreaterThan(u64),
    GreaterEqual(u64),
    Equal(u64),
    Between(u64, u64), // Inclusive range: N-M
}

impl RangeOp {
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(val) = s.strip_prefix(">=") {
            Ok(RangeOp::GreaterEqual(val.trim().parse()?))
        } else if let Some(val) = s.strip_prefix("<=") {
            Ok(RangeOp::LessEqual(val.trim().parse()?))
        } else if let Some(val) = s.strip_prefix('>') {
            Ok(RangeOp::GreaterThan(val.trim().parse()?))
        } else if let Some(val) = s.strip_prefix('<') {
            Ok(RangeOp::LessThan(val.trim().parse()?))
        } else if s.contains('-') && !s.starts_with('-') {
            let parts: Vec<&str> = s.split('-').collect();
            if parts.len() == 2 {
                let low: u64 = parts[0].trim().parse()?;
                let high: u64 = parts[1].trim().parse()?;
                if low > high {
                    bail!("Range start exceeds end: {}", s)
                }
                Ok(RangeOp::Between(low, high))
            } else {
                bail!("Invalid range format: {}", s)
            }
        } else {
            Ok(RangeOp::Equal(s.parse()?))
        }
    }

    pub fn matches(&self, value: u64) -> bool {
        match self {
            RangeOp::LessThan(n) => value < *n,
            RangeOp::LessEqual(n) => value <= *n,
            RangeOp::GreaterThan(n) => value > *n,
            RangeOp::GreaterEqual(n) => value >= *n,
            RangeOp::Equal(n) => value == *n,
            RangeOp::Between(low, high) => value >= *low && value <= *high,
        }
    }
}

/// Parse a humantime duration such as "180days" or "3s".
pub fn parse_window(s: &str) -> Result<Duration> {
    Ok(humantime::parse_duration(s.trim())?)
}

/// First target contained in `industry`, compared case-insensitively.
pub fn match_industry<'a>(industry: &str, targets: &'a [String]) -> Option<&'a str> {
    let industry = industry.to_lowercase();
    targets
        .iter()
        .map(|t| t.trim())
        .find(|t| !t.is_empty() && industry.contains(&t.to_lowercase()))
}

/// First outdated-technology signature found in the generator tag or a script URL.
pub fn detect_outdated<'a>(audit: &WebsiteAudit, signatures: &'a [String]) -> Option<&'a str> {
    let haystacks: Vec<String> = audit
        .generator
        .iter()
        .chain(audit.scripts.iter())
        .map(|s| s.to_lowercase())
        .collect();

    signatures
        .iter()
        .map(|s| s.as_str())
        .filter(|s| !s.trim().is_empty())
        .find(|sig| {
            let sig = sig.to_lowercase();
            haystacks.iter().any(|h| h.contains(&sig))
        })
}
