use super::types::Lead;
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Load normalized leads from a JSON array or a YAML sequence.
///
/// The format is picked from the file extension; anything other than
/// `.yaml`/`.yml` is read as JSON.
pub fn load_leads(path: &Path) -> Result<Vec<Lead>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read leads file at {}", path.display()))?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let leads: Vec<Lead> = if is_yaml {
        serde_saphyr::from_str(&content)
            .with_context(|| format!("Failed to parse leads: invalid YAML in {}", path.display()))?
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse leads: invalid JSON in {}", path.display()))?
    };

    Ok(leads)
}

/// Drop repeated leads (same name and website, case-insensitive),
/// keeping the first occurrence and the original order.
pub fn dedup_leads(leads: Vec<Lead>) -> Vec<Lead> {
    let mut seen = HashSet::new();
    leads
        .into_iter()
        .filter(|lead| seen.insert(lead.dedup_key()))
        .collect()
}
