use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use chrono::NaiveDateTime;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::ExportFormat;
use crate::leads::{Company, Lead, LocalBusiness, ScoredLead};

const LOCAL_HEADER: &str = "name,category,location,phone,website,rating,review_count,website_status,score,tier,high_quality";
const COMPANY_HEADER: &str = "name,website,industry,funding_stage,funding_amount,funding_date,employee_count,location,load_time,has_mobile_issues,generator,website_status,score,tier,high_quality";

pub(crate) fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn opt_str(value: &Option<String>) -> String {
    value.as_deref().map(escape_csv).unwrap_or_default()
}

fn opt_display<T: ToString>(value: Option<T>) -> String {
    value.map(|v| escape_csv(&v.to_string())).unwrap_or_default()
}

fn derived_columns(scored: &ScoredLead) -> String {
    format!(
        "{},{},{},{}",
        scored.website_status, scored.score, scored.tier, scored.high_quality
    )
}

fn local_row(business: &LocalBusiness, scored: &ScoredLead) -> String {
    format!(
        "{},{},{},{},{},{},{},{}",
        escape_csv(&business.name),
        opt_str(&business.category),
        opt_str(&business.location),
        opt_str(&business.phone),
        opt_str(&business.website),
        opt_display(business.rating.map(|r| format!("{:.1}", r))),
        opt_display(business.review_count),
        derived_columns(scored)
    )
}

fn company_row(company: &Company, scored: &ScoredLead) -> String {
    let audit = company.website_audit.as_ref();
    format!(
        "{},{},{},{},{},{},{},{},{},{},{},{}",
        escape_csv(&company.name),
        opt_str(&company.website),
        opt_str(&company.industry),
        opt_display(company.funding_stage.as_ref()),
        opt_display(company.funding_amount.map(|a| format!("{:.0}", a))),
        opt_display(company.funding_date),
        opt_display(company.employee_count),
        opt_str(&company.location),
        opt_display(audit.and_then(|a| a.load_time_secs).map(|t| format!("{:.2}", t))),
        opt_display(audit.and_then(|a| a.has_viewport).map(|v| !v)),
        opt_str(&audit.and_then(|a| a.generator.clone())),
        derived_columns(scored)
    )
}

/// CSV of the local-business leads in `leads`, header included.
/// Company leads are skipped.
pub fn to_local_csv(leads: &[ScoredLead]) -> String {
    let mut csv = String::from(LOCAL_HEADER);
    csv.push('\n');
    for scored in leads {
        if let Lead::Local(ref business) = scored.lead {
            csv.push_str(&local_row(business, scored));
            csv.push('\n');
        }
    }
    csv
}

/// CSV of the company leads in `leads`, header included.
/// Local-business leads are skipped.
pub fn to_company_csv(leads: &[ScoredLead]) -> String {
    let mut csv = String::from(COMPANY_HEADER);
    csv.push('\n');
    for scored in leads {
        if let Lead::Company(ref company) = scored.lead {
            csv.push_str(&company_row(company, scored));
            csv.push('\n');
        }
    }
    csv
}

pub fn to_json(leads: &[ScoredLead]) -> Result<String> {
    serde_json::to_string_pretty(leads).context("Failed to serialize leads to JSON")
}

pub(crate) fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(contents.as_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save {}", path.display()))?;
    Ok(())
}

/// Write the export files into `dir` and return their paths.
///
/// CSV output is split per profile and a profile with no leads gets no file.
/// `stamp` names the files so repeated runs do not overwrite each other.
pub fn export_leads(
    leads: &[ScoredLead],
    format: ExportFormat,
    dir: &Path,
    stamp: NaiveDateTime,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let suffix = stamp.format("%Y%m%d_%H%M%S").to_string();
    let mut written = Vec::new();

    if matches!(format, ExportFormat::Csv | ExportFormat::Both) {
        let has_local = leads.iter().any(|l| matches!(l.lead, Lead::Local(_)));
        let has_company = leads.iter().any(|l| matches!(l.lead, Lead::Company(_)));

        if has_local {
            let path = dir.join(format!("leads_local_{}.csv", suffix));
            write_atomic(&path, &to_local_csv(leads))?;
            written.push(path);
        }
        if has_company {
            let path = dir.join(format!("leads_company_{}.csv", suffix));
            write_atomic(&path, &to_company_csv(leads))?;
            written.push(path);
        }
    }

    if matches!(format, ExportFormat::Json | ExportFormat::Both) {
        let path = dir.join(format!("leads_{}.json", suffix));
        write_atomic(&path, &to_json(leads)?)?;
        written.push(path);
    }

    for path in &written {
        tracing::info!("Exported {}", path.display());
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leads::{FundingStage, WebsiteAudit, WebsiteStatus};
    use crate::qualify::QualityTier;
    use chrono::NaiveDate;

    fn scored(lead: Lead, score: u8, status: WebsiteStatus) -> ScoredLead {
        ScoredLead {
            lead,
            website_status: status,
            score,
            tier: QualityTier::from_score(score),
            high_quality: score > 50,
        }
    }

    fn sample_batch() -> Vec<ScoredLead> {
        vec![
            scored(
                Lead::Local(LocalBusiness {
                    name: "Joe's Pizza, Inc".to_string(),
                    category: Some("Restaurant".to_string()),
                    rating: Some(4.8),
                    review_count: Some(500),
                    ..LocalBusiness::default()
                }),
                98,
                WebsiteStatus::None,
            ),
            scored(
                Lead::Company(Company {
                    name: "Acme".to_string(),
                    website: Some("https://acme.io".to_string()),
                    funding_stage: Some(FundingStage::SeriesA),
                    funding_amount: Some(8_000_000.0),
                    funding_date: NaiveDate::from_ymd_opt(2025, 5, 1),
                    website_audit: Some(WebsiteAudit {
                        load_time_secs: Some(5.0),
                        has_viewport: Some(false),
                        generator: Some("WordPress 4.9".to_string()),
                        scripts: vec![],
                    }),
                    ..Company::default()
                }),
                95,
                WebsiteStatus::Official,
            ),
        ]
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("simple"), "simple");
        assert_eq!(escape_csv("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv("with\"quote"), "\"with\"\"quote\"");
    }

    #[test]
    fn test_local_csv_rows() {
        let csv = to_local_csv(&sample_batch());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], LOCAL_HEADER);
        assert_eq!(
            lines[1],
            "\"Joe's Pizza, Inc\",Restaurant,,,,4.8,500,NONE,98,excellent,true"
        );
    }

    #[test]
    fn test_company_csv_rows() {
        let csv = to_company_csv(&sample_batch());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            "Acme,https://acme.io,,series-a,8000000,2025-05-01,,,5.00,true,WordPress 4.9,OFFICIAL,95,excellent,true"
        );
    }

    #[test]
    fn test_json_is_flat_and_tagged() {
        let json = to_json(&sample_batch()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["profile"], "local");
        assert_eq!(value[0]["website_status"], "NONE");
        assert_eq!(value[1]["profile"], "company");
        assert_eq!(value[1]["tier"], "excellent");
        assert_eq!(value[1]["high_quality"], true);
    }

    #[test]
    fn test_export_leads_writes_files() {
        let dir = std::env::temp_dir().join("lead_scout_test_export");
        let _ = std::fs::remove_dir_all(&dir);
        let stamp = NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap();

        let written = export_leads(&sample_batch(), ExportFormat::Both, &dir, stamp).unwrap();
        let names: Vec<String> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "leads_local_20250601_123000.csv",
                "leads_company_20250601_123000.csv",
                "leads_20250601_123000.json",
            ]
        );
        assert!(written.iter().all(|p| p.exists()));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_export_csv_only_skips_empty_profiles() {
        let dir = std::env::temp_dir().join("lead_scout_test_export_csv_only");
        let _ = std::fs::remove_dir_all(&dir);
        let stamp = NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();

        let local_only: Vec<ScoredLead> = sample_batch().into_iter().take(1).collect();
        let written = export_leads(&local_only, ExportFormat::Csv, &dir, stamp).unwrap();
        assert_eq!(written.len(), 1);
        assert!(written[0].to_string_lossy().contains("leads_local_"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
