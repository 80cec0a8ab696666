use std::collections::BTreeMap;
use std::io::IsTerminal;

use owo_colors::OwoColorize;
use terminal_size::{terminal_size, Width};

use crate::leads::ScoredLead;
use crate::qualify::QualityTier;
use crate::scoring::ScoreBreakdown;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate to fit available width, counting chars rather than bytes
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn paint_tier(label: &str, tier: QualityTier) -> String {
    match tier {
        QualityTier::Excellent => label.green().bold().to_string(),
        QualityTier::Good => label.cyan().to_string(),
        QualityTier::Medium => label.yellow().to_string(),
        QualityTier::Low => label.dimmed().to_string(),
    }
}

/// Format scored leads as a table: index, score, tier, status, name, website.
/// High-quality leads are marked with `*`.
pub fn format_scored_table(leads: &[ScoredLead], use_colors: bool) -> String {
    if leads.is_empty() {
        return "No leads found.".to_string();
    }

    let term_width = get_terminal_width();

    // " 1." + space, "100*" + 2, tier (9) + 2, status (11) + 2
    let index_width = 4;
    let score_width = 4;
    let tier_width = 9;
    let status_width = 11;
    let separator = "  ";

    leads
        .iter()
        .enumerate()
        .map(|(idx, scored)| {
            let index_str = format!("{:>3}.", idx + 1);
            let marker = if scored.high_quality { "*" } else { " " };
            let score_str = format!("{:>3}{}", scored.score, marker);
            let tier_str = format!("{:<width$}", scored.tier.as_str(), width = tier_width);
            let status_str = format!(
                "{:<width$}",
                scored.website_status.as_str(),
                width = status_width
            );
            let website = scored.lead.website().unwrap_or("-");

            let fixed_width = index_width
                + 1
                + score_width
                + tier_width
                + status_width
                + separator.len() * 4
                + website.chars().count();

            let name = match term_width {
                Some(width) if width > fixed_width + 10 => {
                    truncate_name(scored.lead.name(), width - fixed_width)
                }
                Some(_) => truncate_name(scored.lead.name(), 20),
                None => scored.lead.name().to_string(),
            };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}{}{}{}{}",
                    index_str.dimmed(),
                    score_str.bold(),
                    separator,
                    paint_tier(&tier_str, scored.tier),
                    separator,
                    status_str,
                    separator,
                    name,
                    separator,
                    website.underline()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}{}{}{}",
                    index_str,
                    score_str,
                    separator,
                    tier_str,
                    separator,
                    status_str,
                    separator,
                    name,
                    separator,
                    website
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Multi-line detail for one lead, including how each factor moved the score
pub fn format_lead_detail(scored: &ScoredLead, breakdown: &ScoreBreakdown, use_colors: bool) -> String {
    let mut lines = Vec::new();

    let header = format!(
        "{} ({}, {})",
        scored.lead.name(),
        scored.lead.profile(),
        scored.website_status
    );
    lines.push(if use_colors {
        header.bold().to_string()
    } else {
        header
    });

    for factor in &breakdown.factors {
        let delta = factor.after - factor.before;
        let delta_str = format!("{:+.1}", delta);
        let delta_str = if !use_colors {
            delta_str
        } else if delta > 0.0 {
            delta_str.green().to_string()
        } else if delta < 0.0 {
            delta_str.red().to_string()
        } else {
            delta_str.dimmed().to_string()
        };
        lines.push(format!(
            "  {:<16} {:>7}  {}",
            factor.label, delta_str, factor.description
        ));
    }

    if breakdown.raw_total != f64::from(scored.score) {
        lines.push(format!("  Raw total: {:.1}", breakdown.raw_total));
    }

    let verdict = if scored.high_quality { "high quality" } else { "below threshold" };
    lines.push(format!(
        "  Score: {} ({}, {})",
        scored.score, scored.tier, verdict
    ));

    lines.join("\n")
}

/// Summary block: counts per tier, average, and how many qualified
pub fn format_tier_summary(
    distribution: &BTreeMap<QualityTier, usize>,
    average: Option<f64>,
    high_quality: usize,
    use_colors: bool,
) -> String {
    let total: usize = distribution.values().sum();
    let mut lines = vec![format!("Leads: {}  High quality: {}", total, high_quality)];

    if let Some(avg) = average {
        lines.push(format!("Average score: {:.1}", avg));
    }

    // Highest tier first
    for (tier, count) in distribution.iter().rev() {
        let label = format!("{:<9} ({:>6})", tier.as_str(), tier.range_label());
        let label = if use_colors {
            paint_tier(&label, *tier)
        } else {
            label
        };
        lines.push(format!("  {}  {}", label, count));
    }

    lines.join("\n")
}

/// Tab-separated values for scripting
/// Columns: score, tier, website_status, name, website (no headers, no colors)
pub fn format_tsv(leads: &[ScoredLead]) -> String {
    if leads.is_empty() {
        return String::new();
    }

    leads
        .iter()
        .map(|scored| {
            format!(
                "{}\t{}\t{}\t{}\t{}",
                scored.score,
                scored.tier,
                scored.website_status,
                scored.lead.name(),
                scored.lead.website().unwrap_or_default()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
