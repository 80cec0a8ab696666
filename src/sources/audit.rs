use anyhow::{anyhow, Result};
use scraper::{Html, Selector};
use std::time::Instant;
use tokio_retry::Retry;

use super::http::HttpPolicy;
use crate::leads::WebsiteAudit;

/// Inspect a page's markup for the signals the company profile scores on.
///
/// Markup inside comments or script bodies is never read as a tag.
pub fn analyze_html(html: &str, load_time_secs: f64) -> WebsiteAudit {
    let document = Html::parse_document(html);
    let mut has_viewport = false;
    let mut generator = None;
    let mut scripts = Vec::new();

    if let Ok(meta) = Selector::parse("meta[name]") {
        for el in document.select(&meta) {
            let name = el.value().attr("name").unwrap_or_default().trim();
            if name.eq_ignore_ascii_case("viewport") {
                has_viewport = true;
            } else if name.eq_ignore_ascii_case("generator") && generator.is_none() {
                generator = el
                    .value()
                    .attr("content")
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(str::to_string);
            }
        }
    }

    if let Ok(script) = Selector::parse("script[src]") {
        scripts = document
            .select(&script)
            .filter_map(|el| el.value().attr("src"))
            .map(str::trim)
            .filter(|src| !src.is_empty())
            .map(str::to_string)
            .collect();
    }

    WebsiteAudit {
        load_time_secs: Some(load_time_secs),
        has_viewport: Some(has_viewport),
        generator,
        scripts,
    }
}

/// Add `https://` to bare domains
pub fn normalize_url(url: &str) -> String {
    let trimmed = url.trim();
    if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

/// Fetch `url` and audit it.
///
/// `load_time_secs` is the time from sending the request to reading the full
/// body, measured on the attempt that succeeded. Failed attempts and backoff
/// delays are not counted. This is server response time, not a browser page
/// load: no scripts, images or stylesheets are fetched.
pub async fn audit_website(
    client: &reqwest::Client,
    url: &str,
    policy: &HttpPolicy,
) -> Result<WebsiteAudit> {
    let target = normalize_url(url);

    let (body, elapsed) = Retry::spawn(policy.retry_strategy(), || async {
        let started = Instant::now();
        let response = client
            .get(&target)
            .send()
            .await
            .map_err(|e| anyhow!("Request to {} failed: {}", target, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("{} returned HTTP {}", target, status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| anyhow!("Failed to read body from {}: {}", target, e))?;
        Ok((body, started.elapsed()))
    })
    .await?;

    tracing::debug!("Audited {} in {:.2}s", target, elapsed.as_secs_f64());
    Ok(analyze_html(&body, elapsed.as_secs_f64()))
}
