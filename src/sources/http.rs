use anyhow::{Context, Result};
use std::time::Duration;
use tokio_retry::strategy::ExponentialBackoff;

use crate::config::FetchConfig;
use crate::scoring::factors::parse_window;

/// Timeout and retry policy applied to every outbound request.
#[derive(Debug, Clone)]
pub struct HttpPolicy {
    pub timeout: Duration,
    pub max_retries: usize,
    pub max_concurrent: usize,
    pub user_agent: String,
}

impl HttpPolicy {
    pub fn from_config(config: &FetchConfig) -> Result<Self> {
        let timeout = parse_window(&config.timeout)
            .with_context(|| format!("fetch.timeout: invalid '{}'", config.timeout))?;
        Ok(Self {
            timeout,
            max_retries: config.max_retries,
            max_concurrent: config.max_concurrent.max(1),
            user_agent: config.user_agent.clone(),
        })
    }

    /// Exponential backoff with at most `max_retries` retries
    pub fn retry_strategy(&self) -> impl Iterator<Item = Duration> {
        ExponentialBackoff::from_millis(100)
            .max_delay(Duration::from_secs(5))
            .take(self.max_retries)
    }
}

/// Build a reqwest client that enforces the policy's timeout and user agent
pub fn create_client(policy: &HttpPolicy) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(policy.timeout)
        .user_agent(policy.user_agent.clone())
        .build()
        .context("Failed to build HTTP client")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_from_default_config() {
        let policy = HttpPolicy::from_config(&FetchConfig::default()).unwrap();
        assert_eq!(policy.timeout, Duration::from_secs(10));
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.retry_strategy().count(), 3);
    }

    #[test]
    fn test_policy_rejects_bad_timeout() {
        let config = FetchConfig {
            timeout: "forever".to_string(),
            ..FetchConfig::default()
        };
        let err = HttpPolicy::from_config(&config).unwrap_err();
        assert!(err.to_string().contains("fetch.timeout"));
    }

    #[test]
    fn test_zero_concurrency_is_raised_to_one() {
        let config = FetchConfig {
            max_concurrent: 0,
            ..FetchConfig::default()
        };
        assert_eq!(HttpPolicy::from_config(&config).unwrap().max_concurrent, 1);
    }

    #[test]
    fn test_retry_delays_are_capped() {
        let policy = HttpPolicy {
            timeout: Duration::from_secs(1),
            max_retries: 5,
            max_concurrent: 1,
            user_agent: "test".to_string(),
        };
        assert!(policy
            .retry_strategy()
            .all(|delay| delay <= Duration::from_secs(5)));
    }
}
