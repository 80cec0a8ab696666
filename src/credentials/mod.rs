use std::fmt;

/// Environment variable holding the Apollo.io API key
pub const ENV_APOLLO_KEY: &str = "APOLLO_API_KEY";

#[derive(Debug)]
pub enum CredentialError {
    KeyNotSet(&'static str),
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialError::KeyNotSet(var) => {
                write!(f, "API key not found. Set the {} environment variable", var)
            }
        }
    }
}

impl std::error::Error for CredentialError {}

/// Read the Apollo.io API key from the environment.
pub fn get_apollo_key() -> Result<String, CredentialError> {
    non_empty(std::env::var(ENV_APOLLO_KEY).ok()).ok_or(CredentialError::KeyNotSet(ENV_APOLLO_KEY))
}

/// Trimmed value, or None when missing or blank
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
