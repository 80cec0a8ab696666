mod init;
mod schema;

pub use init::write_default_config;
pub use schema::{ApolloConfig, Config, ExportConfig, ExportFormat, FetchConfig, OutreachConfig};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.config/lead-scout/)
pub fn get_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("lead-scout")
}

/// Get the default config file path (~/.config/lead-scout/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Ensure the parent directory of `path` exists
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory at {}", dir.display()))?;
        }
    }
    Ok(())
}

/// Load configuration from a YAML file
///
/// # Errors
///
/// Returns an error if:
/// - The config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        anyhow::bail!(
            "Config file not found at {}. Run `lead-scout init` to create one",
            path.display()
        );
    }

    let config_content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", path.display()))?;

    Ok(config)
}

/// Resolve the effective configuration.
///
/// An explicit path must exist. Without one, the default path is used when
/// present and the built-in defaults otherwise.
pub fn resolve_config(path: Option<PathBuf>) -> Result<Config> {
    match path {
        Some(explicit) => load_config(&explicit),
        None => {
            let default_path = get_config_path();
            if default_path.exists() {
                load_config(&default_path)
            } else {
                tracing::debug!(
                    "No config at {}, using built-in defaults",
                    default_path.display()
                );
                Ok(Config::full_default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_load_config_missing_file() {
        let path = env::temp_dir().join("lead_scout_test_missing_config.yaml");
        let _ = fs::remove_file(&path);
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_resolve_explicit_path_must_exist() {
        let path = env::temp_dir().join("lead_scout_test_missing_explicit.yaml");
        let _ = fs::remove_file(&path);
        assert!(resolve_config(Some(path)).is_err());
    }

    #[test]
    fn test_load_config_partial_file() {
        let path = env::temp_dir().join("lead_scout_test_partial_config.yaml");
        fs::write(&path, "scoring:\n  qualification:\n    min_score: 60\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.scoring.unwrap().min_score(), 60);
        assert!(config.fetch.is_none());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_config_invalid_yaml() {
        let path = env::temp_dir().join("lead_scout_test_invalid_config.yaml");
        fs::write(&path, "scoring: [unclosed\n").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
        let _ = fs::remove_file(&path);
    }
}
