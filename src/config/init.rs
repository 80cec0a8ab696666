use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::Write;
use std::path::Path;

use super::{ensure_parent_dir, Config};

const HEADER: &str = "\
# lead-scout configuration
#
# scoring.local    weights for maps-style local businesses
# scoring.company  weights for funded companies (bonuses are summed, then clamped to 0-100)
# Durations use humantime syntax (\"3s\", \"180days\"); employee ranges use \"<N\", \">=N\", \"N-M\".

";

/// Write the full default configuration to `path`.
///
/// Refuses to overwrite an existing file unless `force` is set. The write is
/// atomic, so an interrupted run never leaves a half-written config behind.
pub fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite",
            path.display()
        );
    }

    ensure_parent_dir(path)?;

    let yaml = serde_saphyr::to_string(&Config::full_default())
        .context("Failed to serialize default config")?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(HEADER.as_bytes())
        .and_then(|_| file.write_all(yaml.as_bytes()))
        .context("Failed to write config")?;
    file.commit().context("Failed to save config")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;
    use std::env;

    #[test]
    fn test_written_config_loads_back() {
        let path = env::temp_dir()
            .join("lead_scout_test_init")
            .join("config.yaml");
        let _ = std::fs::remove_file(&path);

        write_default_config(&path, false).unwrap();
        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded, Config::full_default());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_refuses_overwrite_without_force() {
        let path = env::temp_dir().join("lead_scout_test_init_existing.yaml");
        std::fs::write(&path, "{}").unwrap();

        assert!(write_default_config(&path, false).is_err());
        assert!(write_default_config(&path, true).is_ok());

        let _ = std::fs::remove_file(&path);
    }
}
