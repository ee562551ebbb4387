//! `leakcut.toml` loading and command-line overrides

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use leakcut_cutset::SearchOptions;
use leakcut_oracle::{PathsConfig, ProverConfig};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = "leakcut.toml";

/// Everything a run needs besides the lemma name.
///
/// ```toml
/// [prover]
/// binary = "tamarin-prover"
/// timeout_secs = 60
///
/// [paths]
/// leak_rules = "automator/leak_rules.json"
///
/// [search]
/// prune_dominated = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub prover: ProverConfig,
    pub paths: PathsConfig,
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Skip nodes already dominated by a recorded cut-set before evaluating them
    pub prune_dominated: bool,

    /// Sets below this size are treated as not falsifying (0 = no limit)
    pub min_size: usize,

    /// Only use the first N leaks of the catalog
    pub limit_leaks: Option<usize>,
}

/// Values given on the command line; `None` keeps the file value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub prover: Option<String>,
    pub timeout_secs: Option<u64>,
    pub min_size: Option<usize>,
    pub limit_leaks: Option<usize>,
    pub prune_dominated: bool,
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// An explicit path must exist; otherwise `<project>/leakcut.toml` is used when
    /// present and defaults apply when it is not.
    pub fn load(project_root: &Path, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        let candidate: PathBuf = project_root.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            log::debug!("Loading configuration from {}", candidate.display());
            Self::from_file(&candidate)
        } else {
            log::debug!("No {CONFIG_FILE_NAME} in {}; using defaults", project_root.display());
            Ok(Self::default())
        }
    }

    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(binary) = &overrides.prover {
            self.prover.binary = binary.clone();
        }
        if let Some(timeout_secs) = overrides.timeout_secs {
            self.prover.timeout_secs = timeout_secs;
        }
        if let Some(min_size) = overrides.min_size {
            self.search.min_size = min_size;
        }
        if let Some(limit) = overrides.limit_leaks {
            self.search.limit_leaks = Some(limit);
        }
        if overrides.prune_dominated {
            self.search.prune_dominated = true;
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.prover.validate()?;
        if self.search.limit_leaks == Some(0) {
            bail!("search.limit_leaks must be > 0");
        }
        if self.paths.leak_rules.as_os_str().is_empty() {
            bail!("paths.leak_rules must not be empty");
        }
        Ok(())
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            prune_dominated: self.search.prune_dominated,
            min_size: self.search.min_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let config = AppConfig::load(dir.path(), None).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.prover.binary, "tamarin-prover");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[prover]\ntimeout_secs = 5\n\n[search]\nprune_dominated = true\nlimit_leaks = 6\n",
        )
        .unwrap();

        let config = AppConfig::load(dir.path(), None).unwrap();
        assert_eq!(config.prover.timeout_secs, 5);
        assert_eq!(config.prover.bound, 50);
        assert_eq!(config.paths, PathsConfig::default());
        assert!(config.search.prune_dominated);
        assert_eq!(config.search.limit_leaks, Some(6));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[prover]\ntimeout = 5\n").unwrap();
        assert!(AppConfig::load(dir.path(), Some(&path)).is_err());
    }

    #[test]
    fn explicit_path_must_exist() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(AppConfig::load(dir.path(), Some(&missing)).is_err());
    }

    #[test]
    fn overrides_win_over_file_values() {
        let mut config = AppConfig::default();
        config.search.min_size = 2;
        config.apply_overrides(&Overrides {
            prover: Some("/opt/tamarin/bin/tamarin-prover".to_string()),
            timeout_secs: Some(300),
            min_size: None,
            limit_leaks: Some(4),
            prune_dominated: true,
        });

        assert_eq!(config.prover.binary, "/opt/tamarin/bin/tamarin-prover");
        assert_eq!(config.prover.timeout_secs, 300);
        assert_eq!(config.search.min_size, 2);
        assert_eq!(
            config.search_options(),
            SearchOptions {
                prune_dominated: true,
                min_size: 2,
            }
        );
        assert_eq!(config.search.limit_leaks, Some(4));
    }

    #[test]
    fn validate_rejects_zero_limits() {
        let mut config = AppConfig::default();
        config.search.limit_leaks = Some(0);
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.prover.timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
