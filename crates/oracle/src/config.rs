use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{OracleError, Result};

/// How the prover is invoked for one leak set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProverConfig {
    /// Executable name or path
    pub binary: String,

    /// Theory file passed to the prover, relative to the project root
    pub theory: PathBuf,

    /// Wall-clock limit for one prover run
    pub timeout_secs: u64,

    /// Value for `--derivcheck-timeout`
    pub derivcheck_timeout_secs: u64,

    /// Value for `-c` (open chain bound)
    pub bound: u32,

    /// Appended after the standard arguments
    pub extra_args: Vec<String>,
}

impl Default for ProverConfig {
    fn default() -> Self {
        Self {
            binary: "tamarin-prover".to_string(),
            theory: PathBuf::from("main.spthy"),
            timeout_secs: 60,
            derivcheck_timeout_secs: 120,
            bound: 50,
            extra_args: Vec::new(),
        }
    }
}

impl ProverConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Arguments following the binary, in invocation order.
    pub fn args(&self, lemma: &str) -> Vec<String> {
        let mut args = vec![
            self.theory.to_string_lossy().into_owned(),
            format!("--derivcheck-timeout={}", self.derivcheck_timeout_secs),
            format!("--prove={lemma}"),
            format!("-c={}", self.bound),
        ];
        args.extend(self.extra_args.iter().cloned());
        args
    }

    pub fn validate(&self) -> Result<()> {
        if self.binary.trim().is_empty() {
            return Err(OracleError::invalid_config("prover.binary must not be empty"));
        }
        if self.timeout_secs == 0 {
            return Err(OracleError::invalid_config("prover.timeout_secs must be > 0"));
        }
        if self.theory.as_os_str().is_empty() {
            return Err(OracleError::invalid_config("prover.theory must not be empty"));
        }
        Ok(())
    }
}

/// Project-relative locations of inputs and outputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Ordered JSON object: leak name -> rule fragment
    pub leak_rules: PathBuf,

    /// JSON object: leak name -> short name (optional file)
    pub short_names: PathBuf,

    /// Where generated leak files are written
    pub leaks_dir: PathBuf,

    /// Root of the audit trail and summary reports
    pub results_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            leak_rules: PathBuf::from("automator/leak_rules.json"),
            short_names: PathBuf::from("automator/leak_rules_short.json"),
            leaks_dir: PathBuf::from("leaks"),
            results_dir: PathBuf::from("results"),
        }
    }
}
