use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::runner::ProverRun;

/// Raw prover output, one file per lemma and leak file.
///
/// ```text
/// results/
///   stdout/<lemma>/<stem>.stdout   always written
///   stderr/<lemma>/<stem>.stderr   only when stderr is non-empty
///   summary_<lemma>.txt
/// ```
#[derive(Debug, Clone)]
pub struct AuditTrail {
    results_dir: PathBuf,
}

impl AuditTrail {
    pub fn new(results_dir: impl Into<PathBuf>) -> Self {
        Self {
            results_dir: results_dir.into(),
        }
    }

    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }

    pub fn stdout_path(&self, lemma: &str, stem: &str) -> PathBuf {
        self.results_dir
            .join("stdout")
            .join(lemma)
            .join(format!("{stem}.stdout"))
    }

    pub fn stderr_path(&self, lemma: &str, stem: &str) -> PathBuf {
        self.results_dir
            .join("stderr")
            .join(lemma)
            .join(format!("{stem}.stderr"))
    }

    pub fn summary_path(&self, lemma: &str) -> PathBuf {
        self.results_dir.join(format!("summary_{lemma}.txt"))
    }

    pub fn record(&self, lemma: &str, stem: &str, run: &ProverRun) -> Result<()> {
        let stdout_path = self.stdout_path(lemma, stem);
        let stderr_path = self.stderr_path(lemma, stem);
        for path in [&stdout_path, &stderr_path] {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(&stdout_path, &run.stdout)?;
        if !run.stderr.is_empty() {
            fs::write(&stderr_path, &run.stderr)?;
        }
        Ok(())
    }
}
