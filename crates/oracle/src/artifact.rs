use std::fs;
use std::path::{Path, PathBuf};

use leakcut_cutset::LeakSet;
use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

use crate::catalog::LeakCatalog;
use crate::error::{OracleError, Result};

static INCLUDE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"#include\s+"leaks/[^"]+""#).expect("valid include regex"));
static THEORY_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^theory\s+leak\w+").expect("valid theory regex"));

/// A generated leak file for one leak set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// `AipSk` (or `NoLeaks` for the empty set)
    pub stem: String,
    /// `AipSk.spthy`
    pub file_name: String,
    pub path: PathBuf,
}

/// Writes leak files and points the theory file at the current one.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    leaks_dir: PathBuf,
    theory_path: PathBuf,
}

impl ArtifactWriter {
    pub fn new(leaks_dir: impl Into<PathBuf>, theory_path: impl Into<PathBuf>) -> Self {
        Self {
            leaks_dir: leaks_dir.into(),
            theory_path: theory_path.into(),
        }
    }

    pub fn leaks_dir(&self) -> &Path {
        &self.leaks_dir
    }

    pub fn theory_path(&self) -> &Path {
        &self.theory_path
    }

    /// Write `leaks/<stem>.spthy` and rewrite the theory's include and name.
    pub fn write(&self, catalog: &LeakCatalog, set: &LeakSet) -> Result<Artifact> {
        let stem = catalog.file_stem(set);
        let file_name = catalog.file_name(set);
        let path = self.leaks_dir.join(&file_name);

        fs::create_dir_all(&self.leaks_dir)?;
        fs::write(&path, catalog.render(set))?;
        self.point_theory_at(&file_name, &stem)?;

        Ok(Artifact {
            stem,
            file_name,
            path,
        })
    }

    fn point_theory_at(&self, file_name: &str, stem: &str) -> Result<()> {
        if !self.theory_path.exists() {
            return Err(OracleError::TheoryNotFound(self.theory_path.clone()));
        }
        let content = fs::read_to_string(&self.theory_path)?;
        let include = format!("#include \"leaks/{file_name}\"");
        let theory = format!("theory leak{stem}");
        let content = INCLUDE_LINE.replace_all(&content, NoExpand(&include));
        let content = THEORY_LINE.replace_all(&content, NoExpand(&theory));
        fs::write(&self.theory_path, content.as_bytes())?;
        Ok(())
    }
}
