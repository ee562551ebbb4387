use std::path::{Path, PathBuf};

use leakcut_cutset::{LeakSet, Predicate};
use serde::Serialize;

use crate::artifact::ArtifactWriter;
use crate::audit::AuditTrail;
use crate::catalog::LeakCatalog;
use crate::config::{PathsConfig, ProverConfig};
use crate::error::Result;
use crate::runner::{ProverRun, RunStatus, VerifierRunner};
use crate::verdict::{Verdict, VerdictParser};

/// An evaluation that ended without a verdict marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InconclusiveEvaluation {
    pub set: LeakSet,
    pub file_name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OracleStats {
    pub falsified: usize,
    pub verified: usize,
    pub inconclusive: usize,
}

/// Tamarin-backed predicate for one lemma.
///
/// Each evaluation writes the leak file, rewrites the theory, runs the prover, persists
/// its raw output and parses the verdict. Nothing here returns an error to the search:
/// failures become [`Verdict::Inconclusive`], which the predicate reads as `false`.
pub struct TamarinOracle<'c> {
    catalog: &'c LeakCatalog,
    lemma: String,
    writer: ArtifactWriter,
    runner: VerifierRunner,
    audit: AuditTrail,
    parser: VerdictParser,
    stats: OracleStats,
    inconclusive: Vec<InconclusiveEvaluation>,
}

impl<'c> TamarinOracle<'c> {
    pub fn new(
        catalog: &'c LeakCatalog,
        lemma: impl Into<String>,
        writer: ArtifactWriter,
        runner: VerifierRunner,
        audit: AuditTrail,
    ) -> Result<Self> {
        let lemma = lemma.into();
        let parser = VerdictParser::new(&lemma)?;
        Ok(Self {
            catalog,
            lemma,
            writer,
            runner,
            audit,
            parser,
            stats: OracleStats::default(),
            inconclusive: Vec::new(),
        })
    }

    /// Wire writer, runner and audit trail from project-relative configuration.
    pub fn for_project(
        catalog: &'c LeakCatalog,
        lemma: impl Into<String>,
        project_root: &Path,
        prover: ProverConfig,
        paths: &PathsConfig,
    ) -> Result<Self> {
        let writer = ArtifactWriter::new(
            project_root.join(&paths.leaks_dir),
            project_root.join(&prover.theory),
        );
        let audit = AuditTrail::new(project_root.join(&paths.results_dir));
        let runner = VerifierRunner::new(prover, project_root)?;
        Self::new(catalog, lemma, writer, runner, audit)
    }

    pub fn lemma(&self) -> &str {
        &self.lemma
    }

    pub fn audit(&self) -> &AuditTrail {
        &self.audit
    }

    pub fn stats(&self) -> OracleStats {
        self.stats
    }

    pub fn inconclusive(&self) -> &[InconclusiveEvaluation] {
        &self.inconclusive
    }

    /// Where the raw stdout of `set`'s evaluation is kept.
    pub fn stdout_path(&self, set: &LeakSet) -> PathBuf {
        self.audit.stdout_path(&self.lemma, &self.catalog.file_stem(set))
    }

    pub fn evaluate(&mut self, set: &LeakSet) -> Verdict {
        let stem = self.catalog.file_stem(set);
        let verdict = match self.writer.write(self.catalog, set) {
            Ok(_) => {
                let run = self.runner.run(&self.lemma);
                self.persist(&stem, &run);
                self.classify(&run)
            }
            Err(err) => {
                let reason = format!("artifact generation failed: {err}");
                self.persist(&stem, &ProverRun::launch_failed(reason.clone()));
                Verdict::Inconclusive { reason }
            }
        };

        match &verdict {
            Verdict::Falsified => self.stats.falsified += 1,
            Verdict::Verified => self.stats.verified += 1,
            Verdict::Inconclusive { reason } => {
                log::warn!(
                    "Inconclusive result for {} on {}: {reason}; treating as not falsified",
                    self.catalog.order().display(set),
                    self.lemma
                );
                self.stats.inconclusive += 1;
                self.inconclusive.push(InconclusiveEvaluation {
                    set: set.clone(),
                    file_name: self.catalog.file_name(set),
                    reason: reason.clone(),
                });
            }
        }
        verdict
    }

    fn classify(&self, run: &ProverRun) -> Verdict {
        match &run.status {
            RunStatus::TimedOut(limit) => Verdict::Inconclusive {
                reason: format!("prover timed out after {}s", limit.as_secs()),
            },
            RunStatus::LaunchFailed(message) => Verdict::Inconclusive {
                reason: message.clone(),
            },
            RunStatus::Exited(code) => match self.parser.parse(&run.stdout) {
                Some(true) => Verdict::Falsified,
                Some(false) => Verdict::Verified,
                None => Verdict::Inconclusive {
                    reason: format!(
                        "no verdict for {} in prover output (exit code {})",
                        self.lemma,
                        code.map_or_else(|| "none".to_string(), |c| c.to_string())
                    ),
                },
            },
        }
    }

    fn persist(&self, stem: &str, run: &ProverRun) {
        if let Err(err) = self.audit.record(&self.lemma, stem, run) {
            log::warn!("Failed to write audit output for {stem}: {err}");
        }
    }
}

impl Predicate for TamarinOracle<'_> {
    fn holds(&mut self, set: &LeakSet) -> bool {
        self.evaluate(set).is_falsified()
    }
}
