use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use console::style;
use leakcut_cutset::{LeakSet, SearchOutcome, SearchStats};
use leakcut_oracle::{AuditTrail, LeakCatalog, OracleStats, TamarinOracle};
use serde::Serialize;

use crate::progress::banner;

const RULE: &str = "================================================================================";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CutsetEntry {
    /// Members in catalog order
    pub leaks: Vec<String>,
    pub file: String,
    pub stdout: PathBuf,
    pub size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InconclusiveEntry {
    pub leaks: Vec<String>,
    pub file: String,
    pub reason: String,
}

/// Final result of one run, rendered as the summary file, console output or JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub lemma: String,
    pub leak_types: Vec<String>,
    pub initial_check_passed: bool,
    pub cutsets: Vec<CutsetEntry>,
    pub inconclusive: Vec<InconclusiveEntry>,
    pub search: SearchStats,
    pub verdicts: OracleStats,
    pub summary_file: PathBuf,
    pub elapsed_secs: f64,
}

impl RunSummary {
    /// `audit` renders the per-cut-set stdout paths.
    pub fn new(
        catalog: &LeakCatalog,
        outcome: &SearchOutcome,
        oracle: &TamarinOracle<'_>,
        audit: &AuditTrail,
        elapsed: Duration,
    ) -> Self {
        let order = catalog.order();
        let owned = |set: &LeakSet| -> Vec<String> {
            order.names(set).into_iter().map(str::to_string).collect()
        };
        let lemma = oracle.lemma().to_string();

        let cutsets = outcome
            .cutsets
            .iter()
            .map(|set| CutsetEntry {
                leaks: owned(set),
                file: catalog.file_name(set),
                stdout: audit.stdout_path(&lemma, &catalog.file_stem(set)),
                size: set.len(),
            })
            .collect();
        let inconclusive = oracle
            .inconclusive()
            .iter()
            .map(|entry| InconclusiveEntry {
                leaks: owned(&entry.set),
                file: entry.file_name.clone(),
                reason: entry.reason.clone(),
            })
            .collect();

        Self {
            summary_file: audit.summary_path(&lemma),
            lemma,
            leak_types: catalog.names().into_iter().map(str::to_string).collect(),
            initial_check_passed: outcome.initial_check_passed,
            cutsets,
            inconclusive,
            search: outcome.stats.clone(),
            verdicts: oracle.stats(),
            elapsed_secs: elapsed.as_secs_f64(),
        }
    }

    /// Contents of `summary_<lemma>.txt`.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(RULE);
        out.push('\n');
        out.push_str(&format!("SUMMARY REPORT: {}\n", self.lemma));
        out.push_str(RULE);
        out.push_str("\n\n");

        out.push_str(&format!("Lemma tested: {}\n", self.lemma));
        out.push_str(&format!(
            "Total available leak types: {}\n",
            self.leak_types.len()
        ));
        out.push_str(&format!("Leak types: {}\n\n", self.leak_types.join(", ")));

        out.push_str(&format!(
            "Found {} minimal cut-sets that violate the security property:\n\n",
            self.cutsets.len()
        ));
        for (idx, entry) in self.cutsets.iter().enumerate() {
            out.push_str(&format!("  {}. {}\n", idx + 1, entry.leaks.join(", ")));
            out.push_str(&format!("     File: {}\n", entry.file));
            out.push_str(&format!("     Leak count: {}\n\n", entry.size));
        }

        if !self.inconclusive.is_empty() {
            out.push_str(&format!(
                "Inconclusive evaluations (treated as not falsified): {}\n\n",
                self.inconclusive.len()
            ));
            for entry in &self.inconclusive {
                out.push_str(&format!(
                    "  - {{{}}} ({}): {}\n",
                    entry.leaks.join(", "),
                    entry.file,
                    entry.reason
                ));
            }
            out.push('\n');
        }

        out.push_str(RULE);
        out.push('\n');
        out
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(path, self.render_text())
            .with_context(|| format!("Failed to write summary report {}", path.display()))
    }

    pub fn print(&self) {
        println!();
        banner("Results Summary");
        println!(
            "Found {} minimal mincutset(s) that violate '{}':\n",
            self.cutsets.len(),
            style(&self.lemma).magenta()
        );

        if self.cutsets.is_empty() {
            println!(
                "  No minimal mincutsets found - security property holds for all leak combinations."
            );
        }
        for (idx, entry) in self.cutsets.iter().enumerate() {
            println!("  [{}] {}", idx + 1, style(entry.leaks.join(", ")).red());
            println!("      Size: {} leak(s)", entry.size);
            println!("      Stdout: {}\n", entry.stdout.display());
        }

        if !self.inconclusive.is_empty() {
            println!(
                "  {} {} evaluation(s) ended without a verdict and were treated as not falsified:",
                style("Warning:").yellow().bold(),
                self.inconclusive.len()
            );
            for entry in &self.inconclusive {
                println!("    {} ({}): {}", entry.leaks.join(", "), entry.file, entry.reason);
            }
            println!();
        }

        println!(
            "  Oracle calls: {} | Cache hits: {} | Nodes visited: {}",
            self.search.oracle_calls, self.search.cache_hits, self.search.nodes_visited
        );
        println!("  Summary report: {}", self.summary_file.display());
    }
}
