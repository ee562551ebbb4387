use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use leakcut_cutset::{CutsetSearch, NoopObserver, SearchObserver};
use leakcut_oracle::{AuditTrail, LeakCatalog, TamarinOracle};

use crate::config::{AppConfig, Overrides};
use crate::progress::{banner, ConsoleProgress};
use crate::report::RunSummary;

mod config;
mod progress;
mod report;

#[derive(Parser)]
#[command(name = "leakcut")]
#[command(about = "Find every minimal leak combination that falsifies a Tamarin lemma", long_about = None)]
#[command(version)]
struct Cli {
    /// Lemma to check (e.g. TestCardCloningResistance)
    lemma: String,

    /// Project root containing the theory, leak catalog and output directories
    #[arg(long, default_value = ".")]
    project: PathBuf,

    /// Configuration file (default: <project>/leakcut.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Only use the first N leaks of the catalog
    #[arg(long, value_name = "N")]
    limit_leaks: Option<usize>,

    /// Treat sets smaller than N as not falsifying
    #[arg(long, value_name = "N")]
    min_size: Option<usize>,

    /// Per-run prover timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout_secs: Option<u64>,

    /// Prover executable
    #[arg(long, value_name = "BIN")]
    prover: Option<String>,

    /// Skip sets already covered by a recorded cut-set before running the prover
    #[arg(long)]
    prune_dominated: bool,

    /// Print the summary as JSON on stdout (implies --quiet)
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long)]
    quiet: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            prover: self.prover.clone(),
            timeout_secs: self.timeout_secs,
            min_size: self.min_size,
            limit_leaks: self.limit_leaks,
            prune_dominated: self.prune_dominated,
        }
    }
}

fn main() -> Result<()> {
    let started = Instant::now();
    let mut cli = Cli::parse();
    if cli.json {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let mut config = AppConfig::load(&cli.project, cli.config.as_deref())?;
    config.apply_overrides(&cli.overrides());
    config.validate().context("Invalid configuration")?;

    let rules_path = cli.project.join(&config.paths.leak_rules);
    let catalog = LeakCatalog::load(&rules_path, &cli.project.join(&config.paths.short_names))
        .with_context(|| format!("Failed to load leak catalog {}", rules_path.display()))?;
    let catalog = match config.search.limit_leaks {
        Some(limit) => {
            let limited = catalog.truncated(limit)?;
            if !cli.json {
                println!(
                    "{} Limited to first {} leaks from the catalog",
                    style("[TEST MODE]").yellow(),
                    limited.len()
                );
                println!(
                    "{} Using leaks: {}\n",
                    style("[TEST MODE]").yellow(),
                    limited.names().join(", ")
                );
            }
            limited
        }
        None => catalog,
    };
    if config.search.min_size > 0 && !cli.json {
        println!(
            "{} Starting from sets of size {} (skipping smaller sets)\n",
            style("[TEST MODE]").yellow(),
            config.search.min_size
        );
    }

    let oracle = TamarinOracle::for_project(
        &catalog,
        &cli.lemma,
        &cli.project,
        config.prover.clone(),
        &config.paths,
    )?;

    // Paths shown to the user stay relative to the project root.
    let display_audit = AuditTrail::new(&config.paths.results_dir);
    let mut progress = ConsoleProgress::new(&catalog, &cli.lemma, display_audit.clone());
    let mut silent = NoopObserver;
    let observer: &mut dyn SearchObserver = if cli.json {
        &mut silent
    } else {
        progress.print_configuration();
        &mut progress
    };

    let mut search =
        CutsetSearch::new(catalog.order(), oracle, observer).with_options(config.search_options());
    let outcome = search.run();
    let (oracle, _) = search.into_parts();

    let summary = RunSummary::new(
        &catalog,
        &outcome,
        &oracle,
        &display_audit,
        started.elapsed(),
    );
    summary.write(&oracle.audit().summary_path(&cli.lemma))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        summary.print();
        let elapsed = started.elapsed().as_secs_f64();
        println!();
        banner(&format!(
            "Total execution time: {elapsed:.2} seconds ({:.2} minutes)",
            elapsed / 60.0
        ));
    }
    Ok(())
}
