//! Human-readable progress on stdout

use std::time::{Duration, Instant};

use console::style;
use leakcut_cutset::{LeakSet, SearchObserver};
use leakcut_oracle::{AuditTrail, LeakCatalog};

const RULE_WIDTH: usize = 80;
const REPORT_EVERY: usize = 10;

pub fn banner(title: &str) {
    println!("{}", style("=".repeat(RULE_WIDTH)).dim());
    println!("{}", style(title).bold());
    println!("{}", style("=".repeat(RULE_WIDTH)).dim());
}

/// Prints every oracle call, cache hit and shrink as the search runs, plus an ETA
/// every ten calls.
pub struct ConsoleProgress<'c> {
    catalog: &'c LeakCatalog,
    lemma: String,
    audit: AuditTrail,
    started: Instant,
    completed: usize,
}

impl<'c> ConsoleProgress<'c> {
    /// `audit` only renders paths; pass it project-relative so output stays short.
    pub fn new(catalog: &'c LeakCatalog, lemma: impl Into<String>, audit: AuditTrail) -> Self {
        Self {
            catalog,
            lemma: lemma.into(),
            audit,
            started: Instant::now(),
            completed: 0,
        }
    }

    pub fn print_configuration(&self) {
        let names = self.catalog.names();
        banner("Analysis Configuration");
        println!("  Security property (lemma): {}", style(&self.lemma).magenta());
        println!("  Available leak types: {}", names.len());
        println!("  Leaks: {}", names.join(", "));
        println!(
            "  Example filename format: {}",
            self.catalog.file_stem(&self.catalog.order().full_set())
        );
        println!();
        banner("Starting Search");
        println!(
            "Finding min-cut sets that violate '{}'.",
            style(&self.lemma).magenta()
        );
        println!("This will generate .spthy files and run the prover for each candidate.\n");
    }

    fn members(&self, set: &LeakSet) -> String {
        format!("{{{}}}", self.catalog.order().names(set).join(", "))
    }

    fn stdout_path(&self, set: &LeakSet) -> String {
        self.audit
            .stdout_path(&self.lemma, &self.catalog.file_stem(set))
            .display()
            .to_string()
    }

    fn report_rate(&self) {
        let elapsed = self.started.elapsed();
        let average = elapsed / self.completed as u32;
        let combinations = 2f64.powi(self.catalog.len() as i32);
        let estimate = Duration::try_from_secs_f64(average.as_secs_f64() * combinations)
            .unwrap_or(Duration::MAX);
        println!(
            "{} {} tests completed | Elapsed: {} | Avg: {}/test",
            style("[Progress]").cyan(),
            self.completed,
            format_elapsed(elapsed),
            format_average(average)
        );
        println!(
            "           Estimated time for {combinations} combinations: {}\n",
            format_estimate(estimate)
        );
    }
}

impl SearchObserver for ConsoleProgress<'_> {
    fn initial_check(&mut self, catalog_len: usize, holds: bool) {
        if holds {
            println!(
                "[Initial check] All {catalog_len} leaks together falsify the lemma - proceeding with search\n"
            );
        } else {
            println!(
                "[Initial check] All {catalog_len} leaks together do not falsify the lemma - no solutions exist\n"
            );
        }
    }

    fn depth_started(&mut self, depth: usize, max_depth: usize) {
        if depth == 1 {
            println!("[Search] Exploring sets of increasing size (1 to {max_depth})...\n");
        }
    }

    fn depth_completed(&mut self, depth: usize, found: usize) {
        println!("[Search] Completed size {depth}, found {found} minimal set(s) so far\n");
    }

    fn evaluation_started(&mut self, index: usize, set: &LeakSet) {
        let (prefix, indent) = counter_prefix(index + 1);
        println!("{prefix}Test set: {}", style(self.members(set)).blue());
        println!("{indent}Stdout: {}", self.stdout_path(set));
    }

    fn evaluation_finished(&mut self, index: usize, _set: &LeakSet, holds: bool) {
        let (_, indent) = counter_prefix(index + 1);
        println!("{indent}Result: {}\n", verdict_text(holds));
        self.completed = index + 1;
        if self.completed % REPORT_EVERY == 0 {
            self.report_rate();
        }
    }

    fn cache_hit(&mut self, set: &LeakSet, holds: bool) {
        println!(
            "      {} {} -> {}\n",
            style("[Cache hit]").yellow(),
            style(self.members(set)).blue(),
            verdict_text(holds)
        );
    }

    fn shrink_started(&mut self, set: &LeakSet) {
        println!(
            "  [Shrinking] Found falsifying set with {} leaks: {}",
            set.len(),
            self.catalog.order().names(set).join(", ")
        );
        println!("  [Shrinking] Attempting to find minimal subset...\n");
    }

    fn shrink_finished(&mut self, _original: &LeakSet, minimal: &LeakSet) {
        println!(
            "  [Shrinking] Complete -> minimal set size {}: {}",
            minimal.len(),
            self.catalog.order().names(minimal).join(", ")
        );
        println!("              Stdout: {}\n", self.stdout_path(minimal));
    }

    fn cutset_dominated(&mut self, candidate: &LeakSet) {
        println!(
            "  {} {} is covered by an earlier cut-set\n",
            style("[Shrinking]").dim(),
            self.members(candidate)
        );
    }
}

fn verdict_text(holds: bool) -> String {
    if holds {
        style("FALSIFIED").red().to_string()
    } else {
        style("verified").green().to_string()
    }
}

/// `"  [  7] "` style prefix and the matching blank indent.
fn counter_prefix(counter: usize) -> (String, String) {
    let prefix = format!("  [{counter:>4}] ");
    let indent = " ".repeat(prefix.len());
    (prefix, indent)
}

fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{}m {}s", secs / 60, secs % 60)
}

fn format_average(average: Duration) -> String {
    let millis = average.subsec_millis();
    if millis > 0 {
        format!("{}s {millis}ms", average.as_secs())
    } else {
        format!("{}s", average.as_secs())
    }
}

fn format_estimate(estimate: Duration) -> String {
    let total = estimate.as_secs();
    let (hours, minutes, seconds) = (total / 3600, (total / 60) % 60, total % 60);
    if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}
