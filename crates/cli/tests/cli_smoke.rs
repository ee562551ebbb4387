#![cfg(unix)]

use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tempfile::{tempdir, TempDir};

const LEMMA: &str = "TestCardCloningResistance";

// Falsified iff (a or b) and (c or d) are included.
const FAKE_PROVER: &str = r#"#!/bin/sh
theory="$1"
lemma=""
for arg in "$@"; do
  case "$arg" in
    --prove=*) lemma="${arg#--prove=}" ;;
  esac
done
include=$(sed -n 's/^#include "\(.*\)"$/\1/p' "$theory")
if grep -q 'rule Leak_[ab]:' "$include" && grep -q 'rule Leak_[cd]:' "$include"; then
  echo "  $lemma (all-traces): falsified - found trace (4 steps)"
else
  echo "  $lemma (all-traces): verified (7 steps)"
fi
"#;

fn setup_project() -> TempDir {
    let temp = tempdir().unwrap();
    let root = temp.path();
    fs::write(
        root.join("main.spthy"),
        "theory leakNoLeaks\nbegin\n\n#include \"leaks/NoLeaks.spthy\"\n\nend\n",
    )
    .unwrap();
    fs::create_dir_all(root.join("automator")).unwrap();
    fs::write(
        root.join("automator/leak_rules.json"),
        r#"{
  "a": "rule Leak_a:\n  [ !Ltk(x) ] --> [ Out(x) ]",
  "b": "rule Leak_b:\n  [ !Pin(x) ] --> [ Out(x) ]",
  "c": "rule Leak_c:\n  [ !Key(x) ] --> [ Out(x) ]",
  "d": "rule Leak_d:\n  [ !Atc(x) ] --> [ Out(x) ]",
  "e": "rule Leak_e:\n  [ !Log(x) ] --> [ Out(x) ]"
}"#,
    )
    .unwrap();
    fs::write(
        root.join("automator/leak_rules_short.json"),
        r#"{"a": "A", "b": "B", "c": "C", "d": "D", "e": "E"}"#,
    )
    .unwrap();

    let script = root.join("fake-prover.sh");
    fs::write(&script, FAKE_PROVER).unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
    temp
}

#[allow(deprecated)]
fn leakcut(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("leakcut").expect("binary");
    cmd.arg(LEMMA)
        .arg("--project")
        .arg(root)
        .arg("--prover")
        .arg(root.join("fake-prover.sh"));
    cmd
}

fn run_json(cmd: &mut Command) -> Value {
    let output = cmd.arg("--json").output().expect("command run");
    assert!(
        output.status.success(),
        "stdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid json")
}

fn cutset_files(summary: &Value) -> Vec<String> {
    summary["cutsets"]
        .as_array()
        .expect("cutsets array")
        .iter()
        .map(|c| c["file"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[test]
fn finds_the_four_pairs_and_writes_the_summary() {
    let temp = setup_project();
    let root = temp.path();

    leakcut(root)
        .assert()
        .success()
        .stdout(predicates::str::contains("Results Summary"))
        .stdout(predicates::str::contains("Found 4 minimal mincutset(s)"));

    let summary =
        fs::read_to_string(root.join(format!("results/summary_{LEMMA}.txt"))).unwrap();
    assert!(summary.contains("Found 4 minimal cut-sets that violate the security property"));
    assert!(summary.contains("  1. a, c\n     File: AC.spthy\n     Leak count: 2\n"));
    assert!(root
        .join(format!("results/stdout/{LEMMA}/BD.stdout"))
        .exists());
    assert!(root.join("leaks/ABCDE.spthy").exists());
}

#[test]
fn json_output_lists_cutsets_in_discovery_order() {
    let temp = setup_project();
    let summary = run_json(&mut leakcut(temp.path()));

    assert_eq!(summary["lemma"], LEMMA);
    assert_eq!(summary["initial_check_passed"], true);
    assert_eq!(
        cutset_files(&summary),
        vec!["AC.spthy", "AD.spthy", "BC.spthy", "BD.spthy"]
    );
    assert_eq!(summary["cutsets"][0]["leaks"], serde_json::json!(["a", "c"]));
    assert_eq!(summary["verdicts"]["inconclusive"], 0);
    assert!(summary["inconclusive"].as_array().unwrap().is_empty());
}

#[test]
fn limit_leaks_restricts_the_catalog() {
    let temp = setup_project();
    let summary = run_json(leakcut(temp.path()).args(["--limit-leaks", "2"]));

    assert_eq!(summary["leak_types"], serde_json::json!(["a", "b"]));
    assert_eq!(summary["initial_check_passed"], false);
    assert!(cutset_files(&summary).is_empty());
    assert_eq!(summary["search"]["oracle_calls"], 1);
}

#[test]
fn min_size_skips_small_sets() {
    let temp = setup_project();
    let summary = run_json(leakcut(temp.path()).args(["--min-size", "3"]));

    let cutsets = summary["cutsets"].as_array().unwrap();
    assert!(!cutsets.is_empty());
    for cutset in cutsets {
        assert!(cutset["size"].as_u64().unwrap() >= 3, "{cutset}");
    }
}

#[test]
fn config_file_is_picked_up_from_the_project() {
    let temp = setup_project();
    let root = temp.path();
    fs::write(root.join("leakcut.toml"), "[search]\nlimit_leaks = 3\n").unwrap();

    let summary = run_json(&mut leakcut(root));
    assert_eq!(summary["leak_types"], serde_json::json!(["a", "b", "c"]));
    assert_eq!(cutset_files(&summary), vec!["AC.spthy", "BC.spthy"]);
}

#[test]
fn timing_out_prover_is_reported_as_inconclusive() {
    let temp = setup_project();
    let root = temp.path();
    fs::write(root.join("fake-prover.sh"), "#!/bin/sh\nexec sleep 10\n").unwrap();

    let summary = run_json(leakcut(root).args(["--timeout-secs", "1"]));
    assert_eq!(summary["initial_check_passed"], false);
    assert_eq!(summary["verdicts"]["inconclusive"], 1);
    assert_eq!(summary["inconclusive"][0]["file"], "ABCDE.spthy");

    let report =
        fs::read_to_string(root.join(format!("results/summary_{LEMMA}.txt"))).unwrap();
    assert!(report.contains("Inconclusive evaluations (treated as not falsified): 1"));
}

#[test]
fn missing_catalog_fails_before_searching() {
    let temp = setup_project();
    fs::remove_file(temp.path().join("automator/leak_rules.json")).unwrap();

    leakcut(temp.path())
        .assert()
        .failure()
        .stderr(predicates::str::contains("Failed to load leak catalog"));
}

#[test]
fn invalid_config_is_rejected() {
    let temp = setup_project();
    fs::write(temp.path().join("leakcut.toml"), "[search]\nlimit_leaks = 0\n").unwrap();

    leakcut(temp.path())
        .assert()
        .failure()
        .stderr(predicates::str::contains("limit_leaks"));
}
