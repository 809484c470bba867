//! Command-line tests for the core-genome binary.

mod common;

use assert_cmd::Command;
use predicates::prelude::*;

use common::{hit, write_pair, write_three_way_reciprocal};

fn core_genome() -> Command {
    Command::cargo_bin("core-genome").unwrap()
}

#[test]
fn test_run_writes_all_artifacts() {
    let blast = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_three_way_reciprocal(blast.path());

    core_genome()
        .arg("run")
        .arg(blast.path())
        .arg("strep")
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Core genes: 1"));

    let homolog = std::fs::read_to_string(out.path().join("homolog_strep.json")).unwrap();
    let matrix: serde_json::Value = serde_json::from_str(&homolog).unwrap();
    assert_eq!(matrix["A"]["A"]["g1"], "g1");
    assert_eq!(matrix["A"]["B"]["g1"], "g1");

    let core = std::fs::read_to_string(out.path().join("core_strep.json")).unwrap();
    let core: serde_json::Value = serde_json::from_str(&core).unwrap();
    assert_eq!(core["A"], serde_json::json!(["g1"]));
    assert_eq!(core["C"], serde_json::json!(["g1"]));

    let manifest = std::fs::read_to_string(out.path().join("manifest_strep.json")).unwrap();
    let manifest: serde_json::Value = serde_json::from_str(&manifest).unwrap();
    assert_eq!(manifest["run"], "strep");
    assert_eq!(manifest["thresholds"]["identity"], 40.0);
    assert_eq!(manifest["core_sizes"]["B"], 1);
    assert_eq!(
        manifest["homolog_md5"],
        format!("{:x}", md5::compute(homolog.as_bytes()))
    );
}

#[test]
fn test_run_json_summary_for_reference() {
    let blast = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_three_way_reciprocal(blast.path());

    let output = core_genome()
        .args(["--format", "json", "run"])
        .arg(blast.path())
        .arg("strep")
        .arg(out.path())
        .args(["--reference", "B"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let summaries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let summaries = summaries.as_array().unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0]["reference"], "B");
    assert_eq!(summaries[0]["core_genes"], 1);
}

#[test]
fn test_tsv_summary() {
    let blast = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_three_way_reciprocal(blast.path());

    core_genome()
        .args(["-f", "tsv", "run"])
        .arg(blast.path())
        .arg("strep")
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "reference\tgenes\tcandidate_families\tcomplete_families\tcore_genes\nA\t1\t1\t1\t1\n",
        ));
}

#[test]
fn test_invalid_reference_keeps_homolog_file() {
    let blast = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_three_way_reciprocal(blast.path());

    core_genome()
        .arg("run")
        .arg(blast.path())
        .arg("strep")
        .arg(out.path())
        .args(["--reference", "Z"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid reference organism 'Z'"));

    assert!(out.path().join("homolog_strep.json").exists());
    assert!(!out.path().join("core_strep.json").exists());
}

#[test]
fn test_missing_input_fails() {
    let blast = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();

    core_genome()
        .arg("run")
        .arg(blast.path())
        .arg("strep")
        .arg(out.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No eligible alignment result files"));

    assert!(!out.path().join("homolog_strep.json").exists());
}

#[test]
fn test_core_command_reproduces_run() {
    let blast = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let rerun = tempfile::tempdir().unwrap();
    write_three_way_reciprocal(blast.path());

    core_genome()
        .arg("run")
        .arg(blast.path())
        .arg("strep")
        .arg(out.path())
        .assert()
        .success();

    core_genome()
        .arg("core")
        .arg(out.path().join("homolog_strep.json"))
        .arg(rerun.path())
        .args(["--run", "strep"])
        .assert()
        .success();

    let original = std::fs::read(out.path().join("core_strep.json")).unwrap();
    let recomputed = std::fs::read(rerun.path().join("core_strep.json")).unwrap();
    assert_eq!(original, recomputed);
}

#[test]
fn test_core_rerun_keeps_homolog_settings() {
    let blast = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_three_way_reciprocal(blast.path());

    core_genome()
        .arg("run")
        .arg(blast.path())
        .arg("strep")
        .arg(out.path())
        .args(["-i", "50"])
        .assert()
        .success();

    core_genome()
        .arg("core")
        .arg(out.path().join("homolog_strep.json"))
        .arg(out.path())
        .args(["--run", "strep", "--reference", "A"])
        .assert()
        .success();

    let manifest = std::fs::read_to_string(out.path().join("manifest_strep.json")).unwrap();
    let manifest: serde_json::Value = serde_json::from_str(&manifest).unwrap();
    assert_eq!(manifest["reference"], "A");
    assert_eq!(manifest["thresholds"]["identity"], 50.0);
    assert_eq!(manifest["core_sizes"], serde_json::json!({"A": 1}));
}

#[test]
fn test_homologs_reports_degraded_pair() {
    let blast = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_pair(blast.path(), "A", "B", &[hit("a1", "b1")], &[]);
    std::fs::write(blast.path().join("B-vs-A.bl"), "b1\ta1\t90.0\n").unwrap();

    core_genome()
        .arg("homologs")
        .arg(blast.path())
        .arg(out.path())
        .args(["--run", "strep"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Degraded pairs"))
        .stdout(predicate::str::contains("B vs A"));

    assert!(out.path().join("homolog_strep.json").exists());
}

#[test]
fn test_strict_identity_empties_core() {
    let blast = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_three_way_reciprocal(blast.path());

    core_genome()
        .arg("run")
        .arg(blast.path())
        .arg("strep")
        .arg(out.path())
        .args(["-i", "95"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Core genes: 0"));
}

#[test]
fn test_invalid_run_name() {
    let blast = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_three_way_reciprocal(blast.path());

    core_genome()
        .arg("run")
        .arg(blast.path())
        .arg("../strep")
        .arg(out.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid run name"));
}
