use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// A command rooted in a scratch workspace so log files stay out of the repo.
fn feedmap(workspace: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("feedmap").unwrap();
    cmd.current_dir(workspace.path())
        .arg("--workspace")
        .arg(workspace.path())
        .env_remove("RUST_LOG")
        .env_remove("FEEDMAP_LOG_LEVEL")
        .env_remove("FEEDMAP_LOG_DIR");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let workspace = TempDir::new().unwrap();
    feedmap(&workspace)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("COMMANDS:"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("transforms"));
}

#[test]
fn test_version_command() {
    let workspace = TempDir::new().unwrap();
    feedmap(&workspace)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_transforms_lists_builtins() {
    let workspace = TempDir::new().unwrap();
    feedmap(&workspace)
        .arg("transforms")
        .assert()
        .success()
        .stdout("map_category\nparse_price\ntrim\nupper\n");
}

#[test]
fn test_check_accepts_valid_config() {
    let workspace = TempDir::new().unwrap();
    feedmap(&workspace)
        .args(["--quiet", "check", "--config"])
        .arg(fixture("acme_config.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("OK (provider acme, 10 rule(s)"));
}

#[test]
fn test_check_reports_every_violation() {
    let workspace = TempDir::new().unwrap();
    feedmap(&workspace)
        .args(["--quiet", "check", "--config"])
        .arg(fixture("broken_config.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("[CFG-002]"))
        .stderr(predicate::str::contains("[CFG-003]"))
        .stderr(predicate::str::contains("[CFG-007]"))
        .stderr(predicate::str::contains("mappings[1].transforms[0].name"))
        .stderr(predicate::str::contains("4 violation(s)"));
}

#[test]
fn test_run_writes_canonical_records_and_report() {
    let workspace = TempDir::new().unwrap();
    let output = workspace.path().join("canonical.jsonl");
    let report = workspace.path().join("report.json");

    feedmap(&workspace)
        .args(["--quiet", "run", "--config"])
        .arg(fixture("acme_config.json"))
        .arg("--records")
        .arg(fixture("acme_records.jsonl"))
        .arg("--output")
        .arg(&output)
        .arg("--report")
        .arg(&report)
        .assert()
        .success()
        .stderr(predicate::str::contains("3 attempted, 2 completed, 1 partial, 1 error(s)"))
        .stderr(predicate::str::contains("[WARNING] TRANSFORM_FAILED: record 1 rule 3"))
        .stderr(predicate::str::contains("Persisted: 3 created"));

    let written = fs::read_to_string(&output).unwrap();
    assert_eq!(written.lines().count(), 3);
    let first: serde_json::Value = serde_json::from_str(written.lines().next().unwrap()).unwrap();
    assert_eq!(first["identifiers"]["sku"], "TS-100");

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(report["status"], "completed");
    assert_eq!(report["persisted"], true);
    assert_eq!(report["report"]["errors"][0]["record_index"], 1);
    assert_eq!(report["report"]["errors"][0]["kind"], "transform");
}

#[test]
fn test_run_reads_csv_records() {
    let workspace = TempDir::new().unwrap();
    let output = workspace.path().join("canonical.jsonl");

    feedmap(&workspace)
        .args(["--quiet", "run", "--config"])
        .arg(fixture("acme_config.json"))
        .arg("--records")
        .arg(fixture("acme_records.csv"))
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stderr(predicate::str::contains("3 attempted, 2 completed, 1 partial, 1 error(s)"));

    let lines: Vec<serde_json::Value> = fs::read_to_string(&output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["identifiers"]["sku"], "TS-100");
    assert_eq!(lines[0]["pricing"]["cost"], "12.50");
    // The short row has no Dept cell, so it maps through the empty string.
    assert_eq!(lines[1]["classification"]["category"], "Uncategorized");
    assert_eq!(lines[2]["pricing"]["cost"], "1299.99");
}

#[test]
fn test_run_streams_to_stdout_by_default() {
    let workspace = TempDir::new().unwrap();
    feedmap(&workspace)
        .args(["--quiet", "run", "--config"])
        .arg(fixture("acme_config.json"))
        .arg("--records")
        .arg(fixture("acme_records.jsonl"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"sku\":\"HW-200\""));
}

#[test]
fn test_run_aborts_under_fail_policy() {
    let workspace = TempDir::new().unwrap();
    let config = fs::read_to_string(fixture("acme_config.json"))
        .unwrap()
        .replace("\"continue\"", "\"fail\"");
    let config_path = workspace.path().join("acme_fail.json");
    fs::write(&config_path, config).unwrap();
    let output = workspace.path().join("canonical.jsonl");

    feedmap(&workspace)
        .args(["--quiet", "run", "--config"])
        .arg(&config_path)
        .arg("--records")
        .arg(fixture("acme_records.jsonl"))
        .arg("--output")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("[ERROR] TRANSFORM_FAILED: record 1 rule 3"))
        .stderr(predicate::str::contains("run aborted at record 1"))
        .stderr(predicate::str::contains("Persisted: nothing"));

    assert_eq!(fs::read_to_string(&output).unwrap(), "");
}

#[test]
fn test_run_with_invalid_config_fails_before_parsing() {
    let workspace = TempDir::new().unwrap();
    feedmap(&workspace)
        .args(["--quiet", "run", "--config"])
        .arg(fixture("broken_config.json"))
        .arg("--records")
        .arg(fixture("acme_records.jsonl"))
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("CONFIG_INVALID"));
}

#[test]
fn test_log_file_is_written_under_the_workspace() {
    let workspace = TempDir::new().unwrap();
    feedmap(&workspace)
        .args(["--quiet", "check", "--config"])
        .arg(fixture("acme_config.json"))
        .assert()
        .success();

    let log = workspace
        .path()
        .join(".feedmap")
        .join("logs")
        .join("feedmap.log");
    let content = fs::read_to_string(log).unwrap();
    assert!(content.contains("supplier configuration loaded"));
}
