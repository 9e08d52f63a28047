//! Integration tests for the sql-query-advisor binary.

use std::io::Write;

use assert_cmd::{Command, cargo::cargo_bin_cmd};
use predicates::prelude::*;
use tempfile::{NamedTempFile, TempDir};

fn cmd() -> Command {
    let mut cmd = cargo_bin_cmd!("sql-query-advisor");
    cmd.env_remove("SQL_ADVISOR_DIALECT")
        .env_remove("SQL_ADVISOR_FORMAT")
        .env_remove("SQL_ADVISOR_LOG")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_analyze_file() {
    let mut queries = NamedTempFile::new().unwrap();
    writeln!(queries, "SELECT * FROM users;").unwrap();
    writeln!(queries, "SELECT id FROM users WHERE id = 5;").unwrap();

    cmd()
        .args(["analyze", "-q", queries.path().to_str().unwrap(), "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Query #1 (SELECT): SELECT * FROM users"))
        .stdout(predicate::str::contains("Specify needed columns instead of SELECT *"))
        .stdout(predicate::str::contains("Queries analyzed: 2"));
}

#[test]
fn test_analyze_inline_sql() {
    cmd()
        .args([
            "analyze",
            "-e",
            "SELECT a.x, b.y FROM a JOIN b ON a.id = b.a_id GROUP BY a.x",
            "--no-color"
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Complexity: Moderate"))
        .stdout(predicate::str::contains("Consider composite index on id, a_id"));
}

#[test]
fn test_analyze_stdin() {
    cmd()
        .args(["analyze", "-q", "-", "--no-color"])
        .write_stdin("SELECT COUNT(*) FROM events;")
        .assert()
        .success()
        .stdout(predicate::str::contains("Full table scan detected"));
}

#[test]
fn test_analyze_file_not_found() {
    cmd()
        .args(["analyze", "-q", "/nonexistent/queries.sql"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_analyze_empty_file() {
    let queries = NamedTempFile::new().unwrap();

    cmd()
        .args(["analyze", "-q", queries.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_analyze_json_format() {
    cmd()
        .args(["analyze", "-e", "SELECT * FROM users", "-f", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"summary\""))
        .stdout(predicate::str::contains("\"complexity\": \"Simple\""));
}

#[test]
fn test_analyze_yaml_format() {
    cmd()
        .args(["analyze", "-e", "SELECT * FROM users", "-f", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("queries:"))
        .stdout(predicate::str::contains("complexity: Simple"));
}

#[test]
fn test_fail_on_complex() {
    let sql = "SELECT o.id FROM orders o JOIN users u ON o.uid = u.id \
               JOIN items i ON i.oid = o.id JOIN products p ON p.id = i.pid GROUP BY o.id";

    cmd()
        .args(["analyze", "-e", sql, "--fail-on", "complex", "--no-color"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Complexity: Complex"));
}

#[test]
fn test_fail_on_ignores_unknown() {
    cmd()
        .args(["analyze", "-e", "SELECT 'oops", "--fail-on", "moderate", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Error analyzing query:"));
}

#[test]
fn test_verbose_output() {
    cmd()
        .args([
            "analyze",
            "-e",
            "SELECT * FROM a WHERE a.id IN (SELECT id FROM b)",
            "-v",
            "--no-color"
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 0"))
        .stdout(predicate::str::contains("Referenced tables: a, b"));
}

#[test]
fn test_environment_format() {
    cmd()
        .env("SQL_ADVISOR_FORMAT", "json")
        .args(["analyze", "-e", "SELECT 1"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{"));
}

#[test]
fn test_invalid_environment_value() {
    cmd()
        .env("SQL_ADVISOR_DIALECT", "oracle")
        .args(["analyze", "-e", "SELECT 1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_local_config_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(".sql-advisor.toml"),
        "[output]\nformat = \"yaml\"\ncolored = false\n"
    )
    .unwrap();

    cmd()
        .current_dir(dir.path())
        .env("HOME", dir.path())
        .args(["analyze", "-e", "SELECT 1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("summary:"));
}

#[test]
fn test_debug_logs_go_to_stderr() {
    cmd()
        .args(["analyze", "-e", "SELECT 1", "-f", "json", "--log-level", "debug"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{"))
        .stderr(predicate::str::contains("query analyzed"));
}

#[test]
fn test_missing_input_argument() {
    cmd().args(["analyze"]).assert().failure();
}

#[test]
fn test_version() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sql-query-advisor"));
}
