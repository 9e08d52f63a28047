// SPDX-FileCopyrightText: 2025 RAprogramm
// SPDX-License-Identifier: MIT

use clap::Parser;
use sql_query_advisor::cli::{Cli, Commands, Dialect, FailOn, Format};

fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
    Cli::try_parse_from(std::iter::once("sql-query-advisor").chain(args.iter().copied()))
}

#[test]
fn test_minimal_file_invocation() {
    let cli = parse(&["analyze", "-q", "queries.sql"]).unwrap();
    let Commands::Analyze {
        queries,
        sql,
        dialect,
        output_format,
        verbose,
        no_color,
        fail_on,
        log_level
    } = cli.command;

    assert_eq!(queries.unwrap().to_str(), Some("queries.sql"));
    assert!(sql.is_none());
    assert!(dialect.is_none());
    assert!(output_format.is_none());
    assert!(!verbose);
    assert!(!no_color);
    assert!(fail_on.is_none());
    assert!(log_level.is_none());
}

#[test]
fn test_stdin_marker() {
    let cli = parse(&["analyze", "--queries", "-"]).unwrap();
    let Commands::Analyze { queries, .. } = cli.command;
    assert_eq!(queries.unwrap().to_str(), Some("-"));
}

#[test]
fn test_dialect_values() {
    for (value, expected) in [
        ("generic", Dialect::Generic),
        ("mysql", Dialect::Mysql),
        ("postgresql", Dialect::Postgresql),
        ("sqlite", Dialect::Sqlite),
        ("mssql", Dialect::Mssql)
    ] {
        let cli = parse(&["analyze", "-e", "SELECT 1", "--dialect", value]).unwrap();
        let Commands::Analyze { dialect, .. } = cli.command;
        assert_eq!(dialect, Some(expected));
    }
}

#[test]
fn test_format_and_fail_on_values() {
    let cli = parse(&["analyze", "-e", "SELECT 1", "-f", "yaml", "--fail-on", "moderate"]).unwrap();
    let Commands::Analyze {
        output_format,
        fail_on,
        ..
    } = cli.command;
    assert_eq!(output_format, Some(Format::Yaml));
    assert_eq!(fail_on, Some(FailOn::Moderate));
}

#[test]
fn test_rejected_values() {
    assert!(parse(&["analyze", "-e", "SELECT 1", "-f", "sarif"]).is_err());
    assert!(parse(&["analyze", "-e", "SELECT 1", "--fail-on", "simple"]).is_err());
    assert!(parse(&["analyze", "-e", "SELECT 1", "--dialect", "oracle"]).is_err());
}

#[test]
fn test_input_is_required_and_exclusive() {
    assert!(parse(&["analyze"]).is_err());
    assert!(parse(&["analyze", "-q", "a.sql", "-e", "SELECT 1"]).is_err());
}
