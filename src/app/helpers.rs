//! Helper functions for CLI operations.

use std::{
    fs::read_to_string,
    io::{self, Read},
    time::Duration
};

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::debug;

use super::types::AnalyzeParams;
use crate::{
    analyzer::{Complexity, QueryAnalyzer},
    error::{AppResult, config_error, empty_input_error, file_read_error},
    output::{OutputFormat, OutputOptions, QueryDetails, QueryReport},
    statement::{SqlDialect, split_statements}
};

/// Exit code for a finished run.
///
/// `1` when `fail_on` is set and any query is at least that complex,
/// `0` otherwise. Unknown results never count.
///
/// # Example
///
/// ```
/// use sql_query_advisor::{analyzer::Complexity, app::calculate_exit_code};
///
/// assert_eq!(calculate_exit_code(&[], Some(Complexity::Moderate)), 0);
/// ```
pub fn calculate_exit_code(reports: &[QueryReport], fail_on: Option<Complexity>) -> i32 {
    let Some(threshold) = fail_on else {
        return 0;
    };
    if reports
        .iter()
        .any(|r| r.analysis.complexity.is_at_least(threshold))
    {
        1
    } else {
        0
    }
}

/// Reads SQL queries from a file or stdin.
///
/// # Errors
///
/// Returns an error if the file cannot be read or stdin fails.
pub fn read_queries_input(path: &str) -> AppResult<String> {
    if path == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| file_read_error("stdin", e))?;
        Ok(buffer)
    } else {
        read_to_string(path).map_err(|e| file_read_error(path, e))
    }
}

/// Statements to analyze for this run.
///
/// An inline `--sql` statement is analyzed as given, even when empty. A
/// queries file is split into statements and must contain at least one.
///
/// # Errors
///
/// Returns an error if the input cannot be read, holds no statements, or
/// neither input was given.
pub fn load_statements(params: &AnalyzeParams, dialect: SqlDialect) -> AppResult<Vec<String>> {
    if let Some(sql) = &params.sql {
        return Ok(vec![sql.clone()]);
    }
    let path = params
        .queries_path
        .as_deref()
        .ok_or_else(|| config_error("Either --queries or --sql is required"))?;
    let input = read_queries_input(path)?;
    let statements = split_statements(&input, dialect);
    if statements.is_empty() {
        let source = if path == "-" { "stdin" } else { path };
        return Err(empty_input_error(source));
    }
    Ok(statements)
}

/// Analyze one statement, adding extractor details in verbose mode
pub fn build_report(
    index: usize,
    query: &str,
    analyzer: &QueryAnalyzer,
    verbose: bool
) -> QueryReport {
    let analysis = analyzer.analyze_query(query);
    let features = if verbose {
        analyzer.inspect(query).ok().map(|features| QueryDetails {
            features,
            referenced_tables: analyzer.referenced_tables(query).unwrap_or_default()
        })
    } else {
        None
    };
    QueryReport {
        index,
        query: query.to_string(),
        analysis,
        features
    }
}

/// Analyze statements in parallel, keeping input order.
///
/// A spinner is shown on stderr while more than one statement is processed.
pub fn analyze_statements(
    statements: &[String],
    analyzer: QueryAnalyzer,
    verbose: bool
) -> Vec<QueryReport> {
    let spinner = (statements.len() > 1).then(|| {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(format!("Analyzing {} queries...", statements.len()));
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    });

    let reports: Vec<QueryReport> = statements
        .par_iter()
        .enumerate()
        .map(|(i, query)| build_report(i + 1, query, &analyzer, verbose))
        .collect();

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    debug!(count = reports.len(), "batch analyzed");
    reports
}

/// Creates output options from resolved settings
pub fn create_output_options(format: OutputFormat, colored: bool, verbose: bool) -> OutputOptions {
    OutputOptions {
        format,
        colored,
        verbose
    }
}
