//! Core analysis execution logic.

use tracing::info;

use super::{
    convert::{convert_dialect, convert_fail_on, convert_format},
    helpers::{analyze_statements, calculate_exit_code, create_output_options, load_statements},
    types::{AnalyzeParams, AnalyzeResult}
};
use crate::{
    analyzer::QueryAnalyzer,
    config::Config,
    error::AppResult,
    output::format_report
};

/// Executes the analyze command.
///
/// 1. **Settings**: command-line options win over the configuration
/// 2. **Input**: reads the inline statement or splits the queries file
/// 3. **Analysis**: analyzes every statement in parallel
/// 4. **Rendering**: formats the reports and computes the exit code
///
/// # Errors
///
/// Returns an error if:
/// - The queries file cannot be read or holds no statements
/// - A configured dialect, format or fail-on value is invalid
/// - JSON or YAML rendering fails
///
/// # Example
///
/// ```
/// use sql_query_advisor::{
///     app::{AnalyzeParams, run_analyze},
///     config::Config
/// };
///
/// let params = AnalyzeParams {
///     sql: Some("SELECT * FROM users".to_string()),
///     no_color: true,
///     ..Default::default()
/// };
/// let result = run_analyze(params, &Config::default()).unwrap();
/// assert_eq!(result.exit_code, 0);
/// assert!(result.output.contains("Complexity: Simple"));
/// ```
pub fn run_analyze(params: AnalyzeParams, config: &Config) -> AppResult<AnalyzeResult> {
    let dialect = match params.dialect {
        Some(dialect) => convert_dialect(dialect),
        None => config.dialect()?.unwrap_or_default()
    };
    let format = match params.output_format {
        Some(format) => convert_format(format),
        None => config.format()?.unwrap_or_default()
    };
    let fail_on = match params.fail_on {
        Some(fail_on) => Some(convert_fail_on(fail_on)),
        None => config.fail_on()?
    };
    let colored = !params.no_color && config.output.colored.unwrap_or(true);
    let verbose = params.verbose || config.output.verbose.unwrap_or(false);

    let statements = load_statements(&params, dialect)?;
    info!(count = statements.len(), dialect = %dialect, "analyzing statements");

    let reports = analyze_statements(&statements, QueryAnalyzer::with_dialect(dialect), verbose);
    let output = format_report(&reports, &create_output_options(format, colored, verbose))?;
    let exit_code = calculate_exit_code(&reports, fail_on);

    Ok(AnalyzeResult {
        exit_code,
        output,
        reports
    })
}
