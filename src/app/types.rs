//! Application types for CLI commands.

use crate::{
    cli::{Dialect, FailOn, Format},
    output::QueryReport
};

/// Parameters for the analyze command.
///
/// Options left as `None` fall back to the loaded configuration.
///
/// # Example
///
/// ```
/// use sql_query_advisor::{app::AnalyzeParams, cli::Format};
///
/// let params = AnalyzeParams {
///     sql: Some("SELECT * FROM users".to_string()),
///     output_format: Some(Format::Json),
///     ..Default::default()
/// };
/// assert!(params.queries_path.is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct AnalyzeParams {
    /// Path to queries file or "-" for stdin input.
    pub queries_path:  Option<String>,
    /// Inline statement, used instead of a file.
    pub sql:           Option<String>,
    pub dialect:       Option<Dialect>,
    pub output_format: Option<Format>,
    /// Enable verbose output with additional details.
    pub verbose:       bool,
    /// Disable colored terminal output.
    pub no_color:      bool,
    pub fail_on:       Option<FailOn>
}

/// Result of a completed analyze run
#[derive(Debug, Clone)]
pub struct AnalyzeResult {
    /// Exit code: 1 when a query reached the fail-on threshold, else 0.
    pub exit_code: i32,
    /// Rendered report ready for stdout.
    pub output:    String,
    pub reports:   Vec<QueryReport>
}
