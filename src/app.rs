//! Application logic for the SQL Query Advisor CLI.
//!
//! This module contains the command orchestration separated from the main
//! entry point to enable testing.

mod analyze;
mod convert;
mod helpers;
mod types;

pub use analyze::run_analyze;
pub use convert::{convert_dialect, convert_fail_on, convert_format};
pub use helpers::{
    analyze_statements, build_report, calculate_exit_code, create_output_options,
    load_statements, read_queries_input
};
pub use types::{AnalyzeParams, AnalyzeResult};
