//! # SQL Query Advisor
//!
//! Heuristic complexity rating and optimization hints for SQL statements.
//!
//! Every statement is lexed into a shallow token tree. Extractors collect the
//! tables, join clauses, WHERE filters and indexable columns found at the top
//! level; a fixed score turns them into a `Simple`, `Moderate` or `Complex`
//! rating, and a short list of suggestions is derived from the same features.
//! Input the lexer rejects is reported as `Unknown` with a diagnostic.
//!
//! # Quick Start
//!
//! ```bash
//! # Analyze a file of ;-separated statements
//! sql-query-advisor analyze -q queries.sql
//!
//! # One inline statement, JSON output
//! sql-query-advisor analyze -e "SELECT * FROM users" -f json
//!
//! # Stream queries from stdin and fail CI on complex ones
//! cat queries.sql | sql-query-advisor analyze -q - --fail-on complex
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded from (in order of precedence):
//!
//! 1. Command-line arguments
//! 2. Environment variables (`SQL_ADVISOR_DIALECT`, `SQL_ADVISOR_FORMAT`,
//!    `SQL_ADVISOR_LOG`)
//! 3. `.sql-advisor.toml` in current directory
//! 4. `~/.config/sql-advisor/config.toml`
//!
//! ## Example Configuration
//!
//! ```toml
//! [analysis]
//! dialect = "postgresql"
//! fail_on = "complex"
//!
//! [output]
//! format = "text"
//! colored = true
//! verbose = false
//!
//! [logging]
//! level = "warn"
//! ```
//!
//! # Complexity
//!
//! | Signal | Points |
//! |--------|--------|
//! | Join clause | +1 each |
//! | Nested `SELECT` before the main `FROM` | +2 |
//! | `GROUP BY` / `HAVING` | +1 |
//! | `OVER` | +2 |
//!
//! A score of 0-1 is `Simple`, 2-3 `Moderate`, 4 and above `Complex`.
//!
//! # Exit Codes
//!
//! - `0` - Success
//! - `1` - A query reached the `--fail-on` complexity, or the run failed

use std::process;

use clap::Parser;
use sql_query_advisor::{
    app::{AnalyzeParams, run_analyze},
    cli::{Cli, Commands},
    config::Config,
    error::AppResult,
    logging
};

fn main() {
    match run() {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run() -> AppResult<i32> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Analyze {
            queries,
            sql,
            dialect,
            output_format,
            verbose,
            no_color,
            fail_on,
            log_level
        } => {
            logging::init(log_level.as_deref().or(config.logging.level.as_deref()))?;

            let params = AnalyzeParams {
                queries_path: queries.map(|path| path.display().to_string()),
                sql,
                dialect,
                output_format,
                verbose,
                no_color,
                fail_on
            };
            let result = run_analyze(params, &config)?;
            println!("{}", result.output);
            Ok(result.exit_code)
        }
    }
}
