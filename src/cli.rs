use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// SQL Query Advisor - Rate SQL statement complexity and suggest optimizations
#[derive(Parser, Debug)]
#[command(name = "sql-query-advisor")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze one or more SQL statements
    Analyze {
        /// Path to SQL queries file (use - for stdin)
        #[arg(short, long, required_unless_present = "sql", conflicts_with = "sql")]
        queries: Option<PathBuf>,

        /// Single SQL statement to analyze
        #[arg(short = 'e', long)]
        sql: Option<String>,

        /// SQL dialect for lexing
        #[arg(long, value_enum)]
        dialect: Option<Dialect>,

        /// Output format
        #[arg(short = 'f', long, value_enum)]
        output_format: Option<Format>,

        /// Show score, join clauses and all referenced tables per query
        #[arg(short, long)]
        verbose: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Exit with code 1 when any query reaches this complexity
        #[arg(long, value_enum)]
        fail_on: Option<FailOn>,

        /// Log level or filter directive (overridden by RUST_LOG)
        #[arg(long)]
        log_level: Option<String>
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Dialect {
    Generic,
    Mysql,
    Postgresql,
    Sqlite,
    Mssql
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
    Yaml
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FailOn {
    Moderate,
    Complex
}
