//! Type conversion functions for CLI to internal types.

use crate::{
    analyzer::Complexity,
    cli::{Dialect, FailOn, Format},
    output::OutputFormat,
    statement::SqlDialect
};

/// Converts a CLI dialect enum to the internal SQL dialect type.
///
/// # Example
///
/// ```
/// use sql_query_advisor::{app::convert_dialect, cli::Dialect, statement::SqlDialect};
///
/// let dialect = convert_dialect(Dialect::Mysql);
/// assert!(matches!(dialect, SqlDialect::MySQL));
/// ```
pub fn convert_dialect(dialect: Dialect) -> SqlDialect {
    match dialect {
        Dialect::Generic => SqlDialect::Generic,
        Dialect::Mysql => SqlDialect::MySQL,
        Dialect::Postgresql => SqlDialect::PostgreSQL,
        Dialect::Sqlite => SqlDialect::SQLite,
        Dialect::Mssql => SqlDialect::MsSQL
    }
}

pub fn convert_format(format: Format) -> OutputFormat {
    match format {
        Format::Text => OutputFormat::Text,
        Format::Json => OutputFormat::Json,
        Format::Yaml => OutputFormat::Yaml
    }
}

/// Lowest complexity that fails the run
pub fn convert_fail_on(fail_on: FailOn) -> Complexity {
    match fail_on {
        FailOn::Moderate => Complexity::Moderate,
        FailOn::Complex => Complexity::Complex
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_dialect() {
        assert_eq!(convert_dialect(Dialect::Generic), SqlDialect::Generic);
        assert_eq!(convert_dialect(Dialect::Postgresql), SqlDialect::PostgreSQL);
        assert_eq!(convert_dialect(Dialect::Sqlite), SqlDialect::SQLite);
        assert_eq!(convert_dialect(Dialect::Mssql), SqlDialect::MsSQL);
    }

    #[test]
    fn test_convert_format() {
        assert_eq!(convert_format(Format::Text), OutputFormat::Text);
        assert_eq!(convert_format(Format::Json), OutputFormat::Json);
        assert_eq!(convert_format(Format::Yaml), OutputFormat::Yaml);
    }

    #[test]
    fn test_convert_fail_on() {
        assert_eq!(convert_fail_on(FailOn::Moderate), Complexity::Moderate);
        assert_eq!(convert_fail_on(FailOn::Complex), Complexity::Complex);
    }
}
