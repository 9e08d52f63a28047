pub use masterror::{AppError, AppResult};
use thiserror::Error;

/// Failure while turning raw SQL into a statement tree.
///
/// The analyzer never hands this to its callers from
/// [`analyze_query`](crate::analyzer::QueryAnalyzer::analyze_query); it is
/// rendered into the single diagnostic suggestion of a degraded result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// The lexer rejected the input (unterminated literal, stray quote, ...)
    #[error("{0}")]
    Lex(String),
    /// Input held only whitespace, comments or empty statements
    #[error("no SQL statement found in input")]
    EmptyStatement,
    /// Parentheses nest deeper than the grouping limit
    #[error("statement nests parentheses deeper than {0} levels")]
    TooDeep(usize)
}

impl From<sqlparser::tokenizer::TokenizerError> for AnalysisError {
    fn from(err: sqlparser::tokenizer::TokenizerError) -> Self {
        Self::Lex(err.to_string())
    }
}

/// Create file read error
pub fn file_read_error(path: &str, source: std::io::Error) -> AppError {
    AppError::internal(format!("Failed to read file '{}': {}", path, source))
}

/// Create config error
pub fn config_error(message: impl Into<String>) -> AppError {
    AppError::bad_request(message.into())
}

/// Create error for input that holds no statements at all
pub fn empty_input_error(source: &str) -> AppError {
    AppError::bad_request(format!("No SQL statements found in {}", source))
}

/// Create output serialization error
pub fn output_error(format: &str, message: impl std::fmt::Display) -> AppError {
    AppError::internal(format!("Failed to render {} output: {}", format, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_error_messages() {
        assert_eq!(
            AnalysisError::EmptyStatement.to_string(),
            "no SQL statement found in input"
        );
        assert_eq!(
            AnalysisError::Lex("Unterminated string literal".into()).to_string(),
            "Unterminated string literal"
        );
    }

    #[test]
    fn test_analysis_error_from_tokenizer() {
        let dialect = sqlparser::dialect::GenericDialect {};
        let err = sqlparser::tokenizer::Tokenizer::new(&dialect, "SELECT 'abc")
            .tokenize()
            .unwrap_err();
        let converted = AnalysisError::from(err);
        assert!(matches!(converted, AnalysisError::Lex(_)));
        assert!(!converted.to_string().is_empty());
    }
}
