//! Lexical statement trees.
//!
//! SQL text is lexed with the `sqlparser` tokenizer for the selected dialect
//! and grouped into a shallow [`StatementTree`]. The tree keeps every source
//! character, so [`StatementTree::text`] is the statement as written (minus
//! the terminating semicolon). Nothing here validates SQL: anything the lexer
//! accepts produces a tree.

mod grouping;
mod token;
mod types;

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlparser::{
    dialect::{
        Dialect, GenericDialect, MsSqlDialect, MySqlDialect, PostgreSqlDialect, SQLiteDialect
    },
    tokenizer::{Token as Lexeme, Tokenizer}
};
pub use grouping::MAX_NESTING;
pub use token::{Group, GroupKind, Relation, Token};
use tracing::trace;
pub use types::StatementType;

use crate::error::AnalysisError;

/// SQL dialect used for lexing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum SqlDialect {
    #[default]
    Generic,
    MySQL,
    PostgreSQL,
    SQLite,
    MsSQL
}

impl SqlDialect {
    /// Convert to sqlparser dialect for lexing
    pub fn into_parser_dialect(self) -> Box<dyn Dialect> {
        match self {
            Self::Generic => Box::new(GenericDialect {}),
            Self::MySQL => Box::new(MySqlDialect {}),
            Self::PostgreSQL => Box::new(PostgreSqlDialect {}),
            Self::SQLite => Box::new(SQLiteDialect {}),
            Self::MsSQL => Box::new(MsSqlDialect {})
        }
    }
}

impl FromStr for SqlDialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "generic" | "ansi" => Ok(Self::Generic),
            "mysql" | "mariadb" => Ok(Self::MySQL),
            "postgresql" | "postgres" | "pg" => Ok(Self::PostgreSQL),
            "sqlite" => Ok(Self::SQLite),
            "mssql" | "sqlserver" | "tsql" => Ok(Self::MsSQL),
            other => Err(format!("unknown SQL dialect '{}'", other))
        }
    }
}

impl std::fmt::Display for SqlDialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Generic => write!(f, "generic"),
            Self::MySQL => write!(f, "mysql"),
            Self::PostgreSQL => write!(f, "postgresql"),
            Self::SQLite => write!(f, "sqlite"),
            Self::MsSQL => write!(f, "mssql")
        }
    }
}

/// Grouped token tree of a single SQL statement
#[derive(Debug, Clone, PartialEq)]
pub struct StatementTree {
    tokens: Vec<Token>,
    text:   String
}

impl StatementTree {
    /// Lex `sql` and group its first non-empty statement.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::Lex`] if the tokenizer rejects the input
    /// - [`AnalysisError::EmptyStatement`] if the input holds only whitespace,
    ///   comments or bare semicolons
    /// - [`AnalysisError::TooDeep`] if parentheses nest deeper than
    ///   [`MAX_NESTING`]
    pub fn parse(sql: &str, dialect: SqlDialect) -> Result<Self, AnalysisError> {
        let parser_dialect = dialect.into_parser_dialect();
        let lexemes = Tokenizer::new(parser_dialect.as_ref(), sql).tokenize()?;
        let first = lexemes
            .split(|lexeme| matches!(lexeme, Lexeme::SemiColon))
            .find(|chunk| chunk.iter().any(grouping::is_significant))
            .ok_or(AnalysisError::EmptyStatement)?;
        let end = first
            .iter()
            .rposition(|lexeme| !matches!(lexeme, Lexeme::EOF))
            .map_or(0, |idx| idx + 1);
        let statement = &first[..end];
        if grouping::nesting_depth(statement) > MAX_NESTING {
            return Err(AnalysisError::TooDeep(MAX_NESTING));
        }

        let tokens = grouping::build(statement);
        let text: String = tokens.iter().map(Token::text).collect();
        trace!(tokens = tokens.len(), dialect = %dialect, "statement grouped");
        Ok(Self {
            tokens,
            text
        })
    }

    /// Top-level tokens in source order
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Full statement text, identical to the source slice it was built from
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Groups found directly at the top level
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.tokens.iter().filter_map(Token::as_group)
    }

    /// Kind of statement, decided by its first significant keyword.
    ///
    /// A leading `WITH` list is skipped; the first DML keyword after it
    /// decides. A statement wrapped in parentheses is looked into.
    pub fn statement_type(&self) -> StatementType {
        detect_type(&self.tokens)
    }
}

impl std::fmt::Display for StatementTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

fn detect_type(tokens: &[Token]) -> StatementType {
    let mut after_with = false;
    for token in tokens {
        match token {
            Token::Whitespace(_) => {}
            Token::Keyword(text) => match StatementType::from_keyword(text) {
                Some(kind) if !after_with || kind.is_dml() => return kind,
                Some(_) => {}
                None if text.eq_ignore_ascii_case("WITH") => after_with = true,
                None if after_with => {}
                None => return StatementType::Unknown
            },
            Token::Group(group) if group.kind == GroupKind::Parenthesis && !after_with => {
                return group
                    .children
                    .iter()
                    .filter_map(Token::as_group)
                    .find(|inner| inner.kind == GroupKind::Expression)
                    .map_or(StatementType::Unknown, |inner| detect_type(&inner.children));
            }
            _ if after_with => {}
            _ => return StatementType::Unknown
        }
    }
    StatementType::Unknown
}

/// Split a script into individual statements.
///
/// Statements are cut at semicolons outside literals and comments, trimmed,
/// and dropped when empty. Input the lexer rejects comes back as a single
/// statement so the analyzer can report it.
pub fn split_statements(sql: &str, dialect: SqlDialect) -> Vec<String> {
    let parser_dialect = dialect.into_parser_dialect();
    let Ok(lexemes) = Tokenizer::new(parser_dialect.as_ref(), sql).tokenize() else {
        let trimmed = sql.trim();
        return if trimmed.is_empty() {
            Vec::new()
        } else {
            vec![trimmed.to_string()]
        };
    };
    lexemes
        .split(|lexeme| matches!(lexeme, Lexeme::SemiColon))
        .filter(|chunk| chunk.iter().any(grouping::is_significant))
        .map(|chunk| {
            chunk
                .iter()
                .filter(|lexeme| !matches!(lexeme, Lexeme::EOF))
                .map(grouping::render)
                .collect::<String>()
                .trim()
                .to_string()
        })
        .collect()
}
