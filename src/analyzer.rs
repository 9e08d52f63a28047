//! Heuristic statement analysis.
//!
//! [`QueryAnalyzer`] turns one SQL statement into an [`AnalysisResult`]:
//!
//! 1. Lex and group the first statement into a [`StatementTree`]
//! 2. Run the extractors (tables, joins, WHERE presence, index columns)
//! 3. Score complexity
//! 4. Synthesize suggestions
//!
//! The analyzer is stateless apart from the lexer dialect, so a single value
//! can be shared freely across threads.
//!
//! # Example
//!
//! ```
//! use sql_query_advisor::analyzer::{Complexity, QueryAnalyzer};
//!
//! let result = QueryAnalyzer::new().analyze_query("SELECT * FROM users");
//! assert_eq!(result.complexity, Complexity::Simple);
//! assert!(result.tables_involved.contains("users"));
//! assert!(
//!     result
//!         .suggested_improvements
//!         .iter()
//!         .any(|s| s == "Specify needed columns instead of SELECT *")
//! );
//! ```

mod complexity;
mod extract;
mod suggest;
mod types;

use indexmap::IndexSet;
use suggest::SuggestionInput;
pub use suggest::{ADD_FILTERS, DECOMPOSE_JOINS, EXPLICIT_COLUMNS, FULL_SCAN};
use tracing::debug;
pub use types::{AnalysisResult, ColumnVec, Complexity, QueryFeatures};

use crate::{
    error::AnalysisError,
    statement::{SqlDialect, StatementTree, Token}
};

/// Heuristic SQL statement analyzer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryAnalyzer {
    dialect: SqlDialect
}

impl QueryAnalyzer {
    /// Analyzer lexing with the generic dialect
    pub fn new() -> Self {
        Self::default()
    }

    /// Analyzer lexing with `dialect`
    pub fn with_dialect(dialect: SqlDialect) -> Self {
        Self {
            dialect
        }
    }

    /// Dialect used for lexing
    pub fn dialect(&self) -> SqlDialect {
        self.dialect
    }

    /// Analyze one statement.
    ///
    /// Never fails: input that cannot be lexed, or holds no statement, yields
    /// [`AnalysisResult::degraded`] with the failure as its only suggestion.
    /// Only the first statement of a multi-statement input is analyzed.
    pub fn analyze_query(&self, query: &str) -> AnalysisResult {
        let TextFeatures {
            text,
            inner: features
        } = match self.features(query) {
            Ok(features) => features,
            Err(err) => {
                debug!(error = %err, "query analysis degraded");
                return AnalysisResult::degraded(err);
            }
        };
        let suggested_improvements = suggest::synthesize(SuggestionInput {
            text:          &text,
            join_count:    features.joins.len(),
            table_count:   features.tables.len(),
            has_where:     features.has_where,
            where_columns: &features.where_columns,
            join_columns:  &features.join_columns
        });
        AnalysisResult {
            complexity: features.complexity,
            tables_involved: features.tables,
            suggested_improvements,
            statement_type: features.statement_type
        }
    }

    /// Raw extractor outputs for `query`, surfacing failures instead of
    /// degrading.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError`] when the input cannot be lexed or is empty.
    pub fn inspect(&self, query: &str) -> Result<QueryFeatures, AnalysisError> {
        self.features(query).map(|features| features.inner)
    }

    /// Every relation named anywhere in the statement.
    ///
    /// Unlike the top-level table extraction behind
    /// [`analyze_query`](Self::analyze_query), this walks the whole tree:
    /// join targets, subqueries and CTE bodies included.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError`] when the input cannot be lexed or is empty.
    pub fn referenced_tables(&self, query: &str) -> Result<IndexSet<String>, AnalysisError> {
        let tree = StatementTree::parse(query, self.dialect)?;
        let mut tables = IndexSet::new();
        collect_relations(tree.tokens(), &mut tables);
        Ok(tables)
    }

    fn features(&self, query: &str) -> Result<TextFeatures, AnalysisError> {
        let tree = StatementTree::parse(query, self.dialect)?;
        let tables = extract::tables(&tree);
        let joins = extract::joins(&tree);
        let has_where = extract::has_where(&tree);
        let where_columns = extract::where_columns(&tree);
        let join_columns = extract::join_columns(&joins);
        let (score, complexity) = complexity::rate(tree.text(), joins.len());
        let statement_type = tree.statement_type();

        debug!(
            statement_type = %statement_type,
            tables = tables.len(),
            joins = joins.len(),
            score,
            complexity = %complexity,
            "query analyzed"
        );
        Ok(TextFeatures {
            text:  tree.text().to_string(),
            inner: QueryFeatures {
                statement_type,
                tables,
                joins,
                has_where,
                where_columns,
                join_columns,
                score,
                complexity
            }
        })
    }
}

/// Features plus the statement text they were extracted from
struct TextFeatures {
    text:  String,
    inner: QueryFeatures
}

fn collect_relations(tokens: &[Token], out: &mut IndexSet<String>) {
    for token in tokens {
        match token {
            Token::Group(group) => collect_relations(&group.children, out),
            _ => {
                if let Some(name) = token.real_name() {
                    out.insert(name.to_string());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::StatementType;

    #[test]
    fn test_scenario_select_star() {
        let result = QueryAnalyzer::new().analyze_query("SELECT * FROM users");
        assert_eq!(result.complexity, Complexity::Simple);
        assert_eq!(result.statement_type, StatementType::Select);
        assert_eq!(result.tables_involved.len(), 1);
        assert!(result.tables_involved.contains("users"));
        assert_eq!(result.suggested_improvements, vec![FULL_SCAN, EXPLICIT_COLUMNS]);
    }

    #[test]
    fn test_scenario_filtered_select() {
        let result = QueryAnalyzer::new().analyze_query("SELECT id, name FROM users WHERE id = 5");
        assert_eq!(result.complexity, Complexity::Simple);
        assert!(result.tables_involved.contains("users"));
        assert!(result.suggested_improvements.is_empty());
    }

    #[test]
    fn test_scenario_join_group_by() {
        let result = QueryAnalyzer::new()
            .analyze_query("SELECT a.x, b.y FROM a JOIN b ON a.id = b.a_id GROUP BY a.x");
        assert_eq!(result.complexity, Complexity::Moderate);
        assert_eq!(
            result.suggested_improvements,
            vec!["Consider composite index on id, a_id", ADD_FILTERS]
        );
    }

    #[test]
    fn test_scenario_empty_input() {
        let result = QueryAnalyzer::new().analyze_query("");
        assert_eq!(result.complexity, Complexity::Unknown);
        assert_eq!(result.statement_type, StatementType::Unknown);
        assert!(result.tables_involved.is_empty());
        assert_eq!(result.suggested_improvements.len(), 1);
        assert!(result.suggested_improvements[0].starts_with("Error analyzing query: "));
    }

    #[test]
    fn test_inspect_reports_features() {
        let features = QueryAnalyzer::new()
            .inspect("SELECT * FROM a JOIN b ON a.id = b.a_id WHERE a.flag = 1")
            .unwrap();
        assert_eq!(features.joins, vec!["JOIN b ON a.id = b.a_id"]);
        assert!(features.has_where);
        assert!(features.where_columns.contains("flag"));
        assert_eq!(features.join_columns.len(), 1);
        assert_eq!(features.score, 1);
        assert_eq!(features.complexity, Complexity::Simple);
    }

    #[test]
    fn test_inspect_surfaces_errors() {
        assert_eq!(
            QueryAnalyzer::new().inspect("  "),
            Err(AnalysisError::EmptyStatement)
        );
    }

    #[test]
    fn test_referenced_tables_walks_whole_tree() {
        let tables = QueryAnalyzer::new()
            .referenced_tables(
                "WITH recent AS (SELECT * FROM orders) \
                 SELECT * FROM users u JOIN recent r ON r.uid = u.id \
                 WHERE u.id IN (SELECT uid FROM bans)"
            )
            .unwrap();
        let names: Vec<&str> = tables.iter().map(String::as_str).collect();
        assert_eq!(names, vec!["orders", "users", "recent", "bans"]);
    }

    #[test]
    fn test_dialect_is_kept() {
        let analyzer = QueryAnalyzer::with_dialect(SqlDialect::PostgreSQL);
        assert_eq!(analyzer.dialect(), SqlDialect::PostgreSQL);
        let result = analyzer.analyze_query("SELECT * FROM \"Users\" WHERE \"Users\".id = $1");
        assert!(result.tables_involved.contains("Users"));
    }
}
