//! Structural extractors over a [`StatementTree`].
//!
//! Every extractor looks at top-level tokens and, for groups, at their direct
//! children only. Subqueries and clauses nested inside parentheses are not
//! visited.

use compact_str::CompactString;
use indexmap::IndexSet;

use super::types::ColumnVec;
use crate::statement::{StatementTree, Token};

/// Real names of top-level relation references, deduplicated
pub fn tables(tree: &StatementTree) -> IndexSet<CompactString> {
    tree.tokens()
        .iter()
        .filter_map(Token::real_name)
        .map(CompactString::from)
        .collect()
}

/// Verbatim text of every group child that starts with `JOIN`
pub fn joins(tree: &StatementTree) -> Vec<String> {
    clause_children(tree)
        .filter(|text| starts_with_keyword(text, "JOIN"))
        .collect()
}

pub fn has_where(tree: &StatementTree) -> bool {
    clause_children(tree).any(|text| starts_with_keyword(&text, "WHERE"))
}

/// Qualified column references (`t.col`) inside WHERE clauses
pub fn where_columns(tree: &StatementTree) -> IndexSet<CompactString> {
    let mut columns = IndexSet::new();
    for clause in clause_children(tree).filter(|text| starts_with_keyword(text, "WHERE")) {
        for word in clause.split_whitespace() {
            if !word.contains('.') || word.contains('(') {
                continue;
            }
            if let Some((_, column)) = word.rsplit_once('.')
                && !column.is_empty()
            {
                columns.insert(CompactString::from(column));
            }
        }
    }
    columns
}

/// Column pairs of each join's `ON` condition, one group per join clause
pub fn join_columns(joins: &[String]) -> Vec<ColumnVec> {
    joins.iter().filter_map(|join| on_columns(join)).collect()
}

fn on_columns(join: &str) -> Option<ColumnVec> {
    let upper = join.to_ascii_uppercase();
    let start = upper.find("ON")? + 2;
    let end = upper[start..]
        .find("ON")
        .map_or(upper.len(), |offset| start + offset);
    let condition = &join[start..end];

    let columns: ColumnVec = condition
        .split('=')
        .filter(|side| side.contains('.'))
        .filter_map(|side| side.rsplit_once('.'))
        .map(|(_, column)| column.trim())
        .filter(|column| !column.is_empty())
        .map(CompactString::from)
        .collect();
    (!columns.is_empty()).then_some(columns)
}

/// Rendered text of every direct child of every top-level group
fn clause_children(tree: &StatementTree) -> impl Iterator<Item = String> + '_ {
    tree.groups()
        .flat_map(|group| group.children.iter())
        .map(Token::text)
}

fn starts_with_keyword(text: &str, keyword: &str) -> bool {
    text.trim_start()
        .get(..keyword.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(keyword))
}
