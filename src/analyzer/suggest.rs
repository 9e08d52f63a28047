use compact_str::CompactString;
use indexmap::IndexSet;

use super::types::ColumnVec;

pub const DECOMPOSE_JOINS: &str =
    "Consider breaking down complex joins into smaller queries or views";
pub const FULL_SCAN: &str = "Full table scan detected - this might be intentional";
pub const ADD_FILTERS: &str = "Consider adding appropriate filters to limit result set";
pub const EXPLICIT_COLUMNS: &str = "Specify needed columns instead of SELECT *";

/// Joins beyond this count trigger the decomposition hint
const MAX_JOINS: usize = 2;

/// Inputs of the suggestion synthesizer
#[derive(Debug, Clone, Copy)]
pub struct SuggestionInput<'a> {
    pub text:          &'a str,
    pub join_count:    usize,
    pub table_count:   usize,
    pub has_where:     bool,
    pub where_columns: &'a IndexSet<CompactString>,
    pub join_columns:  &'a [ColumnVec]
}

/// Index hints: one per WHERE column, then one composite per join group
pub fn index_suggestions(
    where_columns: &IndexSet<CompactString>,
    join_columns: &[ColumnVec]
) -> Vec<String> {
    let single = where_columns
        .iter()
        .map(|column| format!("Consider index on {}", column));
    let composite = join_columns
        .iter()
        .map(|group| {
            let columns: Vec<&str> = group.iter().map(CompactString::as_str).collect();
            format!("Consider composite index on {}", columns.join(", "))
        });
    single.chain(composite).collect()
}

/// Build the ordered suggestion list
pub fn synthesize(input: SuggestionInput<'_>) -> Vec<String> {
    let upper = input.text.to_ascii_uppercase();
    let select_star = upper.contains("SELECT *");
    let mut suggestions = Vec::new();

    if input.join_count > MAX_JOINS {
        suggestions.push(DECOMPOSE_JOINS.to_string());
    }
    suggestions.extend(index_suggestions(input.where_columns, input.join_columns));
    if !input.has_where && input.table_count > 0 {
        if upper.contains("COUNT(*)") || select_star {
            suggestions.push(FULL_SCAN.to_string());
        } else {
            suggestions.push(ADD_FILTERS.to_string());
        }
    }
    if select_star {
        suggestions.push(EXPLICIT_COLUMNS.to_string());
    }
    suggestions
}
