//! Heuristic complexity score.
//!
//! | Signal                                   | Points |
//! |------------------------------------------|--------|
//! | each join clause                         | +1     |
//! | `SELECT` nested before the main `FROM`   | +2     |
//! | `GROUP BY` or `HAVING`                   | +1     |
//! | `OVER` (window functions)                | +2     |
//!
//! All checks except the join count are plain substring searches on the
//! uppercased statement text.

use super::types::Complexity;

/// Score a statement from its text and the number of join clauses found
pub fn score(text: &str, join_count: usize) -> u32 {
    let upper = text.to_ascii_uppercase();
    let mut score = u32::try_from(join_count).unwrap_or(u32::MAX);

    if has_nested_select(&upper) {
        score = score.saturating_add(2);
    }
    if upper.contains("GROUP BY") || upper.contains("HAVING") {
        score = score.saturating_add(1);
    }
    if upper.contains("OVER") {
        score = score.saturating_add(2);
    }
    score
}

pub fn rate(text: &str, join_count: usize) -> (u32, Complexity) {
    let score = score(text, join_count);
    (score, Complexity::from_score(score))
}

/// `SELECT` before the first `FROM`, not counting the statement's own
fn has_nested_select(upper: &str) -> bool {
    let Some(from) = upper.find("FROM") else {
        return false;
    };
    let prefix = skip_leading_comments(&upper[..from]);
    let prefix = prefix.strip_prefix("SELECT").unwrap_or(prefix);
    prefix.contains("SELECT")
}

/// `text` without leading whitespace, `--` line comments and `/* */` blocks
fn skip_leading_comments(text: &str) -> &str {
    let mut rest = text.trim_start();
    loop {
        if let Some(line) = rest.strip_prefix("--") {
            rest = line.split_once('\n').map_or("", |(_, after)| after);
        } else if let Some(block) = rest.strip_prefix("/*") {
            rest = block.split_once("*/").map_or("", |(_, after)| after);
        } else {
            return rest;
        }
        rest = rest.trim_start();
    }
}
