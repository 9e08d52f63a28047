use compact_str::CompactString;
use indexmap::IndexSet;
use serde::Serialize;
use smallvec::SmallVec;

use crate::statement::StatementType;

/// Type alias for small column vectors (typically < 8 elements)
pub type ColumnVec = SmallVec<[CompactString; 8]>;

/// Severity label for a statement.
///
/// Ordered `Simple < Moderate < Complex`; `Unknown` sorts last but is never
/// "at least" any bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[non_exhaustive]
pub enum Complexity {
    Simple,
    Moderate,
    Complex,
    Unknown
}

impl Complexity {
    /// Bucket a heuristic score: `<= 1` simple, `2..=3` moderate, else complex
    pub fn from_score(score: u32) -> Self {
        match score {
            0..=1 => Self::Simple,
            2..=3 => Self::Moderate,
            _ => Self::Complex
        }
    }

    /// Whether this rating reaches `threshold`. `Unknown` never does.
    pub fn is_at_least(self, threshold: Self) -> bool {
        self != Self::Unknown && threshold != Self::Unknown && self >= threshold
    }
}

impl std::fmt::Display for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Simple => write!(f, "Simple"),
            Self::Moderate => write!(f, "Moderate"),
            Self::Complex => write!(f, "Complex"),
            Self::Unknown => write!(f, "Unknown")
        }
    }
}

/// Verdict for one SQL statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    pub complexity:             Complexity,
    pub tables_involved:        IndexSet<CompactString>,
    pub suggested_improvements: Vec<String>,
    pub statement_type:         StatementType
}

impl AnalysisResult {
    /// Result for a statement that could not be analyzed
    pub fn degraded(reason: impl std::fmt::Display) -> Self {
        Self {
            complexity:             Complexity::Unknown,
            tables_involved:        IndexSet::new(),
            suggested_improvements: vec![format!("Error analyzing query: {}", reason)],
            statement_type:         StatementType::Unknown
        }
    }
}

/// Raw extractor outputs behind an [`AnalysisResult`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryFeatures {
    pub statement_type: StatementType,
    pub tables:         IndexSet<CompactString>,
    /// Verbatim text of each top-level join clause
    pub joins:          Vec<String>,
    pub has_where:      bool,
    pub where_columns:  IndexSet<CompactString>,
    /// One column group per join clause with an `ON` condition
    pub join_columns:   Vec<ColumnVec>,
    pub score:          u32,
    pub complexity:     Complexity
}
