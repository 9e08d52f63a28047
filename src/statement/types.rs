use serde::Serialize;

/// Kind of SQL statement, decided by its leading keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
#[non_exhaustive]
pub enum StatementType {
    Select,
    Insert,
    Update,
    Delete,
    Replace,
    Merge,
    Create,
    Alter,
    Drop,
    Unknown
}

impl StatementType {
    /// Map a leading keyword (any case) to a statement type.
    ///
    /// Returns `None` for keywords that do not decide the type on their own,
    /// `WITH` included.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_uppercase().as_str() {
            "SELECT" => Some(Self::Select),
            "INSERT" => Some(Self::Insert),
            "UPDATE" => Some(Self::Update),
            "DELETE" => Some(Self::Delete),
            "REPLACE" => Some(Self::Replace),
            "MERGE" => Some(Self::Merge),
            "CREATE" => Some(Self::Create),
            "ALTER" => Some(Self::Alter),
            "DROP" => Some(Self::Drop),
            _ => None
        }
    }

    /// Whether this type can follow a `WITH` list
    pub fn is_dml(&self) -> bool {
        matches!(
            self,
            Self::Select | Self::Insert | Self::Update | Self::Delete | Self::Merge
        )
    }
}

impl std::fmt::Display for StatementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Select => write!(f, "SELECT"),
            Self::Insert => write!(f, "INSERT"),
            Self::Update => write!(f, "UPDATE"),
            Self::Delete => write!(f, "DELETE"),
            Self::Replace => write!(f, "REPLACE"),
            Self::Merge => write!(f, "MERGE"),
            Self::Create => write!(f, "CREATE"),
            Self::Alter => write!(f, "ALTER"),
            Self::Drop => write!(f, "DROP"),
            Self::Unknown => write!(f, "UNKNOWN")
        }
    }
}
