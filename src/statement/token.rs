use std::fmt;

use compact_str::CompactString;

/// One node of a [`StatementTree`](super::StatementTree).
///
/// Atomic variants carry their source text verbatim. [`Token::Group`] nests
/// further tokens and renders as the concatenation of its children, so any
/// token prints back exactly the SQL it was built from.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Reserved word that shapes the statement (`SELECT`, `JOIN`, `AND`, ...)
    Keyword(CompactString),
    /// Column, function or other non-relation name
    Name(CompactString),
    /// Named relation reference, possibly qualified and aliased
    Relation(Relation),
    /// Number, string or placeholder
    Literal(CompactString),
    /// Comparison, arithmetic and other operators, including `*`
    Operator(CompactString),
    /// `(`, `)`, `,`, `.`, `;` and friends
    Punctuation(CompactString),
    /// Spaces, newlines and comments
    Whitespace(CompactString),
    /// Ordered run of child tokens
    Group(Group)
}

impl Token {
    /// Name of the referenced relation, if this token is one.
    ///
    /// Only [`Token::Relation`] answers; groups and names never do.
    pub fn real_name(&self) -> Option<&str> {
        match self {
            Self::Relation(relation) if !relation.name.is_empty() => Some(relation.name.as_str()),
            _ => None
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Self::Group(group) => Some(group),
            _ => None
        }
    }

    pub fn is_whitespace(&self) -> bool {
        matches!(self, Self::Whitespace(_))
    }

    /// Keyword text uppercased, `None` for anything that is not a keyword
    pub fn keyword(&self) -> Option<String> {
        match self {
            Self::Keyword(text) => Some(text.as_str().to_ascii_uppercase()),
            _ => None
        }
    }

    /// Rendered source text of this token
    pub fn text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyword(text)
            | Self::Name(text)
            | Self::Literal(text)
            | Self::Operator(text)
            | Self::Punctuation(text)
            | Self::Whitespace(text) => f.write_str(text),
            Self::Relation(relation) => f.write_str(&relation.text),
            Self::Group(group) => fmt::Display::fmt(group, f)
        }
    }
}

/// Table reference such as `public.users AS u`.
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    /// Unqualified relation name with quotes removed
    pub name:      CompactString,
    /// Everything before the last `.` of a qualified name
    pub qualifier: Option<CompactString>,
    pub alias:     Option<CompactString>,
    /// Verbatim source text including qualifier and alias
    pub text:      CompactString
}

/// What a [`Group`] stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    /// `( ... )` including both parentheses
    Parenthesis,
    /// Content between a pair of parentheses
    Expression,
    /// Clause tail of a statement (joins, filters, grouping, ordering)
    Clauses,
    Join,
    Where,
    GroupBy,
    Having,
    OrderBy,
    /// `LIMIT`, `OFFSET` or `FETCH`
    Limit,
    Set,
    Values,
    Returning,
    Window,
    /// Any other clause, e.g. `QUALIFY`
    Clause
}

#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub kind:     GroupKind,
    pub children: Vec<Token>
}

impl Group {
    pub fn new(kind: GroupKind, children: Vec<Token>) -> Self {
        Self {
            kind,
            children
        }
    }

    /// Rendered source text of the whole group
    pub fn text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for child in &self.children {
            fmt::Display::fmt(child, f)?;
        }
        Ok(())
    }
}
