//! Shallow grouping of lexer tokens into a statement tree.
//!
//! The builder is deliberately lexical. It recognises just enough structure
//! for the extractors: relation references after `FROM`/`INTO`/`UPDATE`/...,
//! the clause tail of a statement (joins, filters, grouping, ordering) and
//! parenthesized regions. Everything else stays atomic.
//!
//! ```text
//! SELECT a.x FROM a LEFT JOIN b ON a.id = b.a_id WHERE a.flag
//!
//! Keyword  Name . Name  Keyword  Relation(a)  Group(Clauses)
//!                                             ├── Keyword(LEFT)
//!                                             ├── Group(Join)  "JOIN b ON a.id = b.a_id"
//!                                             └── Group(Where) "WHERE a.flag"
//! ```

use compact_str::CompactString;
use sqlparser::{
    keywords::Keyword,
    tokenizer::{Token as Lexeme, Word}
};

use super::token::{Group, GroupKind, Relation, Token};

/// What kind of keyword introduced an expected relation reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RelationContext {
    /// `FROM`, `USING`, `JOIN`: a name followed by `(` is a table function
    Source,
    /// `INTO`, `UPDATE`, `TABLE`, `TRUNCATE`: a following `(` is a column list
    Target
}

/// Deepest parenthesis nesting the builder accepts.
///
/// Grouping recurses once per level, so input is checked with
/// [`nesting_depth`] before [`build`] runs.
pub const MAX_NESTING: usize = 64;

/// Deepest parenthesis nesting in `lexemes`. Unclosed parentheses count, stray
/// closing ones are ignored.
pub fn nesting_depth(lexemes: &[Lexeme]) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0usize;
    for lexeme in lexemes {
        match lexeme {
            Lexeme::LParen => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            Lexeme::RParen => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}

/// Group a run of lexer tokens (no EOF, no statement terminator).
///
/// Recursion depth follows parenthesis nesting; callers bound it with
/// [`nesting_depth`].
pub fn build(lexemes: &[Lexeme]) -> Vec<Token> {
    let mut out = Vec::with_capacity(lexemes.len());
    let mut expect: Option<RelationContext> = None;
    let mut list: Option<RelationContext> = None;
    let mut pos = 0;

    while pos < lexemes.len() {
        if let Some(context) = expect
            && let Some((relation, next)) = relation_at(lexemes, pos, context)
        {
            out.push(Token::Relation(relation));
            expect = None;
            pos = next;
            continue;
        }
        if clause_starts_at(lexemes, pos) {
            let (tokens, next) = clauses(lexemes, pos);
            out.extend(tokens);
            expect = None;
            list = None;
            pos = next;
            continue;
        }

        let lexeme = &lexemes[pos];
        match lexeme {
            Lexeme::LParen => {
                let (group, next) = parenthesis(lexemes, pos);
                out.push(group);
                expect = None;
                pos = next;
                continue;
            }
            Lexeme::Comma => expect = list,
            Lexeme::Whitespace(_) => {}
            _ => match keyword_of(lexeme) {
                Some(keyword) => {
                    if let Some(context) = introduces_relation(keyword) {
                        expect = Some(context);
                        list = Some(context);
                    } else if !(expect.is_some() && keeps_expectation(keyword)) {
                        expect = None;
                        if is_stop_keyword(keyword) {
                            list = None;
                        }
                    }
                }
                None => expect = None
            }
        }
        out.push(atom(lexeme));
        pos += 1;
    }
    out
}

/// Render a lexer token back to SQL text.
///
/// Single-quoted strings get their embedded quotes doubled again so the
/// output re-lexes to the same tokens.
pub fn render(lexeme: &Lexeme) -> String {
    match lexeme {
        Lexeme::SingleQuotedString(value) => format!("'{}'", value.replace('\'', "''")),
        other => other.to_string()
    }
}

pub fn is_significant(lexeme: &Lexeme) -> bool {
    !matches!(lexeme, Lexeme::Whitespace(_) | Lexeme::EOF)
}

fn atom(lexeme: &Lexeme) -> Token {
    let text = CompactString::from(render(lexeme));
    match lexeme {
        Lexeme::Word(word) if word.quote_style.is_none() && is_reserved(word.keyword) => {
            Token::Keyword(text)
        }
        Lexeme::Word(_) => Token::Name(text),
        Lexeme::Number(..)
        | Lexeme::SingleQuotedString(_)
        | Lexeme::DoubleQuotedString(_)
        | Lexeme::NationalStringLiteral(_)
        | Lexeme::EscapedStringLiteral(_)
        | Lexeme::HexStringLiteral(_)
        | Lexeme::DollarQuotedString(_)
        | Lexeme::Placeholder(_) => Token::Literal(text),
        Lexeme::Whitespace(_) => Token::Whitespace(text),
        Lexeme::Comma
        | Lexeme::Period
        | Lexeme::SemiColon
        | Lexeme::LParen
        | Lexeme::RParen
        | Lexeme::LBracket
        | Lexeme::RBracket => Token::Punctuation(text),
        _ => Token::Operator(text)
    }
}

/// Atoms with parenthesized regions grouped, nothing else recognised
fn flat(lexemes: &[Lexeme]) -> Vec<Token> {
    let mut out = Vec::with_capacity(lexemes.len());
    let mut pos = 0;
    while pos < lexemes.len() {
        if matches!(lexemes[pos], Lexeme::LParen) {
            let (group, next) = parenthesis(lexemes, pos);
            out.push(group);
            pos = next;
        } else {
            out.push(atom(&lexemes[pos]));
            pos += 1;
        }
    }
    out
}

/// `(`, grouped content, `)`. An unclosed parenthesis runs to the end.
fn parenthesis(lexemes: &[Lexeme], open: usize) -> (Token, usize) {
    let close = matching_paren(lexemes, open);
    let inner_end = close.unwrap_or(lexemes.len());
    let mut children = vec![atom(&lexemes[open])];
    let inner = &lexemes[open + 1..inner_end];
    if !inner.is_empty() {
        children.push(Token::Group(Group::new(GroupKind::Expression, build(inner))));
    }
    if let Some(close) = close {
        children.push(atom(&lexemes[close]));
    }
    let next = close.map_or(lexemes.len(), |close| close + 1);
    (Token::Group(Group::new(GroupKind::Parenthesis, children)), next)
}

fn matching_paren(lexemes: &[Lexeme], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, lexeme) in lexemes.iter().enumerate().skip(open) {
        match lexeme {
            Lexeme::LParen => depth += 1,
            Lexeme::RParen => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

/// Collect the clause tail starting at `start`.
///
/// Returns the `Clauses` group followed by any whitespace that trailed the
/// last clause, plus the position where top-level grouping resumes.
fn clauses(lexemes: &[Lexeme], start: usize) -> (Vec<Token>, usize) {
    let mut children = Vec::new();
    let mut pos = start;

    while pos < lexemes.len() {
        if ends_clauses(lexemes, pos) {
            break;
        }
        if let Some(join) = join_after_qualifiers(lexemes, pos) {
            children.extend(lexemes[pos..join].iter().map(atom));
            pos = join;
            continue;
        }
        if let Some(kind) = clause_kind_at(lexemes, pos) {
            let end = clause_end(lexemes, pos);
            let body = &lexemes[pos..end];
            let significant_end = body
                .iter()
                .rposition(is_significant)
                .map_or(body.len(), |idx| idx + 1);
            children.push(Token::Group(Group::new(
                kind,
                clause_body(kind, &body[..significant_end])
            )));
            children.extend(body[significant_end..].iter().map(atom));
            pos = end;
            continue;
        }
        if matches!(lexemes[pos], Lexeme::LParen) {
            let (group, next) = parenthesis(lexemes, pos);
            children.push(group);
            pos = next;
        } else {
            children.push(atom(&lexemes[pos]));
            pos += 1;
        }
    }

    let split = children
        .iter()
        .rposition(|token| !token.is_whitespace())
        .map_or(0, |idx| idx + 1);
    let trailing = children.split_off(split);
    let mut out = Vec::with_capacity(trailing.len() + 1);
    out.push(Token::Group(Group::new(GroupKind::Clauses, children)));
    out.extend(trailing);
    (out, pos)
}

fn clause_body(kind: GroupKind, body: &[Lexeme]) -> Vec<Token> {
    if kind != GroupKind::Join || body.is_empty() {
        return flat(body);
    }
    let mut tokens = vec![atom(&body[0])];
    let mut pos = 1;
    while pos < body.len() && !is_significant(&body[pos]) {
        tokens.push(atom(&body[pos]));
        pos += 1;
    }
    if let Some((relation, next)) = relation_at(body, pos, RelationContext::Source) {
        tokens.push(Token::Relation(relation));
        pos = next;
    }
    tokens.extend(flat(&body[pos..]));
    tokens
}

/// Exclusive end of the clause starting at `start`: the next clause
/// boundary at parenthesis depth zero, or the end of input.
fn clause_end(lexemes: &[Lexeme], start: usize) -> usize {
    let mut pos = start + 1;
    while pos < lexemes.len() {
        if matches!(lexemes[pos], Lexeme::LParen) {
            pos = matching_paren(lexemes, pos).map_or(lexemes.len(), |close| close + 1);
            continue;
        }
        if clause_starts_at(lexemes, pos) || ends_clauses(lexemes, pos) {
            break;
        }
        pos += 1;
    }
    pos
}

fn clause_starts_at(lexemes: &[Lexeme], pos: usize) -> bool {
    clause_kind_at(lexemes, pos).is_some() || join_after_qualifiers(lexemes, pos).is_some()
}

fn clause_kind_at(lexemes: &[Lexeme], pos: usize) -> Option<GroupKind> {
    match keyword_of(lexemes.get(pos)?)? {
        Keyword::JOIN => Some(GroupKind::Join),
        Keyword::WHERE => Some(GroupKind::Where),
        Keyword::GROUP if followed_by(lexemes, pos, Keyword::BY) => Some(GroupKind::GroupBy),
        Keyword::ORDER if followed_by(lexemes, pos, Keyword::BY) => Some(GroupKind::OrderBy),
        Keyword::HAVING => Some(GroupKind::Having),
        Keyword::LIMIT | Keyword::OFFSET | Keyword::FETCH => Some(GroupKind::Limit),
        Keyword::SET => Some(GroupKind::Set),
        Keyword::VALUES => Some(GroupKind::Values),
        Keyword::RETURNING => Some(GroupKind::Returning),
        Keyword::WINDOW => Some(GroupKind::Window),
        Keyword::QUALIFY => Some(GroupKind::Clause),
        _ => None
    }
}

/// Position of `JOIN` when `pos` starts a run like `LEFT OUTER JOIN`
fn join_after_qualifiers(lexemes: &[Lexeme], pos: usize) -> Option<usize> {
    if !keyword_of(lexemes.get(pos)?).is_some_and(is_join_qualifier) {
        return None;
    }
    let mut cursor = pos + 1;
    loop {
        let idx = next_significant(lexemes, cursor)?;
        match keyword_of(&lexemes[idx]) {
            Some(Keyword::JOIN) => return Some(idx),
            Some(keyword) if is_join_qualifier(keyword) => cursor = idx + 1,
            _ => return None
        }
    }
}

/// Keywords that hand control back to top-level grouping
fn ends_clauses(lexemes: &[Lexeme], pos: usize) -> bool {
    match keyword_of(&lexemes[pos]) {
        Some(Keyword::UNION | Keyword::EXCEPT | Keyword::INTERSECT | Keyword::SELECT) => true,
        // `IS DISTINCT FROM` belongs to the predicate
        Some(Keyword::FROM) => !prev_significant(lexemes, pos)
            .is_some_and(|idx| keyword_of(&lexemes[idx]) == Some(Keyword::DISTINCT)),
        _ => false
    }
}

/// Parse `name[.name]*[[AS] alias]` at `pos`.
fn relation_at(
    lexemes: &[Lexeme],
    pos: usize,
    context: RelationContext
) -> Option<(Relation, usize)> {
    let Lexeme::Word(first) = lexemes.get(pos)? else {
        return None;
    };
    if is_stop_word(first) {
        return None;
    }

    let mut segments = vec![first.value.as_str()];
    let mut end = pos + 1;
    while let (Some(Lexeme::Period), Some(Lexeme::Word(next))) =
        (lexemes.get(end), lexemes.get(end + 1))
    {
        segments.push(next.value.as_str());
        end += 2;
    }

    let after = next_significant(lexemes, end);
    if context == RelationContext::Source
        && after.is_some_and(|idx| matches!(lexemes[idx], Lexeme::LParen))
    {
        return None;
    }

    let mut alias = None;
    if let Some(idx) = after
        && let Lexeme::Word(word) = &lexemes[idx]
    {
        if word.quote_style.is_none() && word.keyword == Keyword::AS {
            if let Some(name_idx) = next_significant(lexemes, idx + 1)
                && let Lexeme::Word(name) = &lexemes[name_idx]
                && !is_stop_word(name)
            {
                alias = Some(CompactString::from(name.value.as_str()));
                end = name_idx + 1;
            }
        } else if !is_stop_word(word) {
            alias = Some(CompactString::from(word.value.as_str()));
            end = idx + 1;
        }
    }

    let name = segments.pop().unwrap_or_default();
    let qualifier = (!segments.is_empty()).then(|| CompactString::from(segments.join(".")));
    let text: String = lexemes[pos..end].iter().map(render).collect();
    let relation = Relation {
        name: CompactString::from(name),
        qualifier,
        alias,
        text: CompactString::from(text)
    };
    Some((relation, end))
}

fn keyword_of(lexeme: &Lexeme) -> Option<Keyword> {
    match lexeme {
        Lexeme::Word(word) if word.quote_style.is_none() && word.keyword != Keyword::NoKeyword => {
            Some(word.keyword)
        }
        _ => None
    }
}

fn followed_by(lexemes: &[Lexeme], pos: usize, keyword: Keyword) -> bool {
    next_significant(lexemes, pos + 1)
        .is_some_and(|idx| keyword_of(&lexemes[idx]) == Some(keyword))
}

fn next_significant(lexemes: &[Lexeme], from: usize) -> Option<usize> {
    (from..lexemes.len()).find(|&idx| is_significant(&lexemes[idx]))
}

fn prev_significant(lexemes: &[Lexeme], before: usize) -> Option<usize> {
    (0..before).rev().find(|&idx| is_significant(&lexemes[idx]))
}

fn introduces_relation(keyword: Keyword) -> Option<RelationContext> {
    match keyword {
        Keyword::FROM | Keyword::USING => Some(RelationContext::Source),
        Keyword::INTO | Keyword::UPDATE | Keyword::TABLE | Keyword::TRUNCATE => {
            Some(RelationContext::Target)
        }
        _ => None
    }
}

/// Modifiers allowed between a relation keyword and the relation itself
fn keeps_expectation(keyword: Keyword) -> bool {
    matches!(
        keyword,
        Keyword::IF | Keyword::NOT | Keyword::EXISTS | Keyword::ONLY | Keyword::TABLE
    )
}

fn is_join_qualifier(keyword: Keyword) -> bool {
    matches!(
        keyword,
        Keyword::LEFT
            | Keyword::RIGHT
            | Keyword::FULL
            | Keyword::INNER
            | Keyword::OUTER
            | Keyword::CROSS
            | Keyword::NATURAL
    )
}

/// Keywords that can never be a relation name or alias
fn is_stop_keyword(keyword: Keyword) -> bool {
    is_join_qualifier(keyword)
        || matches!(
            keyword,
            Keyword::SELECT
                | Keyword::FROM
                | Keyword::WHERE
                | Keyword::JOIN
                | Keyword::ON
                | Keyword::USING
                | Keyword::GROUP
                | Keyword::HAVING
                | Keyword::ORDER
                | Keyword::LIMIT
                | Keyword::OFFSET
                | Keyword::FETCH
                | Keyword::SET
                | Keyword::VALUES
                | Keyword::RETURNING
                | Keyword::WINDOW
                | Keyword::QUALIFY
                | Keyword::UNION
                | Keyword::EXCEPT
                | Keyword::INTERSECT
                | Keyword::AS
                | Keyword::WITH
                | Keyword::INTO
                | Keyword::INSERT
                | Keyword::UPDATE
                | Keyword::DELETE
                | Keyword::MERGE
                | Keyword::WHEN
                | Keyword::DEFAULT
                | Keyword::CASCADE
                | Keyword::RESTRICT
                | Keyword::PARTITION
                | Keyword::TABLESAMPLE
                | Keyword::LATERAL
                | Keyword::FOR
                | Keyword::AND
                | Keyword::OR
                | Keyword::IF
                | Keyword::NOT
                | Keyword::EXISTS
                | Keyword::ONLY
                | Keyword::TABLE
        )
}

fn is_stop_word(word: &Word) -> bool {
    word.quote_style.is_none() && is_stop_keyword(word.keyword)
}

/// Words rendered as [`Token::Keyword`] rather than [`Token::Name`]
fn is_reserved(keyword: Keyword) -> bool {
    is_stop_keyword(keyword)
        || matches!(
            keyword,
            Keyword::BY
                | Keyword::ALL
                | Keyword::DISTINCT
                | Keyword::REPLACE
                | Keyword::CREATE
                | Keyword::ALTER
                | Keyword::DROP
                | Keyword::TRUNCATE
                | Keyword::IN
                | Keyword::IS
                | Keyword::NULL
                | Keyword::LIKE
                | Keyword::ILIKE
                | Keyword::BETWEEN
                | Keyword::CASE
                | Keyword::THEN
                | Keyword::ELSE
                | Keyword::END
                | Keyword::ASC
                | Keyword::DESC
                | Keyword::TRUE
                | Keyword::FALSE
                | Keyword::OVER
                | Keyword::ANY
                | Keyword::SOME
        )
}
