// SPDX-FileCopyrightText: 2025 RAprogramm
// SPDX-License-Identifier: MIT

use sql_query_advisor::{
    error::AnalysisError,
    statement::{GroupKind, SqlDialect, StatementTree, StatementType, Token, split_statements}
};

fn parse(sql: &str) -> StatementTree {
    StatementTree::parse(sql, SqlDialect::Generic).unwrap()
}

fn top_level_relations(tree: &StatementTree) -> Vec<String> {
    tree.tokens()
        .iter()
        .filter_map(Token::real_name)
        .map(str::to_string)
        .collect()
}

#[test]
fn test_tree_renders_source() {
    let sql = "SELECT u.id, COUNT(*) AS n\nFROM users u /* all */ LEFT JOIN orders o ON o.uid = u.id\nGROUP BY u.id";
    assert_eq!(parse(sql).text(), sql);
}

#[test]
fn test_clauses_group_holds_every_clause() {
    let tree = parse(
        "SELECT * FROM a INNER JOIN b ON a.id = b.id WHERE a.x = 1 GROUP BY a.y HAVING count(*) > 1 \
         ORDER BY a.y LIMIT 10 OFFSET 5"
    );
    let clauses: Vec<_> = tree
        .groups()
        .filter(|g| g.kind == GroupKind::Clauses)
        .collect();
    assert_eq!(clauses.len(), 1);

    let kinds: Vec<GroupKind> = clauses[0]
        .children
        .iter()
        .filter_map(Token::as_group)
        .map(|g| g.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            GroupKind::Join,
            GroupKind::Where,
            GroupKind::GroupBy,
            GroupKind::Having,
            GroupKind::OrderBy,
            GroupKind::Limit,
            GroupKind::Limit
        ]
    );
}

#[test]
fn test_join_qualifiers_stay_outside_join_group() {
    let tree = parse("SELECT * FROM a NATURAL FULL OUTER JOIN b");
    let clauses = tree.groups().next().unwrap();
    let first_clause = clauses.children.iter().find_map(Token::as_group).unwrap();

    assert_eq!(first_clause.kind, GroupKind::Join);
    assert_eq!(first_clause.text(), "JOIN b");
    assert_eq!(
        clauses.children[0].keyword().as_deref(),
        Some("NATURAL")
    );
}

#[test]
fn test_update_from_resumes_top_level() {
    let tree = parse("UPDATE t SET x = s.x FROM s WHERE s.id = t.id");
    assert_eq!(top_level_relations(&tree), vec!["t", "s"]);
    assert_eq!(tree.statement_type(), StatementType::Update);
}

#[test]
fn test_insert_select_relations() {
    let tree = parse("INSERT INTO archive (id) SELECT id FROM events WHERE old = true");
    assert_eq!(top_level_relations(&tree), vec!["archive", "events"]);
}

#[test]
fn test_delete_using() {
    let tree = parse("DELETE FROM t USING s WHERE t.id = s.id");
    assert_eq!(top_level_relations(&tree), vec!["t", "s"]);
}

#[test]
fn test_create_table_and_truncate() {
    assert_eq!(
        top_level_relations(&parse("CREATE TABLE IF NOT EXISTS app.users (id INT)")),
        vec!["users"]
    );
    assert_eq!(top_level_relations(&parse("TRUNCATE TABLE logs")), vec!["logs"]);
}

#[test]
fn test_quoted_relation_keeps_case() {
    let tree = StatementTree::parse("SELECT * FROM \"Select\"", SqlDialect::PostgreSQL).unwrap();
    assert_eq!(top_level_relations(&tree), vec!["Select"]);
}

#[test]
fn test_statement_type_for_dialects() {
    let cases = [
        (SqlDialect::MySQL, "REPLACE INTO t VALUES (1)", StatementType::Replace),
        (SqlDialect::PostgreSQL, "CREATE OR REPLACE VIEW v AS SELECT 1", StatementType::Create),
        (SqlDialect::MsSQL, "MERGE INTO t USING s ON t.id = s.id", StatementType::Merge),
        (SqlDialect::SQLite, "WITH RECURSIVE r AS (SELECT 1) SELECT * FROM r", StatementType::Select)
    ];
    for (dialect, sql, expected) in cases {
        let tree = StatementTree::parse(sql, dialect).unwrap();
        assert_eq!(tree.statement_type(), expected, "{}", sql);
    }
}

#[test]
fn test_parse_errors() {
    assert_eq!(
        StatementTree::parse(" ; -- nothing\n ;", SqlDialect::Generic),
        Err(AnalysisError::EmptyStatement)
    );
    assert!(matches!(
        StatementTree::parse("SELECT \"open", SqlDialect::Generic),
        Err(AnalysisError::Lex(_))
    ));
}

#[test]
fn test_split_statements_script() {
    let script = "
        -- users
        SELECT * FROM users;

        UPDATE users SET name = 'a;b' WHERE id = 1;
        ;
    ";
    let statements = split_statements(script, SqlDialect::Generic);
    assert_eq!(statements.len(), 2);
    assert_eq!(statements[0], "-- users\n        SELECT * FROM users");
    assert_eq!(statements[1], "UPDATE users SET name = 'a;b' WHERE id = 1");
}

#[test]
fn test_split_statements_postgres_dollar_quotes() {
    let script = "SELECT $$a;b$$; SELECT 2";
    let statements = split_statements(script, SqlDialect::PostgreSQL);
    assert_eq!(statements, vec!["SELECT $$a;b$$", "SELECT 2"]);
}
