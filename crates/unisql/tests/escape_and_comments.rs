//! Escaped Identifier and Comment Tests

use unisql::expressions::*;
use unisql::tokens::TokenType;
use unisql::{parse, Dialect, DialectType};

fn first_column(sql: &str, dialect: DialectType) -> Expression {
    let Expression::Select(s) = parse(sql, dialect).unwrap().statement else {
        panic!("expected Select");
    };
    let Expression::SelectQuery(q) = s.query else {
        panic!("expected SelectQuery");
    };
    q.columns[0].body.clone()
}

// ============================================================================
// Escaped Identifiers
// ============================================================================

mod escaped_identifiers {
    use super::*;

    #[test]
    fn test_bracketed_column_of_aliased_table() {
        let column = first_column("select rd.[System] from RouteData rd", DialectType::SqlServer);
        let Expression::Property(p) = column else {
            panic!("expected property");
        };
        assert_eq!(p.table.value, "rd");
        assert_eq!(p.name.value, "[System]");
        assert_eq!(p.name.left_qualifier.as_deref(), Some("["));
        assert_eq!(p.name.right_qualifier.as_deref(), Some("]"));
        assert_eq!(p.name.unescaped(), "System");
    }

    #[test]
    fn test_keyword_as_escaped_name() {
        let column = first_column("SELECT `select` FROM `from`", DialectType::MySql);
        let Expression::Identifier(id) = column else {
            panic!("expected identifier");
        };
        assert!(id.is_escaped());
        assert_eq!(id.unescaped(), "select");
    }

    #[test]
    fn test_escaped_name_with_spaces() {
        let column = first_column(
            "SELECT \"first name\" FROM \"Customer Table\"",
            DialectType::Pgsql,
        );
        let Expression::Identifier(id) = column else {
            panic!("expected identifier");
        };
        assert_eq!(id.value, "\"first name\"");
        assert_eq!(id.unescaped(), "first name");
    }

    #[test]
    fn test_escaped_alias() {
        let Expression::Select(s) = parse("SELECT a AS [Total Amount] FROM t", DialectType::SqlServer)
            .unwrap()
            .statement
        else {
            panic!("expected Select");
        };
        let Expression::SelectQuery(q) = &s.query else {
            panic!("expected SelectQuery");
        };
        assert_eq!(q.columns[0].alias.as_ref().unwrap().unescaped(), "Total Amount");
    }

    #[test]
    fn test_escaped_table_parts() {
        let Expression::Select(s) = parse("SELECT * FROM [dbo].[Order Details] od", DialectType::SqlServer)
            .unwrap()
            .statement
        else {
            panic!("expected Select");
        };
        let Expression::SelectQuery(q) = &s.query else {
            panic!("expected SelectQuery");
        };
        let Some(Expression::Table(t)) = &q.from else {
            panic!("expected table");
        };
        assert_eq!(t.schema.as_ref().unwrap().unescaped(), "dbo");
        assert_eq!(t.name.unescaped(), "Order Details");
        assert_eq!(t.alias.as_ref().unwrap().value, "od");
    }

    #[test]
    fn test_other_dialect_delimiters_are_not_escapes() {
        // Backticks mean nothing to SQL Server
        assert!(parse("SELECT `a` FROM t", DialectType::SqlServer).is_err());
        // Brackets are subscripts in PostgreSQL
        assert!(matches!(
            first_column("SELECT a[1] FROM t", DialectType::Pgsql),
            Expression::ArrayIndex(_)
        ));
    }

    #[test]
    fn test_normalized_stream_has_single_token() {
        let normalized = Dialect::get(DialectType::SqlServer)
            .normalize("select [Order Details] from t")
            .unwrap();
        let quoted: Vec<_> = normalized
            .tokens
            .iter()
            .filter(|t| t.token_type == TokenType::QuotedIdentifier)
            .collect();
        assert_eq!(quoted.len(), 1);
        assert_eq!(quoted[0].text, "[Order Details]");
        assert_eq!(quoted[0].span.column, 8);
    }
}

// ============================================================================
// Comments
// ============================================================================

mod comments {
    use super::*;

    #[test]
    fn test_line_comment_is_collected() {
        let parsed = parse("select 1 --note", DialectType::MySql).unwrap();
        assert_eq!(parsed.comments, vec!["note"]);
        assert_eq!(parsed.statement, parse("select 1", DialectType::MySql).unwrap().statement);
    }

    #[test]
    fn test_comments_in_source_order() {
        let parsed = parse(
            "/* header */\nSELECT a, -- first column\n  b /* second */\nFROM t -- done",
            DialectType::Pgsql,
        )
        .unwrap();
        assert_eq!(parsed.comments, vec!["header", "first column", "second", "done"]);
    }

    #[test]
    fn test_comment_between_name_parts() {
        let column = first_column("SELECT t. /* x */ a FROM t", DialectType::Sqlite);
        assert!(matches!(column, Expression::Property(p) if p.name.value == "a"));
    }

    #[test]
    fn test_hint_is_not_a_comment_for_mysql() {
        let parsed = parse(
            "SELECT /*+ MAX_EXECUTION_TIME(1000) */ a FROM t /* plain */",
            DialectType::MySql,
        )
        .unwrap();
        assert_eq!(parsed.comments, vec!["plain"]);
    }

    #[test]
    fn test_hint_is_a_comment_for_postgres() {
        let parsed = parse("SELECT /*+ SeqScan(t) */ a FROM t", DialectType::Pgsql).unwrap();
        assert_eq!(parsed.comments, vec!["+ SeqScan(t)"]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let parsed = parse("SELECT a -- one\r\nFROM t\r\nWHERE b = 1", DialectType::MySql).unwrap();
        assert_eq!(parsed.comments, vec!["one"]);
    }
}
