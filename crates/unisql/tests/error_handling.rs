//! Error Handling Tests
//!
//! Every failure aborts the parse with a typed error; no partial tree comes back.

use unisql::dialects::{Dialect, DialectType};
use unisql::parser::{Parser, ParserConfig};
use unisql::{parse, parse_by_name, tokenize, Error};

fn parse_err(sql: &str, dialect: DialectType) -> Error {
    match parse(sql, dialect) {
        Ok(parsed) => panic!("expected {:?} to fail, got {:?}", sql, parsed.statement),
        Err(e) => e,
    }
}

// ============================================================================
// Lexical Errors
// ============================================================================

mod lexical_errors {
    use super::*;

    #[test]
    fn test_two_decimal_points() {
        let err = parse_err("select 1.2.3", DialectType::MySql);
        assert!(err.is_lexical());
        assert!(err.to_string().contains("more than one decimal point"));
    }

    #[test]
    fn test_unsupported_character() {
        let err = parse_err("select a ? b", DialectType::MySql);
        assert!(matches!(err, Error::Tokenize { .. }));
        assert!(err.to_string().contains('?'));
    }

    #[test]
    fn test_unterminated_string() {
        let err = parse_err("SELECT 'unclosed string", DialectType::Pgsql);
        assert!(err.to_string().contains("Unterminated string"));
    }

    #[test]
    fn test_unterminated_block_comment() {
        let err = parse_err("SELECT 1 /* never closed", DialectType::Oracle);
        assert!(err.to_string().contains("Unterminated block comment"));
    }

    #[test]
    fn test_unclosed_escape_delimiter() {
        let err = parse_err("select [Order Details from t", DialectType::SqlServer);
        assert!(err.is_lexical());
    }

    #[test]
    fn test_empty_escape_delimiter() {
        let err = parse_err("select `` from t", DialectType::MySql);
        assert!(err.to_string().contains("Empty escaped identifier"));
    }

    #[test]
    fn test_error_position() {
        match parse_err("select a\nfrom t where b = 'x", DialectType::MySql) {
            Error::Tokenize { line, column, .. } => {
                assert_eq!(line, 2);
                assert_eq!(column, 18);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_tokenize_entry_point() {
        assert!(tokenize("select 1.2.3", DialectType::Sqlite).is_err());
        let tokens = tokenize("select a -- c", DialectType::Sqlite).unwrap();
        assert_eq!(tokens.len(), 3);
    }
}

// ============================================================================
// Syntax Errors
// ============================================================================

mod syntax_errors {
    use super::*;

    #[test]
    fn test_missing_table_after_from() {
        let err = parse_err("select * from", DialectType::MySql);
        assert!(matches!(err, Error::Syntax { .. }));
        assert!(err.to_string().contains("end of input"));
    }

    #[test]
    fn test_unbalanced_parentheses() {
        assert!(parse("SELECT (1 + 2", DialectType::MySql).is_err());
        assert!(parse("SELECT 1 + 2)", DialectType::MySql).is_err());
        assert!(parse("SELECT ((1 + 2)", DialectType::MySql).is_err());
    }

    #[test]
    fn test_incomplete_clauses() {
        for sql in [
            "SELECT * FROM users WHERE",
            "SELECT * FROM users WHERE a AND",
            "SELECT * FROM users WHERE a OR",
            "SELECT * FROM users JOIN",
            "SELECT * FROM users JOIN orders",
            "SELECT * FROM users ORDER BY",
            "SELECT * FROM users GROUP BY",
            "SELECT a,, b FROM users",
        ] {
            assert!(parse(sql, DialectType::Pgsql).is_err(), "{}", sql);
        }
    }

    #[test]
    fn test_missing_select_keyword() {
        let err = parse_err("* FROM users", DialectType::MySql);
        assert!(err.to_string().contains("Unrecognized statement"));
    }

    #[test]
    fn test_case_without_when() {
        let err = parse_err("SELECT CASE ELSE 1 END", DialectType::MySql);
        assert!(err.to_string().contains("WHEN"));
    }

    #[test]
    fn test_trailing_tokens() {
        let err = parse_err("SELECT a FROM t extra junk", DialectType::MySql);
        match err {
            Error::Syntax { line, column, .. } => {
                assert_eq!(line, 1);
                assert_eq!(column, 23);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_second_statement_rejected() {
        assert!(parse("SELECT 1; SELECT 2", DialectType::Sqlite).is_err());
    }

    #[test]
    fn test_fetch_requires_only() {
        assert!(parse(
            "SELECT * FROM t ORDER BY a OFFSET 1 ROWS FETCH NEXT 2 ROWS",
            DialectType::SqlServer
        )
        .is_err());
    }

    #[test]
    fn test_collate_on_literal() {
        let err = parse_err("SELECT 'a' COLLATE Latin1_General_CI_AS", DialectType::SqlServer);
        assert!(matches!(err, Error::Unsupported { .. }));
    }
}

// ============================================================================
// Unsupported and Shape Errors
// ============================================================================

mod shape_errors {
    use super::*;

    #[test]
    fn test_collate_on_expression_names_dialect() {
        let err = parse_err("SELECT 'a' COLLATE \"C\" FROM t", DialectType::Pgsql);
        match err {
            Error::Unsupported { feature, dialect } => {
                assert!(feature.starts_with("COLLATE on"));
                assert_eq!(dialect, "postgresql");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_deep_parenthesis_nesting_is_rejected() {
        let sql = format!("SELECT {}1{}", "(".repeat(10_000), ")".repeat(10_000));
        let result = parse(&sql, DialectType::MySql);
        assert!(result.is_err());
        match result.unwrap_err() {
            Error::Parse(message) => {
                assert!(message.contains("nesting exceeded the maximum of"), "{}", message)
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_deep_nesting_of_each_recursive_construct() {
        let n = 5_000;
        let cases = [
            format!("SELECT * FROM t WHERE {}a = 1", "NOT ".repeat(n)),
            format!("SELECT {}a", "- ".repeat(n)),
            format!("SELECT * FROM {}t{}", "(".repeat(n), ")".repeat(n)),
            format!("SELECT {}1{}", "(SELECT ".repeat(n), ")".repeat(n)),
            format!("SELECT {}1{}", "ABS(".repeat(n), ")".repeat(n)),
            format!("SELECT {}1{}", "CASE WHEN a THEN ".repeat(n), " END".repeat(n)),
        ];
        for sql in &cases {
            assert!(parse(sql, DialectType::Pgsql).is_err(), "{}", &sql[..40]);
        }
    }

    #[test]
    fn test_nesting_limit_is_configurable() {
        let sql = format!("SELECT {}1{}", "(".repeat(20), ")".repeat(20));
        assert!(parse(&sql, DialectType::MySql).is_ok());

        let tokens = Dialect::get(DialectType::MySql).normalize(&sql).unwrap().tokens;
        let config = ParserConfig {
            max_depth: 5,
            ..ParserConfig::default()
        };
        let err = Parser::new(tokens, config).parse_statement().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parse error: expression nesting exceeded the maximum of 5 levels"
        );
    }

    #[test]
    fn test_empty_input() {
        let err = parse_err("", DialectType::MySql);
        assert!(matches!(err, Error::Parse(_)));
        let err = parse_err("   -- just a comment", DialectType::MySql);
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_unknown_dialect_name() {
        let err = parse_by_name("SELECT 1", "db2").unwrap_err();
        assert!(err.to_string().contains("Unknown dialect: db2"));
        assert!(parse_by_name("SELECT 1", "mssql").is_ok());
    }

    #[test]
    fn test_iteration_cap_names_construct() {
        let sql = format!(
            "SELECT a FROM t GROUP BY {}",
            (0..50).map(|i| format!("c{}", i)).collect::<Vec<_>>().join(", ")
        );
        let tokens = Dialect::get(DialectType::MySql).normalize(&sql).unwrap().tokens;
        let config = ParserConfig {
            max_iterations: 10,
            ..ParserConfig::default()
        };
        let err = Parser::new(tokens, config).parse_statement().unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
        assert!(err.to_string().contains("GROUP BY"));
    }

    #[test]
    fn test_default_cap_allows_long_lists() {
        let sql = format!(
            "SELECT a FROM t WHERE a IN ({})",
            (0..2000).map(|i| i.to_string()).collect::<Vec<_>>().join(", ")
        );
        assert!(parse(&sql, DialectType::Oracle).is_ok());
    }
}
