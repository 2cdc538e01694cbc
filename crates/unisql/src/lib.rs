//! unisql - dialect-driven SQL front end
//!
//! Turns SQL text written for MySQL, SQL Server, Oracle, PostgreSQL or SQLite
//! into one dialect-neutral abstract syntax tree.
//!
//! # Architecture
//!
//! The library follows a pipeline architecture:
//! 1. **Tokenizer** - Converts SQL string to token stream, using the dialect's keyword table
//! 2. **Normalizer** - Lifts comments out and fuses escaped identifiers (`[a b]`, `` `a` ``, `"a"`)
//! 3. **Parser** - Builds the AST by recursive descent
//!
//! Consumers walk the tree through [`traversal::ExpressionWalk`] or implement
//! [`visitor::Visitor`]. Rendering SQL back out is left to such visitors.
//!
//! ```rust,ignore
//! use unisql::{parse, DialectType};
//!
//! let parsed = parse("SELECT TOP 10 * FROM [Order Details]", DialectType::SqlServer)?;
//! assert!(parsed.statement.is_statement());
//! ```

pub mod dialects;
pub mod error;
pub mod expressions;
pub mod keywords;
pub mod normalizer;
pub mod parser;
pub mod tokens;
pub mod traversal;
pub mod visitor;

pub use dialects::{Dialect, DialectImpl, DialectType, LimitStyle, ParsedSql};
pub use error::{Error, Result};
pub use expressions::{DialectTag, Expression, NodeKind};
pub use keywords::{keyword_table, KeywordTable};
pub use normalizer::Normalized;
pub use parser::{Parser, ParserConfig};
pub use tokens::{Span, Token, TokenKind, TokenType, Tokenizer, TokenizerConfig};
pub use traversal::{
    find_ancestor, find_parent, get_columns, get_tables, is_column, is_function, is_literal,
    is_subquery, is_table, is_window_function, BfsIter, DfsIter, ExpressionWalk, NodeId,
    ParentInfo, TreeContext,
};
pub use visitor::{Node, Visitor};

/// Parse one SQL statement into an AST.
///
/// # Arguments
/// * `sql` - The SQL string to parse
/// * `dialect` - The dialect to use for parsing
///
/// # Returns
/// The root statement together with the comments found in the source
pub fn parse(sql: &str, dialect: DialectType) -> Result<ParsedSql> {
    Dialect::get(dialect).parse(sql)
}

/// Parse SQL using a string dialect name (`"mysql"`, `"tsql"`, `"postgres"`, ...).
pub fn parse_by_name(sql: &str, dialect: &str) -> Result<ParsedSql> {
    let d = Dialect::get_by_name(dialect)
        .ok_or_else(|| Error::parse(format!("Unknown dialect: {}", dialect)))?;
    d.parse(sql)
}

/// Tokenize SQL with the dialect's keyword table.
///
/// Returns the raw stream: comments are still present and escape delimiters
/// are separate tokens. Use [`Dialect::normalize`] for the parser-ready form.
pub fn tokenize(sql: &str, dialect: DialectType) -> Result<Vec<Token>> {
    Dialect::get(dialect).tokenize(sql)
}
