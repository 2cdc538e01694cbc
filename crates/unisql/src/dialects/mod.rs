//! SQL Dialect support
//!
//! Each supported dialect carries its own keyword set, identifier escape
//! delimiters and LIMIT/OFFSET/FETCH grammar. The parser itself is shared; the
//! dialect only parameterises it.

mod mysql;
mod oracle;
mod postgres;
mod sqlite;
mod tsql;

pub use mysql::MySQLDialect;
pub use oracle::OracleDialect;
pub use postgres::PostgresDialect;
pub use sqlite::SQLiteDialect;
pub use tsql::TSQLDialect;

use crate::error::{Error, Result};
use crate::expressions::Expression;
use crate::keywords::keyword_table;
use crate::normalizer::{self, Normalized};
use crate::parser::{Parser, ParserConfig};
use crate::tokens::{Token, Tokenizer, TokenizerConfig};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported SQL dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DialectType {
    MySql,
    SqlServer,
    Oracle,
    Pgsql,
    Sqlite,
}

impl DialectType {
    /// Every supported dialect, in declaration order
    pub const ALL: [DialectType; 5] = [
        DialectType::MySql,
        DialectType::SqlServer,
        DialectType::Oracle,
        DialectType::Pgsql,
        DialectType::Sqlite,
    ];

    /// Dense index, used to address per-dialect caches
    pub fn index(self) -> usize {
        match self {
            DialectType::MySql => 0,
            DialectType::SqlServer => 1,
            DialectType::Oracle => 2,
            DialectType::Pgsql => 3,
            DialectType::Sqlite => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DialectType::MySql => "mysql",
            DialectType::SqlServer => "sqlserver",
            DialectType::Oracle => "oracle",
            DialectType::Pgsql => "postgresql",
            DialectType::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for DialectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DialectType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mysql" => Ok(DialectType::MySql),
            "sqlserver" | "mssql" | "tsql" => Ok(DialectType::SqlServer),
            "oracle" => Ok(DialectType::Oracle),
            "postgresql" | "postgres" | "pgsql" => Ok(DialectType::Pgsql),
            "sqlite" => Ok(DialectType::Sqlite),
            _ => Err(Error::parse(format!("Unknown dialect: {}", s))),
        }
    }
}

/// Which LIMIT sub-grammar a dialect uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitStyle {
    /// `LIMIT n[, m]` or `LIMIT m OFFSET n` (MySQL, SQLite)
    LimitOffset,
    /// `OFFSET n ROWS FETCH NEXT m ROWS ONLY` (SQL Server)
    OffsetFetch,
    /// `[OFFSET n ROWS] FETCH FIRST m ROWS ONLY` (Oracle)
    FetchFirst,
    /// `LIMIT n [OFFSET m]` / `OFFSET m [LIMIT n]` (PostgreSQL)
    PostgresLimit,
}

/// Trait for dialect-specific behavior
pub trait DialectImpl: Send + Sync {
    /// Get the dialect type
    fn dialect_type(&self) -> DialectType;

    /// Paired identifier escape delimiters, e.g. `('[', ']')`
    fn escape_delimiters(&self) -> (char, char);

    /// LIMIT grammar for this dialect. `None` means the dialect has no limit
    /// clause and the parser leaves it absent.
    fn limit_style(&self) -> Option<LimitStyle>;

    /// Get the tokenizer configuration for this dialect
    fn tokenizer_config(&self) -> TokenizerConfig {
        TokenizerConfig::new(keyword_table(self.dialect_type()), self.escape_delimiters())
    }

    /// Get the parser configuration for this dialect
    fn parser_config(&self) -> ParserConfig {
        ParserConfig {
            dialect: Some(self.dialect_type()),
            limit_style: self.limit_style(),
            ..ParserConfig::default()
        }
    }
}

fn dialect_impl(dialect_type: DialectType) -> Box<dyn DialectImpl> {
    match dialect_type {
        DialectType::MySql => Box::new(MySQLDialect),
        DialectType::SqlServer => Box::new(TSQLDialect),
        DialectType::Oracle => Box::new(OracleDialect),
        DialectType::Pgsql => Box::new(PostgresDialect),
        DialectType::Sqlite => Box::new(SQLiteDialect),
    }
}

/// Result of parsing one SQL statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedSql {
    /// Root node: `Select`, `Insert`, `Update` or `Delete`
    pub statement: Expression,
    /// Comment texts extracted from the source, in source order
    pub comments: Vec<String>,
    /// Dialect the statement was parsed with
    pub dialect: DialectType,
}

/// Main entry point for dialect-specific SQL operations
pub struct Dialect {
    dialect_type: DialectType,
    tokenizer: Tokenizer,
    parser_config: ParserConfig,
    escape: (char, char),
}

impl Dialect {
    /// Get a dialect by type
    pub fn get(dialect_type: DialectType) -> Self {
        let imp = dialect_impl(dialect_type);
        Self {
            dialect_type,
            tokenizer: Tokenizer::new(imp.tokenizer_config()),
            parser_config: imp.parser_config(),
            escape: imp.escape_delimiters(),
        }
    }

    /// Get a dialect by name (`"mysql"`, `"tsql"`, `"postgres"`, ...)
    pub fn get_by_name(name: &str) -> Option<Self> {
        name.parse::<DialectType>().ok().map(Self::get)
    }

    pub fn dialect_type(&self) -> DialectType {
        self.dialect_type
    }

    pub fn escape_delimiters(&self) -> (char, char) {
        self.escape
    }

    /// Tokenize SQL into the raw token stream, comments included
    pub fn tokenize(&self, sql: &str) -> Result<Vec<Token>> {
        self.tokenizer.tokenize(sql)
    }

    /// Tokenize SQL and run the escape/comment normalizer over the result
    pub fn normalize(&self, sql: &str) -> Result<Normalized> {
        let tokens = self.tokenize(sql)?;
        normalizer::normalize(tokens, sql, self.escape)
    }

    /// Parse a single SQL statement
    pub fn parse(&self, sql: &str) -> Result<ParsedSql> {
        let Normalized { tokens, comments } = self.normalize(sql)?;
        let token_count = tokens.len();
        let statement = Parser::new(tokens, self.parser_config.clone()).parse_statement()?;

        tracing::debug!(
            dialect = %self.dialect_type,
            tokens = token_count,
            comments = comments.len(),
            "parsed statement"
        );

        Ok(ParsedSql {
            statement,
            comments,
            dialect: self.dialect_type,
        })
    }
}
