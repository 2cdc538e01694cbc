//! SQLite Dialect
//!
//! Shares MySQL's backtick escaping and LIMIT grammar.

use super::{DialectImpl, DialectType, LimitStyle};

/// SQLite dialect
pub struct SQLiteDialect;

impl DialectImpl for SQLiteDialect {
    fn dialect_type(&self) -> DialectType {
        DialectType::Sqlite
    }

    fn escape_delimiters(&self) -> (char, char) {
        ('`', '`')
    }

    fn limit_style(&self) -> Option<LimitStyle> {
        Some(LimitStyle::LimitOffset)
    }
}
