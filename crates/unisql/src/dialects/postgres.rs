//! PostgreSQL Dialect
//!
//! - Double quotes for identifiers
//! - `LIMIT` and `OFFSET` in either order
//! - `ARRAY[...]`, subscripts and slices
//! - `ILIKE` and the `~`, `~*`, `!~`, `!~*` regex operators

use super::{DialectImpl, DialectType, LimitStyle};

/// PostgreSQL dialect
pub struct PostgresDialect;

impl DialectImpl for PostgresDialect {
    fn dialect_type(&self) -> DialectType {
        DialectType::Pgsql
    }

    fn escape_delimiters(&self) -> (char, char) {
        ('"', '"')
    }

    fn limit_style(&self) -> Option<LimitStyle> {
        Some(LimitStyle::PostgresLimit)
    }
}
