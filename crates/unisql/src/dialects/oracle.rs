//! Oracle Dialect
//!
//! Oracle-specific grammar:
//! - Double quotes for identifiers
//! - `[OFFSET n ROWS] FETCH FIRST m ROWS ONLY`
//! - `CONNECT BY` hierarchical queries, `MINUS`, `UNIQUE`
//! - `table@dblink` remote references
//! - `/*+ ... */` optimizer hints

use super::{DialectImpl, DialectType, LimitStyle};
use crate::tokens::TokenizerConfig;

/// Oracle dialect
pub struct OracleDialect;

impl DialectImpl for OracleDialect {
    fn dialect_type(&self) -> DialectType {
        DialectType::Oracle
    }

    fn escape_delimiters(&self) -> (char, char) {
        ('"', '"')
    }

    fn limit_style(&self) -> Option<LimitStyle> {
        Some(LimitStyle::FetchFirst)
    }

    fn tokenizer_config(&self) -> TokenizerConfig {
        let mut config = TokenizerConfig::new(
            crate::keywords::keyword_table(self.dialect_type()),
            self.escape_delimiters(),
        );
        config.hint_comments = true;
        config
    }
}
