//! MySQL Dialect
//!
//! - Backticks for identifiers
//! - `LIMIT n[, m]` / `LIMIT m OFFSET n`
//! - `/*+ ... */` optimizer hints
//! - `REGEXP` / `RLIKE` and `INTERVAL expr unit`

use super::{DialectImpl, DialectType, LimitStyle};
use crate::tokens::TokenizerConfig;

/// MySQL dialect
pub struct MySQLDialect;

impl DialectImpl for MySQLDialect {
    fn dialect_type(&self) -> DialectType {
        DialectType::MySql
    }

    fn escape_delimiters(&self) -> (char, char) {
        ('`', '`')
    }

    fn limit_style(&self) -> Option<LimitStyle> {
        Some(LimitStyle::LimitOffset)
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
