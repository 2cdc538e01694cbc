//! T-SQL (SQL Server) Dialect
//!
//! Key differences:
//! - Square brackets for identifiers
//! - `TOP n` and `OFFSET n ROWS FETCH NEXT m ROWS ONLY` instead of LIMIT
//! - `N'...'` national strings
//! - `WITH (NOLOCK)` table hints and `SELECT ... INTO`

use super::{DialectImpl, DialectType, LimitStyle};
use crate::tokens::TokenizerConfig;

/// T-SQL (SQL Server) dialect
pub struct TSQLDialect;

impl DialectImpl for TSQLDialect {
    fn dialect_type(&self) -> DialectType {
        DialectType::SqlServer
    }

    fn escape_delimiters(&self) -> (char, char) {
        ('[', ']')
    }

    fn limit_style(&self) -> Option<LimitStyle> {
        Some(LimitStyle::OffsetFetch)
    }

    fn tokenizer_config(&self) -> TokenizerConfig {
        let mut config = TokenizerConfig::new(
            crate::keywords::keyword_table(self.dialect_type()),
            self.escape_delimiters(),
        );
        config.national_strings = true;
        config
    }
}
