//! Per-dialect keyword tables.
//!
//! Each dialect maps keyword spellings (case-insensitively) to a [`TokenType`].
//! A table is built at most once per dialect and then shared, read-only, by
//! every tokenizer of that dialect for the life of the process.

use crate::dialects::DialectType;
use crate::tokens::TokenType;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Keywords recognised by every dialect
const COMMON_KEYWORDS: &[(&str, TokenType)] = &[
    ("SELECT", TokenType::Select),
    ("FROM", TokenType::From),
    ("WHERE", TokenType::Where),
    ("AND", TokenType::And),
    ("OR", TokenType::Or),
    ("XOR", TokenType::Xor),
    ("NOT", TokenType::Not),
    ("AS", TokenType::As),
    ("ON", TokenType::On),
    ("JOIN", TokenType::Join),
    ("INNER", TokenType::Inner),
    ("LEFT", TokenType::Left),
    ("RIGHT", TokenType::Right),
    ("FULL", TokenType::Full),
    ("OUTER", TokenType::Outer),
    ("CROSS", TokenType::Cross),
    ("UNION", TokenType::Union),
    ("INTERSECT", TokenType::Intersect),
    ("EXCEPT", TokenType::Except),
    ("ALL", TokenType::All),
    ("DISTINCT", TokenType::Distinct),
    ("GROUP", TokenType::Group),
    ("BY", TokenType::By),
    ("HAVING", TokenType::Having),
    ("ORDER", TokenType::Order),
    ("ASC", TokenType::Asc),
    ("DESC", TokenType::Desc),
    ("IN", TokenType::In),
    ("IS", TokenType::Is),
    ("NULL", TokenType::Null),
    ("LIKE", TokenType::Like),
    ("BETWEEN", TokenType::Between),
    ("EXISTS", TokenType::Exists),
    ("ANY", TokenType::Any),
    ("CASE", TokenType::Case),
    ("WHEN", TokenType::When),
    ("THEN", TokenType::Then),
    ("ELSE", TokenType::Else),
    ("END", TokenType::End),
    ("INSERT", TokenType::Insert),
    ("INTO", TokenType::Into),
    ("VALUES", TokenType::Values),
    ("UPDATE", TokenType::Update),
    ("SET", TokenType::Set),
    ("DELETE", TokenType::Delete),
    ("WITH", TokenType::With),
    ("OVER", TokenType::Over),
    ("PARTITION", TokenType::Partition),
    ("TRUE", TokenType::True),
    ("FALSE", TokenType::False),
    ("COLLATE", TokenType::Collate),
];

const MYSQL_KEYWORDS: &[(&str, TokenType)] = &[
    ("LIMIT", TokenType::Limit),
    ("INTERVAL", TokenType::Interval),
    ("REGEXP", TokenType::Regexp),
    ("RLIKE", TokenType::Regexp),
];

const SQLSERVER_KEYWORDS: &[(&str, TokenType)] = &[
    ("OFFSET", TokenType::Offset),
    ("ROWS", TokenType::Rows),
    ("FETCH", TokenType::Fetch),
    ("ONLY", TokenType::Only),
    ("NEXT", TokenType::Next),
    ("TOP", TokenType::Top),
    ("PIVOT", TokenType::Pivot),
];

const ORACLE_KEYWORDS: &[(&str, TokenType)] = &[
    ("ROWS", TokenType::Rows),
    ("FETCH", TokenType::Fetch),
    ("ONLY", TokenType::Only),
    ("UNIQUE", TokenType::Unique),
    ("FIRST", TokenType::First),
    ("DUAL", TokenType::Dual),
    ("MINUS", TokenType::Minus),
    ("CONNECT", TokenType::Connect),
    ("START", TokenType::Start),
    ("PRIOR", TokenType::Prior),
    ("NOCYCLE", TokenType::NoCycle),
    ("SIBLINGS", TokenType::Siblings),
    ("PIVOT", TokenType::Pivot),
    ("INTERVAL", TokenType::Interval),
];

const PGSQL_KEYWORDS: &[(&str, TokenType)] = &[
    ("LIMIT", TokenType::Limit),
    ("OFFSET", TokenType::Offset),
    ("INTERVAL", TokenType::Interval),
    ("ARRAY", TokenType::Array),
    ("ILIKE", TokenType::ILike),
];

const SQLITE_KEYWORDS: &[(&str, TokenType)] = &[("LIMIT", TokenType::Limit)];

/// Case-insensitive keyword lookup for one dialect
#[derive(Debug)]
pub struct KeywordTable {
    dialect: DialectType,
    keywords: HashMap<String, TokenType>,
}

impl KeywordTable {
    fn build(dialect: DialectType) -> Self {
        let extra = match dialect {
            DialectType::MySql => MYSQL_KEYWORDS,
            DialectType::SqlServer => SQLSERVER_KEYWORDS,
            DialectType::Oracle => ORACLE_KEYWORDS,
            DialectType::Pgsql => PGSQL_KEYWORDS,
            DialectType::Sqlite => SQLITE_KEYWORDS,
        };

        let keywords = COMMON_KEYWORDS
            .iter()
            .chain(extra.iter())
            .map(|(word, token_type)| (word.to_string(), *token_type))
            .collect();

        Self { dialect, keywords }
    }

    /// Look up a word, ignoring case. Returns `None` for plain identifiers.
    pub fn lookup(&self, word: &str) -> Option<TokenType> {
        self.keywords.get(&word.to_ascii_uppercase()).copied()
    }

    /// Whether `word` is a keyword in this dialect
    pub fn contains(&self, word: &str) -> bool {
        self.lookup(word).is_some()
    }

    /// The dialect this table was built for
    pub fn dialect(&self) -> DialectType {
        self.dialect
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

static KEYWORD_TABLES: [OnceLock<KeywordTable>; 5] = [
    OnceLock::new(),
    OnceLock::new(),
    OnceLock::new(),
    OnceLock::new(),
    OnceLock::new(),
];

/// Get the shared keyword table for a dialect, building it on first use.
///
/// Concurrent first calls for the same dialect build the table exactly once;
/// every caller observes the same immutable instance.
pub fn keyword_table(dialect: DialectType) -> &'static KeywordTable {
    KEYWORD_TABLES[dialect.index()].get_or_init(|| {
        let table = KeywordTable::build(dialect);
        tracing::debug!(dialect = %dialect, keywords = table.len(), "built keyword table");
        table
    })
}
