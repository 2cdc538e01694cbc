//! Error types for unisql

use thiserror::Error;

/// The result type for unisql operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while scanning or parsing SQL.
///
/// Every variant is fatal: a parse that returns an error has produced no tree.
#[derive(Debug, Error)]
pub enum Error {
    /// Error during tokenization (unsupported character, malformed literal, ...)
    #[error("Tokenization error at line {line}, column {column}: {message}")]
    Tokenize {
        message: String,
        line: usize,
        column: usize,
    },

    /// A mandatory token was missing or an unexpected token was found
    #[error("Syntax error at line {line}, column {column}: {message}")]
    Syntax {
        message: String,
        line: usize,
        column: usize,
    },

    /// Statement-level error without a meaningful source position
    #[error("Parse error: {0}")]
    Parse(String),

    /// A construct the grammar recognises but the AST does not model
    #[error("Unsupported: {feature} is not supported in {dialect}")]
    Unsupported { feature: String, dialect: String },

    /// Internal error (should not happen in normal usage)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a tokenization error
    pub fn tokenize(message: impl Into<String>, line: usize, column: usize) -> Self {
        Error::Tokenize {
            message: message.into(),
            line,
            column,
        }
    }

    /// Create a syntax error
    pub fn syntax(message: impl Into<String>, line: usize, column: usize) -> Self {
        Error::Syntax {
            message: message.into(),
            line,
            column,
        }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Error::Parse(message.into())
    }

    /// Create an unsupported feature error
    pub fn unsupported(feature: impl Into<String>, dialect: impl Into<String>) -> Self {
        Error::Unsupported {
            feature: feature.into(),
            dialect: dialect.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Error::Internal(message.into())
    }

    /// Whether this error came from the lexer rather than the parser
    pub fn is_lexical(&self) -> bool {
        matches!(self, Error::Tokenize { .. })
    }
}
