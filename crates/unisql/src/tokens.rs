//! Token types and tokenization for SQL parsing
//!
//! This module defines the SQL token types and the tokenizer that converts
//! SQL strings into token streams. Keyword recognition is dialect specific and
//! driven by the [`KeywordTable`] carried in the [`TokenizerConfig`].

use crate::error::{Error, Result};
use crate::keywords::KeywordTable;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Default hard cap on tokenizer loop iterations
pub const DEFAULT_MAX_SCAN_STEPS: usize = 100_000;

/// Represents a position in the source SQL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    /// Starting character offset
    pub start: usize,
    /// Ending character offset (exclusive)
    pub end: usize,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize, column: usize) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }
}

/// A token in the SQL token stream.
///
/// Two tokens are equal when their [`TokenType`] matches, regardless of the
/// literal text they carry. Callers that care about the payload compare
/// [`Token::text`] explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    /// The type of token
    pub token_type: TokenType,
    /// Literal payload: identifier/keyword spelling, unescaped string content,
    /// number text, or comment body
    pub text: String,
    /// Position information
    pub span: Span,
    /// Set by the normalizer on tokens that are dropped from the stream
    #[serde(skip)]
    pub marked_for_removal: bool,
}

impl Token {
    /// Create a new token
    pub fn new(token_type: TokenType, text: impl Into<String>, span: Span) -> Self {
        Self {
            token_type,
            text: text.into(),
            span,
            marked_for_removal: false,
        }
    }

    /// Create a NUMBER token
    pub fn number(n: i64) -> Self {
        Self::new(TokenType::Number, n.to_string(), Span::default())
    }

    /// Create a STRING token
    pub fn string(s: impl Into<String>) -> Self {
        Self::new(TokenType::String, s, Span::default())
    }

    /// Create an IDENTIFIER token
    pub fn identifier(s: impl Into<String>) -> Self {
        Self::new(TokenType::Identifier, s, Span::default())
    }

    /// Small integer discriminant used for O(1) token comparison
    pub fn discriminant(&self) -> u16 {
        self.token_type as u16
    }

    /// Lexical category of this token
    pub fn kind(&self) -> TokenKind {
        self.token_type.kind()
    }

    /// Whether this token is a line or block comment
    pub fn is_comment(&self) -> bool {
        matches!(
            self.token_type,
            TokenType::LineComment | TokenType::BlockComment
        )
    }

    /// Whether this token is an identifier or a keyword (a "word")
    pub fn is_word(&self) -> bool {
        self.token_type == TokenType::Identifier || self.token_type.is_keyword()
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.token_type == other.token_type
    }
}

impl Eq for Token {}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self.token_type, self.text)
    }
}

/// Coarse lexical category of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Keyword,
    Symbol,
    Operator,
    Constant,
    Hints,
    Unclassified,
}

/// All token types produced by the tokenizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u16)]
pub enum TokenType {
    // Punctuation
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Dot,
    Semicolon,
    Colon,
    At,
    DoubleQuote,
    Backtick,
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,

    // Operators
    Plus,
    Dash,
    Star,
    Slash,
    Percent,
    DPipe,
    Amp,
    Pipe,
    Caret,
    Tilde,
    TildeStar,
    NotTilde,
    NotTildeStar,

    // Literals
    Number,
    String,
    NationalString,

    // Optimizer hints: /*+ ... */
    Hint,

    // Names and comments
    Identifier,
    QuotedIdentifier,
    LineComment,
    BlockComment,

    // Keywords
    Select,
    From,
    Where,
    And,
    Or,
    Xor,
    Not,
    As,
    On,
    Join,
    Inner,
    Left,
    Right,
    Full,
    Outer,
    Cross,
    Union,
    Intersect,
    Except,
    Minus,
    All,
    Distinct,
    Unique,
    Group,
    By,
    Having,
    Order,
    Asc,
    Desc,
    In,
    Is,
    Null,
    Like,
    ILike,
    Regexp,
    Between,
    Exists,
    Any,
    Case,
    When,
    Then,
    Else,
    End,
    Insert,
    Into,
    Values,
    Update,
    Set,
    Delete,
    With,
    Over,
    Partition,
    True,
    False,
    Collate,
    Limit,
    Offset,
    Rows,
    Fetch,
    Only,
    Next,
    First,
    Top,
    Dual,
    Pivot,
    Connect,
    Start,
    Prior,
    NoCycle,
    Siblings,
    Interval,
    Array,
}

impl TokenType {
    /// Check if this token type is a keyword
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenType::Select
                | TokenType::From
                | TokenType::Where
                | TokenType::And
                | TokenType::Or
                | TokenType::Xor
                | TokenType::Not
                | TokenType::As
                | TokenType::On
                | TokenType::Join
                | TokenType::Inner
                | TokenType::Left
                | TokenType::Right
                | TokenType::Full
                | TokenType::Outer
                | TokenType::Cross
                | TokenType::Union
                | TokenType::Intersect
                | TokenType::Except
                | TokenType::Minus
                | TokenType::All
                | TokenType::Distinct
                | TokenType::Unique
                | TokenType::Group
                | TokenType::By
                | TokenType::Having
                | TokenType::Order
                | TokenType::Asc
                | TokenType::Desc
                | TokenType::In
                | TokenType::Is
                | TokenType::Null
                | TokenType::Like
                | TokenType::ILike
                | TokenType::Regexp
                | TokenType::Between
                | TokenType::Exists
                | TokenType::Any
                | TokenType::Case
                | TokenType::When
                | TokenType::Then
                | TokenType::Else
                | TokenType::End
                | TokenType::Insert
                | TokenType::Into
                | TokenType::Values
                | TokenType::Update
                | TokenType::Set
                | TokenType::Delete
                | TokenType::With
                | TokenType::Over
                | TokenType::Partition
                | TokenType::True
                | TokenType::False
                | TokenType::Collate
                | TokenType::Limit
                | TokenType::Offset
                | TokenType::Rows
                | TokenType::Fetch
                | TokenType::Only
                | TokenType::Next
                | TokenType::First
                | TokenType::Top
                | TokenType::Dual
                | TokenType::Pivot
                | TokenType::Connect
                | TokenType::Start
                | TokenType::Prior
                | TokenType::NoCycle
                | TokenType::Siblings
                | TokenType::Interval
                | TokenType::Array
        )
    }

    /// Check if this token type is a comparison operator
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            TokenType::Eq
                | TokenType::Neq
                | TokenType::Lt
                | TokenType::Lte
                | TokenType::Gt
                | TokenType::Gte
        )
    }

    /// Check if this token type is an arithmetic operator
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            TokenType::Plus | TokenType::Dash | TokenType::Star | TokenType::Slash | TokenType::Percent
        )
    }

    /// Lexical category of this token type
    pub fn kind(&self) -> TokenKind {
        if self.is_keyword() {
            return TokenKind::Keyword;
        }
        match self {
            TokenType::Plus
            | TokenType::Dash
            | TokenType::Star
            | TokenType::Slash
            | TokenType::Percent
            | TokenType::DPipe
            | TokenType::Amp
            | TokenType::Pipe
            | TokenType::Caret
            | TokenType::Tilde
            | TokenType::TildeStar
            | TokenType::NotTilde
            | TokenType::NotTildeStar => TokenKind::Operator,
            TokenType::Number | TokenType::String | TokenType::NationalString => {
                TokenKind::Constant
            }
            TokenType::Hint => TokenKind::Hints,
            TokenType::Identifier
            | TokenType::QuotedIdentifier
            | TokenType::LineComment
            | TokenType::BlockComment => TokenKind::Unclassified,
            _ => TokenKind::Symbol,
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Replace `\r\n` with `\n` so spans and line numbers agree across platforms
pub fn normalize_newlines(sql: &str) -> Cow<'_, str> {
    if sql.contains("\r\n") {
        Cow::Owned(sql.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(sql)
    }
}

/// Tokenizer configuration for a dialect
#[derive(Debug, Clone)]
pub struct TokenizerConfig {
    /// Shared keyword table for the dialect
    pub keywords: &'static KeywordTable,
    /// Identifier escape delimiters (left, right), e.g. ('[', ']')
    pub escape: (char, char),
    /// Whether `/*+ ... */` is an optimizer hint rather than a comment
    pub hint_comments: bool,
    /// Whether `N'...'` is a national string literal
    pub national_strings: bool,
    /// Hard cap on scan iterations; exceeding it is a fatal error
    pub max_scan_steps: usize,
}

impl TokenizerConfig {
    pub fn new(keywords: &'static KeywordTable, escape: (char, char)) -> Self {
        Self {
            keywords,
            escape,
            hint_comments: false,
            national_strings: false,
            max_scan_steps: DEFAULT_MAX_SCAN_STEPS,
        }
    }
}

/// SQL Tokenizer
pub struct Tokenizer {
    config: TokenizerConfig,
}

impl Tokenizer {
    /// Create a new tokenizer with the given configuration
    pub fn new(config: TokenizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    /// Tokenize a SQL string.
    ///
    /// Comments are emitted as `LineComment`/`BlockComment` tokens; removing
    /// them is the normalizer's job.
    pub fn tokenize(&self, sql: &str) -> Result<Vec<Token>> {
        let sql = normalize_newlines(sql);
        let mut state = TokenizerState::new(&sql, &self.config);
        state.tokenize()
    }
}

/// Internal state for tokenization
struct TokenizerState<'a> {
    chars: Vec<char>,
    size: usize,
    tokens: Vec<Token>,
    start: usize,
    start_line: usize,
    start_column: usize,
    current: usize,
    line: usize,
    column: usize,
    config: &'a TokenizerConfig,
}

impl<'a> TokenizerState<'a> {
    fn new(sql: &str, config: &'a TokenizerConfig) -> Self {
        let chars: Vec<char> = sql.chars().collect();
        let size = chars.len();
        Self {
            chars,
            size,
            tokens: Vec::new(),
            start: 0,
            start_line: 1,
            start_column: 1,
            current: 0,
            line: 1,
            column: 1,
            config,
        }
    }

    fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut steps = 0usize;
        while !self.is_at_end() {
            steps += 1;
            if steps > self.config.max_scan_steps {
                return Err(Error::tokenize(
                    format!(
                        "Exceeded the maximum of {} scan steps",
                        self.config.max_scan_steps
                    ),
                    self.line,
                    self.column,
                ));
            }

            self.start = self.current;
            self.start_line = self.line;
            self.start_column = self.column;
            self.scan_token()?;
        }

        Ok(std::mem::take(&mut self.tokens))
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.size
    }

    fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.chars[self.current]
        }
    }

    fn peek_next(&self) -> char {
        if self.current + 1 >= self.size {
            '\0'
        } else {
            self.chars[self.current + 1]
        }
    }

    fn advance(&mut self) -> char {
        let c = self.peek();
        self.current += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        c
    }

    fn scan_token(&mut self) -> Result<()> {
        let c = self.peek();

        if c == '/' && self.peek_next() == '*' {
            return self.scan_block_comment();
        }
        if c == '-' && self.peek_next() == '-' {
            self.scan_line_comment();
            return Ok(());
        }
        if matches!(c, ' ' | '\t' | '\n' | '\r') {
            self.advance();
            return Ok(());
        }
        if c.is_alphabetic() || c == '_' {
            return self.scan_identifier_or_keyword();
        }
        if c.is_ascii_digit() {
            return self.scan_number();
        }

        let operator = match c {
            '+' => Some(TokenType::Plus),
            '-' => Some(TokenType::Dash),
            '*' => Some(TokenType::Star),
            '/' => Some(TokenType::Slash),
            _ => None,
        };
        if let Some(token_type) = operator {
            self.advance();
            self.add_token(token_type);
            return Ok(());
        }

        self.scan_symbol()
    }

    fn scan_line_comment(&mut self) {
        self.advance(); // -
        self.advance(); // -
        let content_start = self.current;
        while !self.is_at_end() && self.peek() != '\n' {
            self.advance();
        }
        let comment: String = self.chars[content_start..self.current].iter().collect();
        self.add_token_with_text(TokenType::LineComment, comment.trim().to_string());
    }

    fn scan_block_comment(&mut self) -> Result<()> {
        self.advance(); // /
        self.advance(); // *
        let is_hint = self.config.hint_comments && self.peek() == '+';
        if is_hint {
            self.advance();
        }
        let content_start = self.current;

        loop {
            if self.is_at_end() {
                return Err(Error::tokenize(
                    "Unterminated block comment",
                    self.start_line,
                    self.start_column,
                ));
            }
            if self.peek() == '*' && self.peek_next() == '/' {
                break;
            }
            self.advance();
        }

        let content: String = self.chars[content_start..self.current].iter().collect();
        self.advance(); // *
        self.advance(); // /

        let token_type = if is_hint {
            TokenType::Hint
        } else {
            TokenType::BlockComment
        };
        self.add_token_with_text(token_type, content.trim().to_string());
        Ok(())
    }

    fn scan_identifier_or_keyword(&mut self) -> Result<()> {
        while !self.is_at_end() {
            let c = self.peek();
            if c.is_alphanumeric() || c == '_' || c == '$' || c == '#' {
                self.advance();
            } else {
                break;
            }
        }

        let text: String = self.chars[self.start..self.current].iter().collect();

        // SQL Server national strings: N'...'
        if self.config.national_strings && text.eq_ignore_ascii_case("N") && self.peek() == '\'' {
            let value = self.scan_string_content()?;
            self.add_token_with_text(TokenType::NationalString, value);
            return Ok(());
        }

        match self.config.keywords.lookup(&text) {
            Some(keyword) => self.add_token_with_text(keyword, text),
            None => self.add_token_with_text(TokenType::Identifier, text),
        }
        Ok(())
    }

    fn scan_number(&mut self) -> Result<()> {
        let mut seen_dot = false;
        while !self.is_at_end() {
            let c = self.peek();
            if c.is_ascii_digit() {
                self.advance();
            } else if c == '.' {
                if seen_dot {
                    return Err(Error::tokenize(
                        "Numeric literal has more than one decimal point",
                        self.line,
                        self.column,
                    ));
                }
                seen_dot = true;
                self.advance();
            } else {
                break;
            }
        }
        self.add_token(TokenType::Number);
        Ok(())
    }

    fn scan_symbol(&mut self) -> Result<()> {
        let c = self.advance();
        let token_type = match c {
            '(' => TokenType::LParen,
            ')' => TokenType::RParen,
            '[' => TokenType::LBracket,
            ']' => TokenType::RBracket,
            '{' => TokenType::LBrace,
            '}' => TokenType::RBrace,
            ',' => TokenType::Comma,
            '.' => TokenType::Dot,
            ';' => TokenType::Semicolon,
            ':' => TokenType::Colon,
            '@' => TokenType::At,
            '"' => TokenType::DoubleQuote,
            '`' => TokenType::Backtick,
            '=' => TokenType::Eq,
            '%' => TokenType::Percent,
            '&' => TokenType::Amp,
            '^' => TokenType::Caret,
            '\'' => {
                // The opening quote was consumed; rewind so scan_string_content sees it.
                self.current -= 1;
                self.column -= 1;
                let value = self.scan_string_content()?;
                self.add_token_with_text(TokenType::String, value);
                return Ok(());
            }
            '<' => match self.peek() {
                '=' => {
                    self.advance();
                    TokenType::Lte
                }
                '>' => {
                    self.advance();
                    TokenType::Neq
                }
                _ => TokenType::Lt,
            },
            '>' => {
                if self.peek() == '=' {
                    self.advance();
                    TokenType::Gte
                } else {
                    TokenType::Gt
                }
            }
            '|' => {
                if self.peek() == '|' {
                    self.advance();
                    TokenType::DPipe
                } else {
                    TokenType::Pipe
                }
            }
            '~' => {
                if self.peek() == '*' {
                    self.advance();
                    TokenType::TildeStar
                } else {
                    TokenType::Tilde
                }
            }
            '!' => match self.peek() {
                '=' => {
                    self.advance();
                    TokenType::Neq
                }
                '~' => {
                    self.advance();
                    if self.peek() == '*' {
                        self.advance();
                        TokenType::NotTildeStar
                    } else {
                        TokenType::NotTilde
                    }
                }
                _ => {
                    return Err(Error::tokenize(
                        "Unexpected character: '!'",
                        self.start_line,
                        self.start_column,
                    ))
                }
            },
            other => {
                return Err(Error::tokenize(
                    format!("Unexpected character: '{}'", other),
                    self.start_line,
                    self.start_column,
                ))
            }
        };
        self.add_token(token_type);
        Ok(())
    }

    /// Scan a single-quoted string starting at the opening quote.
    /// `''` inside the string is an escaped single quote.
    fn scan_string_content(&mut self) -> Result<String> {
        self.advance(); // Opening quote
        let mut value = String::new();

        loop {
            if self.is_at_end() {
                return Err(Error::tokenize(
                    "Unterminated string",
                    self.start_line,
                    self.start_column,
                ));
            }
            let c = self.peek();
            if c == '\'' {
                if self.peek_next() == '\'' {
                    value.push('\'');
                    self.advance();
                    self.advance();
                } else {
                    break;
                }
            } else {
                value.push(self.advance());
            }
        }

        self.advance(); // Closing quote
        Ok(value)
    }

    fn add_token(&mut self, token_type: TokenType) {
        let text: String = self.chars[self.start..self.current].iter().collect();
        self.add_token_with_text(token_type, text);
    }

    fn add_token_with_text(&mut self, token_type: TokenType, text: String) {
        let span = Span::new(self.start, self.current, self.start_line, self.start_column);
        self.tokens.push(Token::new(token_type, text, span));
    }
}
