//! Escape/comment normalization
//!
//! A single linear pass between the tokenizer and the parser. Comment tokens
//! are moved to a side list, and every run of tokens wrapped in the dialect's
//! escape delimiters (`[Order Details]`, `` `select` ``, `"Name"`) is fused
//! into one [`TokenType::QuotedIdentifier`] that keeps its delimiters.

use crate::error::{Error, Result};
use crate::tokens::{normalize_newlines, Span, Token, TokenType};

/// Normalized token stream plus the comments lifted out of it
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    /// Tokens ready for the parser: no comments, escaped identifiers fused
    pub tokens: Vec<Token>,
    /// Comment texts in source order
    pub comments: Vec<String>,
}

/// Map an escape delimiter character to the token type the tokenizer emits for it
fn delimiter_token(c: char) -> Option<TokenType> {
    match c {
        '[' => Some(TokenType::LBracket),
        ']' => Some(TokenType::RBracket),
        '`' => Some(TokenType::Backtick),
        '"' => Some(TokenType::DoubleQuote),
        _ => None,
    }
}

/// Normalize a raw token stream.
///
/// `source` must be the text the tokens were scanned from; the body of an
/// escaped identifier is taken from it verbatim so that inner whitespace
/// survives (`[first name]`). An opening delimiter without a matching close
/// is a tokenization error.
pub fn normalize(mut tokens: Vec<Token>, source: &str, escape: (char, char)) -> Result<Normalized> {
    let (left, right) = escape;
    let left_type = delimiter_token(left)
        .ok_or_else(|| Error::internal(format!("Unsupported escape delimiter: {}", left)))?;
    let right_type = delimiter_token(right)
        .ok_or_else(|| Error::internal(format!("Unsupported escape delimiter: {}", right)))?;

    let source = normalize_newlines(source);
    let chars: Vec<char> = source.chars().collect();
    let mut comments = Vec::new();

    let mut i = 0;
    while i < tokens.len() {
        if tokens[i].is_comment() {
            tokens[i].marked_for_removal = true;
            comments.push(tokens[i].text.clone());
            i += 1;
            continue;
        }

        if tokens[i].token_type != left_type {
            i += 1;
            continue;
        }

        let close = (i + 1..tokens.len()).find(|&j| tokens[j].token_type == right_type);
        let j = match close {
            Some(j) => j,
            None => {
                let open = &tokens[i];
                return Err(Error::tokenize(
                    format!("Unclosed escaped identifier starting with '{}'", left),
                    open.span.line,
                    open.span.column,
                ));
            }
        };

        let open_span = tokens[i].span;
        let close_span = tokens[j].span;
        let body: String = chars
            .get(open_span.end..close_span.start)
            .map(|slice| slice.iter().collect())
            .ok_or_else(|| Error::internal("Token span outside of source text"))?;

        if body.trim().is_empty() {
            return Err(Error::tokenize(
                "Empty escaped identifier",
                open_span.line,
                open_span.column,
            ));
        }

        let text = format!("{}{}{}", left, body, right);
        tracing::trace!(identifier = %text, "fused escaped identifier");

        for token in &mut tokens[i + 1..=j] {
            token.marked_for_removal = true;
        }
        tokens[i] = Token::new(
            TokenType::QuotedIdentifier,
            text,
            Span::new(open_span.start, close_span.end, open_span.line, open_span.column),
        );
        i = j + 1;
    }

    tokens.retain(|t| !t.marked_for_removal);
    Ok(Normalized { tokens, comments })
}
