//! Scanner driver.

use logos::Logos;
use rfx_ir::{Span, SpanError};
use thiserror::Error;

use crate::token::{Token, TokenKind};

/// Lexing failure.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unexpected character '{ch}' at byte {}", span.start)]
    UnexpectedChar { ch: char, span: Span },
    #[error(transparent)]
    Span(#[from] SpanError),
}

/// Tokens of one source unit, terminated by [`TokenKind::Eof`].
#[derive(Clone, Debug, Default)]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token at `index`; past the end this is the trailing `Eof`.
    pub fn get(&self, index: usize) -> Token {
        self.tokens
            .get(index)
            .or_else(|| self.tokens.last())
            .copied()
            .unwrap_or(Token::new(TokenKind::Eof, Span::DUMMY))
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }
}

/// Tokenize `source`.
pub fn lex(source: &str) -> Result<TokenList, LexError> {
    let mut tokens = Vec::new();
    let mut scanner = TokenKind::lexer(source);
    while let Some(result) = scanner.next() {
        let span = Span::try_from_range(scanner.span())?;
        match result {
            Ok(kind) => tokens.push(Token::new(kind, span)),
            Err(()) => {
                let ch = scanner.slice().chars().next().unwrap_or('\u{fffd}');
                return Err(LexError::UnexpectedChar { ch, span });
            }
        }
    }
    let end = u32::try_from(source.len()).map_err(|_| SpanError::EndTooLarge(source.len()))?;
    tokens.push(Token::new(TokenKind::Eof, Span::point(end)));
    Ok(TokenList { tokens })
}

#[cfg(test)]
mod tests;
