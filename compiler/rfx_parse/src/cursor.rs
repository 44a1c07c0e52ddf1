//! Token cursor for navigating the token stream.

use rfx_ir::Span;
use rfx_lexer::{Token, TokenKind, TokenList};

use crate::ParseError;

/// Position in a token stream with lookahead and consumption helpers.
///
/// Invariant: the last token is always `Eof`, and reading past the end
/// keeps returning it.
pub struct Cursor<'a> {
    tokens: &'a TokenList,
    source: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a TokenList, source: &'a str) -> Self {
        Cursor {
            tokens,
            source,
            pos: 0,
        }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn current(&self) -> Token {
        self.tokens.get(self.pos)
    }

    #[inline]
    pub fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    /// Kind of the token `n` positions ahead (0 = current).
    #[inline]
    pub fn peek_kind(&self, n: usize) -> TokenKind {
        self.tokens.get(self.pos + n).kind
    }

    #[inline]
    pub fn kind_at(&self, pos: usize) -> TokenKind {
        self.tokens.get(pos).kind
    }

    #[inline]
    pub fn token_at(&self, pos: usize) -> Token {
        self.tokens.get(pos)
    }

    pub fn previous_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens.get(self.pos - 1).span
        } else {
            Span::DUMMY
        }
    }

    #[inline]
    pub fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    /// Consume the current token.
    pub fn advance(&mut self) -> Token {
        let token = self.current();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    /// Consume the current token if it is `kind`.
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(kind.describe()))
        }
    }

    pub fn unexpected(&self, expected: &'static str) -> ParseError {
        ParseError::Unexpected {
            expected,
            found: self.current_kind(),
            span: self.current_span(),
        }
    }

    /// Source text of the current token.
    pub fn current_text(&self) -> &'a str {
        self.text(self.current().span)
    }

    pub fn text(&self, span: Span) -> &'a str {
        self.source.get(span.to_range()).unwrap_or("")
    }

    /// Span from `start` to the end of the last consumed token.
    pub fn span_from(&self, start: u32) -> Span {
        Span::new(start, self.previous_span().end.max(start))
    }

    /// Whether the tokens at `pos` and `pos + 1` touch with no gap.
    pub fn adjacent(&self, pos: usize) -> bool {
        self.token_at(pos).span.end == self.token_at(pos + 1).span.start
    }
}

#[cfg(test)]
mod tests;
