//! Parse error types.

use rfx_ir::Span;
use rfx_lexer::{LexError, TokenKind};
use thiserror::Error;

/// Failure to build a tree from source text.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("expected {expected}, found {} at byte {}", found.describe(), span.start)]
    Unexpected {
        expected: &'static str,
        found: TokenKind,
        span: Span,
    },

    /// Valid input outside the supported subset.
    #[error("unsupported construct: {what} at byte {}", span.start)]
    Unsupported { what: &'static str, span: Span },
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::Lex(LexError::UnexpectedChar { span, .. })
            | ParseError::Unexpected { span, .. }
            | ParseError::Unsupported { span, .. } => *span,
            ParseError::Lex(LexError::Span(_)) => Span::DUMMY,
        }
    }
}
