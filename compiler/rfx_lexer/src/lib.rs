//! Tokenizer for the rfx front end.
//!
//! Whitespace and comments are skipped rather than kept as trivia: the
//! original text stays in the tree, and the edit script renders unchanged
//! regions by slicing it, so comments survive without the parser seeing them.

mod lexer;
mod token;

pub use lexer::{lex, LexError, TokenList};
pub use token::{Token, TokenKind};
