//! Reference front end for the rfx rewrite engine.
//!
//! Turns Java source text into a binding-resolved [`rfx_ir::Tree`]:
//! - `rfx_lexer` tokenizes, skipping comments and whitespace
//! - the grammar builds the arena bottom-up with spans and slots
//! - the resolver fills the binding side tables
//!
//! Only the syntax listed by [`rfx_ir::NodeKind`] is accepted; anything else
//! is reported as [`ParseError::Unsupported`] rather than guessed at.

mod cursor;
mod error;
mod grammar;
mod resolve;

use rfx_ir::{SharedInterner, Tree};
use tracing::debug;

pub use error::ParseError;
pub use resolve::known::{boxed, is_primitive, unboxed};

/// Parse and resolve one source unit.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn parse(source: &str, interner: SharedInterner) -> Result<Tree, ParseError> {
    let tokens = rfx_lexer::lex(source)?;
    let mut tree = grammar::Parser::new(&tokens, source, interner).parse_unit()?;
    let bindings = resolve::Resolver::new(&tree).run();
    *tree.bindings_mut() = bindings;
    debug!(nodes = tree.len(), "parsed unit");
    Ok(tree)
}

#[cfg(test)]
mod tests;
