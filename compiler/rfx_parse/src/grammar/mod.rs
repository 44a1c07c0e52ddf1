//! Recursive-descent grammar for the supported Java subset.
//!
//! Children are parsed, and therefore allocated, before their parent, so
//! every `Tree::alloc` call sees finished child ids and links them.

mod expr;
mod item;
mod stmt;
mod ty;

use rfx_ir::{Name, NodeData, NodeId, SharedInterner, Span, Tree};
use rfx_lexer::{TokenKind, TokenList};

use crate::cursor::Cursor;
use crate::ParseError;

pub(crate) type ParseResult<T> = Result<T, ParseError>;

pub(crate) struct Parser<'a> {
    cursor: Cursor<'a>,
    tree: Tree,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(tokens: &'a TokenList, source: &'a str, interner: SharedInterner) -> Self {
        Parser {
            cursor: Cursor::new(tokens, source),
            tree: Tree::new(source, interner),
        }
    }

    /// Parse a whole compilation unit and hand back the tree.
    pub(crate) fn parse_unit(mut self) -> ParseResult<Tree> {
        let root = self.compilation_unit()?;
        self.tree.set_root(root);
        Ok(self.tree)
    }

    #[inline]
    fn alloc(&mut self, data: NodeData, span: Span) -> NodeId {
        self.tree.alloc(data, span)
    }

    #[inline]
    fn intern(&self, text: &str) -> Name {
        self.tree.intern(text)
    }

    #[inline]
    fn start(&self) -> u32 {
        self.cursor.current_span().start
    }

    /// `Ident` as a `SimpleName` node.
    fn simple_name(&mut self) -> ParseResult<NodeId> {
        let token = self.cursor.expect(TokenKind::Ident)?;
        let ident = self.intern(self.cursor.text(token.span));
        Ok(self.alloc(NodeData::SimpleName { ident }, token.span))
    }

    /// `a.b.c` as nested `QualifiedName`s.
    fn qualified_name(&mut self) -> ParseResult<NodeId> {
        let start = self.start();
        let mut name = self.simple_name()?;
        while self.cursor.check(TokenKind::Dot) && self.cursor.peek_kind(1) == TokenKind::Ident {
            self.cursor.advance();
            let last = self.simple_name()?;
            name = self.alloc(
                NodeData::QualifiedName {
                    qualifier: name,
                    name: last,
                },
                self.cursor.span_from(start),
            );
        }
        Ok(name)
    }

    /// Modifiers and annotations preceding a declaration.
    fn modifiers(&mut self) -> ParseResult<Vec<NodeId>> {
        let mut modifiers = Vec::new();
        loop {
            match self.cursor.current_kind() {
                TokenKind::Modifier => {
                    let token = self.cursor.advance();
                    let keyword = self.intern(self.cursor.text(token.span));
                    modifiers.push(self.alloc(NodeData::Modifier { keyword }, token.span));
                }
                TokenKind::At if self.cursor.peek_kind(1) == TokenKind::Ident => {
                    modifiers.push(self.annotation()?);
                }
                TokenKind::At => {
                    return Err(ParseError::Unsupported {
                        what: "annotation type declaration",
                        span: self.cursor.current_span(),
                    })
                }
                _ => return Ok(modifiers),
            }
        }
    }

    /// `@Name` or `@Name(...)`. Arguments are kept only as source text.
    fn annotation(&mut self) -> ParseResult<NodeId> {
        let start = self.start();
        self.cursor.expect(TokenKind::At)?;
        let name = self.qualified_name()?;
        if self.cursor.check(TokenKind::LParen) {
            let mut depth = 0usize;
            loop {
                match self.cursor.advance().kind {
                    TokenKind::LParen => depth += 1,
                    TokenKind::RParen => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                    TokenKind::Eof => return Err(self.cursor.unexpected("')'")),
                    _ => {}
                }
            }
        }
        Ok(self.alloc(NodeData::Annotation { name }, self.cursor.span_from(start)))
    }

    /// Comma-separated list between `open` and `close`.
    fn delimited<T>(
        &mut self,
        open: TokenKind,
        close: TokenKind,
        mut item: impl FnMut(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<Vec<T>> {
        self.cursor.expect(open)?;
        let mut items = Vec::new();
        if !self.cursor.check(close) {
            loop {
                items.push(item(self)?);
                if !self.cursor.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.cursor.expect(close)?;
        Ok(items)
    }
}
