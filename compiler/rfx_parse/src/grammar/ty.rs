//! Type references.

use rfx_ir::{NodeData, NodeId};
use rfx_lexer::TokenKind;

use super::{ParseResult, Parser};

impl Parser<'_> {
    /// Primitive, simple, qualified, parameterized and array types.
    pub(super) fn parse_type(&mut self) -> ParseResult<NodeId> {
        let start = self.start();
        let base = self.parse_type_no_dims()?;
        self.array_dims(base, start)
    }

    /// Wrap `elem` in one `ArrayType` per trailing `[]`.
    pub(super) fn array_dims(&mut self, mut elem: NodeId, start: u32) -> ParseResult<NodeId> {
        while self.cursor.check(TokenKind::LBracket)
            && self.cursor.peek_kind(1) == TokenKind::RBracket
        {
            self.cursor.advance();
            self.cursor.advance();
            elem = self.alloc(NodeData::ArrayType { elem }, self.cursor.span_from(start));
        }
        Ok(elem)
    }

    pub(super) fn parse_type_no_dims(&mut self) -> ParseResult<NodeId> {
        let start = self.start();
        if self.cursor.check(TokenKind::Primitive) {
            let token = self.cursor.advance();
            let keyword = self.intern(self.cursor.text(token.span));
            return Ok(self.alloc(NodeData::PrimitiveType { keyword }, token.span));
        }
        if self.cursor.check(TokenKind::Question) {
            // Unbounded wildcard; bounded ones are outside the subset.
            let token = self.cursor.advance();
            if matches!(self.cursor.current_kind(), TokenKind::Extends | TokenKind::Super) {
                return Err(crate::ParseError::Unsupported {
                    what: "bounded wildcard",
                    span: self.cursor.current_span(),
                });
            }
            let ident = self.intern("?");
            let name = self.alloc(NodeData::SimpleName { ident }, token.span);
            return Ok(self.alloc(NodeData::SimpleType { name }, token.span));
        }
        let name = self.qualified_name()?;
        let simple = self.alloc(NodeData::SimpleType { name }, self.cursor.span_from(start));
        if !self.cursor.check(TokenKind::Lt) {
            return Ok(simple);
        }
        let args = self.delimited(TokenKind::Lt, TokenKind::Gt, Self::parse_type)?;
        Ok(self.alloc(
            NodeData::ParameterizedType { base: simple, args },
            self.cursor.span_from(start),
        ))
    }

    /// Skip over a syntactically valid type starting at `pos` without
    /// allocating. Returns the position after it.
    pub(super) fn scan_type(&self, pos: usize) -> Option<usize> {
        let mut pos = match self.cursor.kind_at(pos) {
            TokenKind::Primitive => pos + 1,
            TokenKind::Ident => {
                let mut pos = pos + 1;
                while self.cursor.kind_at(pos) == TokenKind::Dot
                    && self.cursor.kind_at(pos + 1) == TokenKind::Ident
                {
                    pos += 2;
                }
                if self.cursor.kind_at(pos) == TokenKind::Lt {
                    pos += 1;
                    if self.cursor.kind_at(pos) != TokenKind::Gt {
                        loop {
                            pos = if self.cursor.kind_at(pos) == TokenKind::Question {
                                pos + 1
                            } else {
                                self.scan_type(pos)?
                            };
                            if self.cursor.kind_at(pos) != TokenKind::Comma {
                                break;
                            }
                            pos += 1;
                        }
                    }
                    if self.cursor.kind_at(pos) != TokenKind::Gt {
                        return None;
                    }
                    pos += 1;
                }
                pos
            }
            _ => return None,
        };
        while self.cursor.kind_at(pos) == TokenKind::LBracket
            && self.cursor.kind_at(pos + 1) == TokenKind::RBracket
        {
            pos += 2;
        }
        Some(pos)
    }

    /// Whether a local variable declaration starts at the cursor.
    pub(super) fn at_local_var(&self) -> bool {
        match self.cursor.current_kind() {
            TokenKind::Modifier | TokenKind::At | TokenKind::Primitive => true,
            TokenKind::Ident => self
                .scan_type(self.cursor.position())
                .is_some_and(|after| self.cursor.kind_at(after) == TokenKind::Ident),
            _ => false,
        }
    }
}
