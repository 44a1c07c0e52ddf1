//! Compilation units, type declarations and their members.

use rfx_ir::{NodeData, NodeId};
use rfx_lexer::TokenKind;

use super::{ParseResult, Parser};
use crate::ParseError;

impl Parser<'_> {
    pub(super) fn compilation_unit(&mut self) -> ParseResult<NodeId> {
        let package = if self.cursor.check(TokenKind::Package) {
            let pkg_start = self.start();
            self.cursor.advance();
            let name = self.qualified_name()?;
            self.cursor.expect(TokenKind::Semicolon)?;
            Some(self.alloc(NodeData::PackageDecl { name }, self.cursor.span_from(pkg_start)))
        } else {
            None
        };

        let mut imports = Vec::new();
        while self.cursor.check(TokenKind::Import) {
            imports.push(self.import_decl()?);
        }

        let mut types = Vec::new();
        while !self.cursor.is_at_end() {
            if self.cursor.eat(TokenKind::Semicolon) {
                continue;
            }
            types.push(self.type_decl()?);
        }

        let end = self.cursor.current_span().end;
        Ok(self.alloc(
            NodeData::CompilationUnit {
                package,
                imports,
                types,
            },
            rfx_ir::Span::new(0, end),
        ))
    }

    fn import_decl(&mut self) -> ParseResult<NodeId> {
        let start = self.start();
        self.cursor.expect(TokenKind::Import)?;
        let is_static = self.cursor.current_kind() == TokenKind::Modifier
            && self.cursor.current_text() == "static";
        if is_static {
            self.cursor.advance();
        }
        let name = self.qualified_name()?;
        let on_demand = self.cursor.check(TokenKind::Dot) && self.cursor.peek_kind(1) == TokenKind::Star;
        if on_demand {
            self.cursor.advance();
            self.cursor.advance();
        }
        self.cursor.expect(TokenKind::Semicolon)?;
        Ok(self.alloc(
            NodeData::ImportDecl {
                name,
                is_static,
                on_demand,
            },
            self.cursor.span_from(start),
        ))
    }

    /// `class` or `interface` declaration, modifiers included.
    pub(super) fn type_decl(&mut self) -> ParseResult<NodeId> {
        let start = self.start();
        let modifiers = self.modifiers()?;
        match self.cursor.current_kind() {
            TokenKind::Class | TokenKind::Interface => self.type_decl_rest(start, modifiers),
            TokenKind::Ident if matches!(self.cursor.current_text(), "enum" | "record") => {
                Err(ParseError::Unsupported {
                    what: "enum or record declaration",
                    span: self.cursor.current_span(),
                })
            }
            _ => Err(self.cursor.unexpected("class or interface")),
        }
    }

    /// Everything after the modifiers, starting at `class`/`interface`.
    fn type_decl_rest(&mut self, start: u32, modifiers: Vec<NodeId>) -> ParseResult<NodeId> {
        let is_interface = self.cursor.check(TokenKind::Interface);
        self.cursor.advance();
        let name = self.simple_name()?;
        if self.cursor.check(TokenKind::Lt) {
            return Err(ParseError::Unsupported {
                what: "generic type declaration",
                span: self.cursor.current_span(),
            });
        }

        let mut superclass = None;
        let mut interfaces = Vec::new();
        if self.cursor.eat(TokenKind::Extends) {
            if is_interface {
                interfaces = self.type_list()?;
            } else {
                superclass = Some(self.parse_type()?);
            }
        }
        if self.cursor.eat(TokenKind::Implements) {
            interfaces = self.type_list()?;
        }

        let members = self.class_body()?;
        Ok(self.alloc(
            NodeData::TypeDecl {
                modifiers,
                is_interface,
                name,
                superclass,
                interfaces,
                members,
            },
            self.cursor.span_from(start),
        ))
    }

    fn type_list(&mut self) -> ParseResult<Vec<NodeId>> {
        let mut types = vec![self.parse_type()?];
        while self.cursor.eat(TokenKind::Comma) {
            types.push(self.parse_type()?);
        }
        Ok(types)
    }

    /// `{ members }` of a class, interface or anonymous class.
    pub(super) fn class_body(&mut self) -> ParseResult<Vec<NodeId>> {
        self.cursor.expect(TokenKind::LBrace)?;
        let mut members = Vec::new();
        while !self.cursor.check(TokenKind::RBrace) {
            if self.cursor.is_at_end() {
                return Err(self.cursor.unexpected("'}'"));
            }
            if self.cursor.eat(TokenKind::Semicolon) {
                continue;
            }
            members.push(self.member()?);
        }
        self.cursor.expect(TokenKind::RBrace)?;
        Ok(members)
    }

    fn member(&mut self) -> ParseResult<NodeId> {
        let start = self.start();
        let modifiers = self.modifiers()?;

        match self.cursor.current_kind() {
            TokenKind::Class | TokenKind::Interface => {
                return self.type_decl_rest(start, modifiers);
            }
            TokenKind::LBrace => {
                return Err(ParseError::Unsupported {
                    what: "initializer block",
                    span: self.cursor.current_span(),
                })
            }
            TokenKind::Lt => {
                return Err(ParseError::Unsupported {
                    what: "generic method",
                    span: self.cursor.current_span(),
                })
            }
            _ => {}
        }

        // Constructor: `Name (`.
        if self.cursor.check(TokenKind::Ident) && self.cursor.peek_kind(1) == TokenKind::LParen {
            let name = self.simple_name()?;
            return self.method_rest(start, modifiers, None, name);
        }

        let return_type = if self.cursor.check(TokenKind::Void) {
            let token = self.cursor.advance();
            let keyword = self.intern("void");
            self.alloc(NodeData::PrimitiveType { keyword }, token.span)
        } else {
            self.parse_type()?
        };
        let name = self.simple_name()?;
        if self.cursor.check(TokenKind::LParen) {
            return self.method_rest(start, modifiers, Some(return_type), name);
        }

        let first = self.var_fragment_after_name(name)?;
        let mut fragments = vec![first];
        while self.cursor.eat(TokenKind::Comma) {
            fragments.push(self.var_fragment()?);
        }
        self.cursor.expect(TokenKind::Semicolon)?;
        Ok(self.alloc(
            NodeData::FieldDecl {
                modifiers,
                ty: return_type,
                fragments,
            },
            self.cursor.span_from(start),
        ))
    }

    fn method_rest(
        &mut self,
        start: u32,
        modifiers: Vec<NodeId>,
        return_type: Option<NodeId>,
        name: NodeId,
    ) -> ParseResult<NodeId> {
        let params = self.delimited(TokenKind::LParen, TokenKind::RParen, Self::param)?;
        let mut throws = Vec::new();
        if self.cursor.eat(TokenKind::Throws) {
            throws = self.type_list()?;
        }
        let body = if self.cursor.eat(TokenKind::Semicolon) {
            None
        } else {
            Some(self.block()?)
        };
        Ok(self.alloc(
            NodeData::MethodDecl {
                modifiers,
                return_type,
                name,
                params,
                throws,
                body,
            },
            self.cursor.span_from(start),
        ))
    }

    /// Formal parameter: `[final] Type name`.
    pub(super) fn param(&mut self) -> ParseResult<NodeId> {
        let start = self.start();
        let modifiers = self.modifiers()?;
        let ty = self.parse_type()?;
        if self.cursor.check(TokenKind::Dot) {
            return Err(ParseError::Unsupported {
                what: "variable arity parameter",
                span: self.cursor.current_span(),
            });
        }
        let name = self.simple_name()?;
        Ok(self.alloc(
            NodeData::Param {
                modifiers,
                ty,
                name,
            },
            self.cursor.span_from(start),
        ))
    }

    /// `name [= init]`.
    pub(super) fn var_fragment(&mut self) -> ParseResult<NodeId> {
        let name = self.simple_name()?;
        self.var_fragment_after_name(name)
    }

    fn var_fragment_after_name(&mut self, name: NodeId) -> ParseResult<NodeId> {
        let start = self.tree.span(name).start;
        if self.cursor.check(TokenKind::LBracket) {
            return Err(ParseError::Unsupported {
                what: "array dimensions after variable name",
                span: self.cursor.current_span(),
            });
        }
        let init = if self.cursor.eat(TokenKind::Eq) {
            Some(self.var_initializer()?)
        } else {
            None
        };
        Ok(self.alloc(
            NodeData::VarFragment { name, init },
            self.cursor.span_from(start),
        ))
    }
}
