//! Statements and blocks.

use rfx_ir::{ensure_sufficient_stack, NodeData, NodeId};
use rfx_lexer::TokenKind;

use super::{ParseResult, Parser};
use crate::ParseError;

impl Parser<'_> {
    pub(super) fn block(&mut self) -> ParseResult<NodeId> {
        let start = self.start();
        self.cursor.expect(TokenKind::LBrace)?;
        let mut statements = Vec::new();
        while !self.cursor.check(TokenKind::RBrace) {
            if self.cursor.is_at_end() {
                return Err(self.cursor.unexpected("'}'"));
            }
            statements.push(self.statement()?);
        }
        self.cursor.expect(TokenKind::RBrace)?;
        Ok(self.alloc(
            NodeData::Block { statements },
            self.cursor.span_from(start),
        ))
    }

    pub(super) fn statement(&mut self) -> ParseResult<NodeId> {
        ensure_sufficient_stack(|| self.statement_inner())
    }

    fn statement_inner(&mut self) -> ParseResult<NodeId> {
        let start = self.start();
        match self.cursor.current_kind() {
            TokenKind::LBrace => self.block(),
            TokenKind::Semicolon => {
                self.cursor.advance();
                Ok(self.alloc(NodeData::Empty, self.cursor.span_from(start)))
            }
            TokenKind::If => self.if_stmt(),
            TokenKind::While => {
                self.cursor.advance();
                let cond = self.paren_condition()?;
                let body = self.statement()?;
                Ok(self.alloc(NodeData::While { cond, body }, self.cursor.span_from(start)))
            }
            TokenKind::Do => {
                self.cursor.advance();
                let body = self.statement()?;
                self.cursor.expect(TokenKind::While)?;
                let cond = self.paren_condition()?;
                self.cursor.expect(TokenKind::Semicolon)?;
                Ok(self.alloc(NodeData::DoWhile { body, cond }, self.cursor.span_from(start)))
            }
            TokenKind::For => self.for_stmt(),
            TokenKind::Return => {
                self.cursor.advance();
                let value = if self.cursor.check(TokenKind::Semicolon) {
                    None
                } else {
                    Some(self.expr()?)
                };
                self.cursor.expect(TokenKind::Semicolon)?;
                Ok(self.alloc(NodeData::Return { value }, self.cursor.span_from(start)))
            }
            TokenKind::Throw => {
                self.cursor.advance();
                let value = self.expr()?;
                self.cursor.expect(TokenKind::Semicolon)?;
                Ok(self.alloc(NodeData::Throw { value }, self.cursor.span_from(start)))
            }
            TokenKind::Break | TokenKind::Continue => {
                let is_break = self.cursor.check(TokenKind::Break);
                self.cursor.advance();
                let label = if self.cursor.check(TokenKind::Ident) {
                    Some(self.simple_name()?)
                } else {
                    None
                };
                self.cursor.expect(TokenKind::Semicolon)?;
                let data = if is_break {
                    NodeData::Break { label }
                } else {
                    NodeData::Continue { label }
                };
                Ok(self.alloc(data, self.cursor.span_from(start)))
            }
            TokenKind::Try => self.try_stmt(),
            TokenKind::Class | TokenKind::Interface => Err(ParseError::Unsupported {
                what: "local class declaration",
                span: self.cursor.current_span(),
            }),
            TokenKind::Ident
                if self.cursor.peek_kind(1) == TokenKind::Colon
                    || matches!(self.cursor.current_text(), "switch" | "assert" | "yield") =>
            {
                Err(ParseError::Unsupported {
                    what: "labeled, switch or assert statement",
                    span: self.cursor.current_span(),
                })
            }
            TokenKind::Modifier if self.cursor.current_text() == "synchronized" => {
                Err(ParseError::Unsupported {
                    what: "synchronized block",
                    span: self.cursor.current_span(),
                })
            }
            _ if self.at_local_var() => {
                let decl = self.local_var()?;
                self.cursor.expect(TokenKind::Semicolon)?;
                self.extend_to_semicolon(decl, start);
                Ok(decl)
            }
            _ => {
                let expr = self.expr()?;
                self.cursor.expect(TokenKind::Semicolon)?;
                Ok(self.alloc(NodeData::ExprStmt { expr }, self.cursor.span_from(start)))
            }
        }
    }

    /// Local variable declaration without the trailing `;`.
    fn local_var(&mut self) -> ParseResult<NodeId> {
        let start = self.start();
        let modifiers = self.modifiers()?;
        let ty = self.parse_type()?;
        let mut fragments = vec![self.var_fragment()?];
        while self.cursor.eat(TokenKind::Comma) {
            fragments.push(self.var_fragment()?);
        }
        Ok(self.alloc(
            NodeData::LocalVar {
                modifiers,
                ty,
                fragments,
            },
            self.cursor.span_from(start),
        ))
    }

    /// Statement spans include their terminating `;`.
    fn extend_to_semicolon(&mut self, id: NodeId, start: u32) {
        let span = self.cursor.span_from(start);
        self.tree.node_mut(id).span = span;
    }

    fn paren_condition(&mut self) -> ParseResult<NodeId> {
        self.cursor.expect(TokenKind::LParen)?;
        let cond = self.expr()?;
        self.cursor.expect(TokenKind::RParen)?;
        Ok(cond)
    }

    fn if_stmt(&mut self) -> ParseResult<NodeId> {
        let start = self.start();
        self.cursor.expect(TokenKind::If)?;
        let cond = self.paren_condition()?;
        let then_branch = self.statement()?;
        let else_branch = if self.cursor.eat(TokenKind::Else) {
            Some(self.statement()?)
        } else {
            None
        };
        Ok(self.alloc(
            NodeData::If {
                cond,
                then_branch,
                else_branch,
            },
            self.cursor.span_from(start),
        ))
    }

    fn for_stmt(&mut self) -> ParseResult<NodeId> {
        let start = self.start();
        self.cursor.expect(TokenKind::For)?;
        self.cursor.expect(TokenKind::LParen)?;

        if self.at_for_each() {
            let param = self.param()?;
            self.cursor.expect(TokenKind::Colon)?;
            let iterable = self.expr()?;
            self.cursor.expect(TokenKind::RParen)?;
            let body = self.statement()?;
            return Ok(self.alloc(
                NodeData::ForEach {
                    param,
                    iterable,
                    body,
                },
                self.cursor.span_from(start),
            ));
        }

        let mut init = Vec::new();
        if !self.cursor.check(TokenKind::Semicolon) {
            if self.at_local_var() {
                init.push(self.local_var()?);
            } else {
                init = self.expr_statement_list()?;
            }
        }
        self.cursor.expect(TokenKind::Semicolon)?;
        let cond = if self.cursor.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.expr()?)
        };
        self.cursor.expect(TokenKind::Semicolon)?;
        let update = if self.cursor.check(TokenKind::RParen) {
            Vec::new()
        } else {
            self.expr_statement_list()?
        };
        self.cursor.expect(TokenKind::RParen)?;
        let body = self.statement()?;
        Ok(self.alloc(
            NodeData::For {
                init,
                cond,
                update,
                body,
            },
            self.cursor.span_from(start),
        ))
    }

    /// `for (Type name :` lookahead.
    fn at_for_each(&self) -> bool {
        let mut pos = self.cursor.position();
        while matches!(self.cursor.kind_at(pos), TokenKind::Modifier) {
            pos += 1;
        }
        self.scan_type(pos).is_some_and(|after| {
            self.cursor.kind_at(after) == TokenKind::Ident
                && self.cursor.kind_at(after + 1) == TokenKind::Colon
        })
    }

    /// Comma-separated expressions in `for` init/update, each wrapped as a
    /// statement.
    fn expr_statement_list(&mut self) -> ParseResult<Vec<NodeId>> {
        let mut stmts = Vec::new();
        loop {
            let start = self.start();
            let expr = self.expr()?;
            stmts.push(self.alloc(NodeData::ExprStmt { expr }, self.cursor.span_from(start)));
            if !self.cursor.eat(TokenKind::Comma) {
                return Ok(stmts);
            }
        }
    }

    fn try_stmt(&mut self) -> ParseResult<NodeId> {
        let start = self.start();
        self.cursor.expect(TokenKind::Try)?;
        if self.cursor.check(TokenKind::LParen) {
            return Err(ParseError::Unsupported {
                what: "try-with-resources",
                span: self.cursor.current_span(),
            });
        }
        let body = self.block()?;
        let mut catches = Vec::new();
        while self.cursor.check(TokenKind::Catch) {
            let catch_start = self.start();
            self.cursor.advance();
            self.cursor.expect(TokenKind::LParen)?;
            let param = self.param()?;
            self.cursor.expect(TokenKind::RParen)?;
            let catch_body = self.block()?;
            catches.push(self.alloc(
                NodeData::Catch {
                    param,
                    body: catch_body,
                },
                self.cursor.span_from(catch_start),
            ));
        }
        let finally = if self.cursor.eat(TokenKind::Finally) {
            Some(self.block()?)
        } else {
            None
        };
        if catches.is_empty() && finally.is_none() {
            return Err(self.cursor.unexpected("catch or finally"));
        }
        Ok(self.alloc(
            NodeData::Try {
                body,
                catches,
                finally,
            },
            self.cursor.span_from(start),
        ))
    }
}
