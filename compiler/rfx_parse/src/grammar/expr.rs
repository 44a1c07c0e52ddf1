//! Expressions, by precedence climbing.

use rfx_ir::{
    ensure_sufficient_stack, AssignOp, BinaryOp, LitKind, NodeData, NodeId, PostfixOp, PrefixOp,
};
use rfx_lexer::TokenKind;

use super::{ParseResult, Parser};
use crate::ParseError;

/// Precedence of `instanceof`, shared with the relational operators.
const INSTANCEOF_PRECEDENCE: u8 = 7;

impl Parser<'_> {
    pub(super) fn expr(&mut self) -> ParseResult<NodeId> {
        ensure_sufficient_stack(|| self.assignment())
    }

    /// Variable initializer: an expression or `{ ... }`.
    pub(super) fn var_initializer(&mut self) -> ParseResult<NodeId> {
        if self.cursor.check(TokenKind::LBrace) {
            self.array_init()
        } else {
            self.expr()
        }
    }

    fn array_init(&mut self) -> ParseResult<NodeId> {
        let start = self.start();
        self.cursor.expect(TokenKind::LBrace)?;
        let mut elements = Vec::new();
        while !self.cursor.check(TokenKind::RBrace) {
            elements.push(self.var_initializer()?);
            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }
        self.cursor.expect(TokenKind::RBrace)?;
        Ok(self.alloc(NodeData::ArrayInit { elements }, self.cursor.span_from(start)))
    }

    fn assignment(&mut self) -> ParseResult<NodeId> {
        let start = self.start();
        let lhs = self.conditional()?;
        let Some(op) = assign_op(self.cursor.current_kind()) else {
            return Ok(lhs);
        };
        self.cursor.advance();
        let rhs = self.expr()?;
        Ok(self.alloc(NodeData::Assign { op, lhs, rhs }, self.cursor.span_from(start)))
    }

    fn conditional(&mut self) -> ParseResult<NodeId> {
        let start = self.start();
        let cond = self.binary(1)?;
        if !self.cursor.eat(TokenKind::Question) {
            return Ok(cond);
        }
        let then_expr = self.expr()?;
        self.cursor.expect(TokenKind::Colon)?;
        let else_expr = ensure_sufficient_stack(|| self.conditional())?;
        Ok(self.alloc(
            NodeData::Conditional {
                cond,
                then_expr,
                else_expr,
            },
            self.cursor.span_from(start),
        ))
    }

    fn binary(&mut self, min_prec: u8) -> ParseResult<NodeId> {
        let start = self.start();
        let mut lhs = self.unary()?;
        loop {
            if self.cursor.check(TokenKind::InstanceOf) && INSTANCEOF_PRECEDENCE >= min_prec {
                self.cursor.advance();
                let ty = self.parse_type()?;
                lhs = self.alloc(
                    NodeData::InstanceOf { expr: lhs, ty },
                    self.cursor.span_from(start),
                );
                continue;
            }
            let Some((op, width)) = self.binary_op() else {
                break;
            };
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            for _ in 0..width {
                self.cursor.advance();
            }
            let rhs = ensure_sufficient_stack(|| self.binary(prec + 1))?;
            lhs = self.alloc(NodeData::Binary { op, lhs, rhs }, self.cursor.span_from(start));
        }
        Ok(lhs)
    }

    /// Binary operator at the cursor and how many tokens it spans. Shifts
    /// right are assembled from adjacent `>` tokens.
    fn binary_op(&self) -> Option<(BinaryOp, usize)> {
        let op = match self.cursor.current_kind() {
            TokenKind::PipePipe => BinaryOp::Or,
            TokenKind::AmpAmp => BinaryOp::And,
            TokenKind::Pipe => BinaryOp::BitOr,
            TokenKind::Caret => BinaryOp::BitXor,
            TokenKind::Amp => BinaryOp::BitAnd,
            TokenKind::EqEq => BinaryOp::Eq,
            TokenKind::NotEq => BinaryOp::NotEq,
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::LtEq => BinaryOp::LtEq,
            TokenKind::GtEq => BinaryOp::GtEq,
            TokenKind::Shl => BinaryOp::Shl,
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::Percent => BinaryOp::Rem,
            TokenKind::Gt => {
                let pos = self.cursor.position();
                let second = self.cursor.kind_at(pos + 1) == TokenKind::Gt && self.cursor.adjacent(pos);
                if !second {
                    return Some((BinaryOp::Gt, 1));
                }
                let third =
                    self.cursor.kind_at(pos + 2) == TokenKind::Gt && self.cursor.adjacent(pos + 1);
                return Some(if third {
                    (BinaryOp::UShr, 3)
                } else {
                    (BinaryOp::Shr, 2)
                });
            }
            _ => return None,
        };
        Some((op, 1))
    }

    fn unary(&mut self) -> ParseResult<NodeId> {
        let start = self.start();
        let prefix = match self.cursor.current_kind() {
            TokenKind::Bang => Some(PrefixOp::Not),
            TokenKind::Minus => Some(PrefixOp::Neg),
            TokenKind::Plus => Some(PrefixOp::Plus),
            TokenKind::Tilde => Some(PrefixOp::BitNot),
            TokenKind::PlusPlus => Some(PrefixOp::Incr),
            TokenKind::MinusMinus => Some(PrefixOp::Decr),
            _ => None,
        };
        if let Some(op) = prefix {
            self.cursor.advance();
            let operand = ensure_sufficient_stack(|| self.unary())?;
            return Ok(self.alloc(NodeData::Prefix { op, operand }, self.cursor.span_from(start)));
        }
        if self.at_cast() {
            self.cursor.advance();
            let ty = self.parse_type()?;
            self.cursor.expect(TokenKind::RParen)?;
            let expr = ensure_sufficient_stack(|| self.unary())?;
            return Ok(self.alloc(NodeData::Cast { ty, expr }, self.cursor.span_from(start)));
        }
        let primary = self.primary()?;
        self.selectors(primary, start)
    }

    /// `( Type )` followed by something that can only be a cast operand.
    fn at_cast(&self) -> bool {
        if !self.cursor.check(TokenKind::LParen) {
            return false;
        }
        let pos = self.cursor.position() + 1;
        let primitive = self.cursor.kind_at(pos) == TokenKind::Primitive;
        let Some(after) = self.scan_type(pos) else {
            return false;
        };
        if self.cursor.kind_at(after) != TokenKind::RParen {
            return false;
        }
        primitive
            || matches!(
                self.cursor.kind_at(after + 1),
                TokenKind::Ident
                    | TokenKind::IntLit
                    | TokenKind::LongLit
                    | TokenKind::FloatLit
                    | TokenKind::DoubleLit
                    | TokenKind::StringLit
                    | TokenKind::CharLit
                    | TokenKind::True
                    | TokenKind::False
                    | TokenKind::Null
                    | TokenKind::LParen
                    | TokenKind::This
                    | TokenKind::Super
                    | TokenKind::New
                    | TokenKind::Bang
                    | TokenKind::Tilde
            )
    }

    fn primary(&mut self) -> ParseResult<NodeId> {
        let start = self.start();
        let token = self.cursor.current();
        let literal = match token.kind {
            TokenKind::IntLit => Some(LitKind::Int),
            TokenKind::LongLit => Some(LitKind::Long),
            TokenKind::FloatLit => Some(LitKind::Float),
            TokenKind::DoubleLit => Some(LitKind::Double),
            TokenKind::StringLit => Some(LitKind::String),
            TokenKind::CharLit => Some(LitKind::Char),
            TokenKind::True | TokenKind::False => Some(LitKind::Bool),
            TokenKind::Null => Some(LitKind::Null),
            _ => None,
        };
        if let Some(kind) = literal {
            self.cursor.advance();
            let text = self.intern(self.cursor.text(token.span));
            return Ok(self.alloc(NodeData::Literal { kind, text }, token.span));
        }

        match token.kind {
            TokenKind::This => {
                self.cursor.advance();
                if self.cursor.check(TokenKind::LParen) {
                    return Err(ParseError::Unsupported {
                        what: "explicit constructor invocation",
                        span: token.span,
                    });
                }
                Ok(self.alloc(NodeData::This, token.span))
            }
            TokenKind::Super => {
                self.cursor.advance();
                if !self.cursor.eat(TokenKind::Dot) {
                    return Err(ParseError::Unsupported {
                        what: "explicit constructor invocation",
                        span: token.span,
                    });
                }
                let name = self.simple_name()?;
                if !self.cursor.check(TokenKind::LParen) {
                    return Err(ParseError::Unsupported {
                        what: "super field access",
                        span: self.cursor.span_from(start),
                    });
                }
                let args = self.arguments()?;
                Ok(self.alloc(
                    NodeData::SuperMethodCall { name, args },
                    self.cursor.span_from(start),
                ))
            }
            TokenKind::LParen => {
                self.cursor.advance();
                let expr = self.expr()?;
                self.cursor.expect(TokenKind::RParen)?;
                Ok(self.alloc(NodeData::Paren { expr }, self.cursor.span_from(start)))
            }
            TokenKind::New => self.creation(),
            TokenKind::Ident => {
                if self.cursor.peek_kind(1) == TokenKind::LParen {
                    let name = self.simple_name()?;
                    let args = self.arguments()?;
                    return Ok(self.alloc(
                        NodeData::MethodCall {
                            target: None,
                            name,
                            args,
                        },
                        self.cursor.span_from(start),
                    ));
                }
                self.expression_name()
            }
            _ => Err(self.cursor.unexpected("expression")),
        }
    }

    /// `a.b.c` up to, but not including, a segment followed by `(`.
    fn expression_name(&mut self) -> ParseResult<NodeId> {
        let start = self.start();
        let mut name = self.simple_name()?;
        while self.cursor.check(TokenKind::Dot)
            && self.cursor.peek_kind(1) == TokenKind::Ident
            && self.cursor.peek_kind(2) != TokenKind::LParen
        {
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

    fn selectors(&mut self, mut expr: NodeId, start: u32) -> ParseResult<NodeId> {
        loop {
            match self.cursor.current_kind() {
                TokenKind::Dot => match self.cursor.peek_kind(1) {
                    TokenKind::Ident => {
                        self.cursor.advance();
                        let name = self.simple_name()?;
                        let data = if self.cursor.check(TokenKind::LParen) {
                            let args = self.arguments()?;
                            NodeData::MethodCall {
                                target: Some(expr),
                                name,
                                args,
                            }
                        } else {
                            NodeData::FieldAccess { target: expr, name }
                        };
                        expr = self.alloc(data, self.cursor.span_from(start));
                    }
                    TokenKind::Class => {
                        return Err(ParseError::Unsupported {
                            what: "class literal",
                            span: self.cursor.current_span(),
                        })
                    }
                    _ => {
                        return Err(ParseError::Unsupported {
                            what: "qualified creation or generic invocation",
                            span: self.cursor.current_span(),
                        })
                    }
                },
                TokenKind::LBracket => {
                    self.cursor.advance();
                    let index = self.expr()?;
                    self.cursor.expect(TokenKind::RBracket)?;
                    expr = self.alloc(
                        NodeData::ArrayAccess { array: expr, index },
                        self.cursor.span_from(start),
                    );
                }
                TokenKind::PlusPlus | TokenKind::MinusMinus => {
                    let op = if self.cursor.check(TokenKind::PlusPlus) {
                        PostfixOp::Incr
                    } else {
                        PostfixOp::Decr
                    };
                    self.cursor.advance();
                    return Ok(self.alloc(
                        NodeData::Postfix { op, operand: expr },
                        self.cursor.span_from(start),
                    ));
                }
                _ => return Ok(expr),
            }
        }
    }

    fn arguments(&mut self) -> ParseResult<Vec<NodeId>> {
        self.delimited(TokenKind::LParen, TokenKind::RParen, Self::expr)
    }

    /// `new T(args) [body]` or `new T[n]...[] [{...}]`.
    fn creation(&mut self) -> ParseResult<NodeId> {
        let start = self.start();
        self.cursor.expect(TokenKind::New)?;
        let base = self.parse_type_no_dims()?;

        if self.cursor.check(TokenKind::LBracket) {
            let base_start = self.tree.span(base).start;
            let mut ty = base;
            let mut dims = Vec::new();
            while self.cursor.eat(TokenKind::LBracket) {
                if !self.cursor.check(TokenKind::RBracket) {
                    dims.push(self.expr()?);
                }
                self.cursor.expect(TokenKind::RBracket)?;
                ty = self.alloc(NodeData::ArrayType { elem: ty }, self.cursor.span_from(base_start));
            }
            let init = if self.cursor.check(TokenKind::LBrace) {
                Some(self.array_init()?)
            } else {
                None
            };
            return Ok(self.alloc(
                NodeData::ArrayCreation { ty, dims, init },
                self.cursor.span_from(start),
            ));
        }

        let args = self.arguments()?;
        let anonymous = if self.cursor.check(TokenKind::LBrace) {
            let body_start = self.start();
            let members = self.class_body()?;
            Some(self.alloc(
                NodeData::AnonymousClass { members },
                self.cursor.span_from(body_start),
            ))
        } else {
            None
        };
        Ok(self.alloc(
            NodeData::New {
                ty: base,
                args,
                anonymous,
            },
            self.cursor.span_from(start),
        ))
    }
}

fn assign_op(kind: TokenKind) -> Option<AssignOp> {
    Some(match kind {
        TokenKind::Eq => AssignOp::Assign,
        TokenKind::PlusEq => AssignOp::Add,
        TokenKind::MinusEq => AssignOp::Sub,
        TokenKind::StarEq => AssignOp::Mul,
        TokenKind::SlashEq => AssignOp::Div,
        TokenKind::PercentEq => AssignOp::Rem,
        TokenKind::AmpEq => AssignOp::BitAnd,
        TokenKind::PipeEq => AssignOp::BitOr,
        TokenKind::CaretEq => AssignOp::BitXor,
        TokenKind::ShlEq => AssignOp::Shl,
        TokenKind::ShrEq => AssignOp::Shr,
        TokenKind::UShrEq => AssignOp::UShr,
        _ => return None,
    })
}
