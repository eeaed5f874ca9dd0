// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Expression parsing for constant definitions and entry defaults.
//!
//! Binary operator precedence uses precedence climbing with a binding
//! power table. Left and right binding powers differ for associativity:
//! every operator is left-associative except `^`, which binds its right
//! operand tighter so `2^3^2` parses as `2^(3^2)`.

use ecow::EcoString;

use super::Parser;
use crate::ast::{BinaryOp, Expr};
use crate::error::{ErrorKind, SourceResult};
use crate::source_analysis::{Keyword, Span, TokenKind};

/// Binding power for binary operators.
#[derive(Debug, Clone, Copy)]
struct BindingPower {
    /// How tightly this operator binds to its left operand.
    left: u8,
    /// How tightly this operator binds to its right operand.
    right: u8,
}

impl BindingPower {
    /// Creates a left-associative binding power.
    const fn left_assoc(precedence: u8) -> Self {
        Self {
            left: precedence,
            right: precedence + 1,
        }
    }

    /// Creates a right-associative binding power.
    const fn right_assoc(precedence: u8) -> Self {
        Self {
            left: precedence + 1,
            right: precedence,
        }
    }
}

/// Gets the operator and binding power for a token, if it is a binary
/// operator.
///
/// # Precedence Levels (from lowest to highest)
///
/// | Level | Operators           | Associativity |
/// |-------|---------------------|---------------|
/// | 10    | `\|\|`              | Left          |
/// | 20    | `&&`                | Left          |
/// | 30    | `==` `!=`           | Left          |
/// | 40    | `<` `<=` `>` `>=`   | Left          |
/// | 50    | `..`                | Left          |
/// | 60    | `+` `-`             | Left          |
/// | 70    | `*` `/` `%`         | Left          |
/// | 80    | `^`                 | Right         |
fn binary_operator(kind: &TokenKind) -> Option<(BinaryOp, BindingPower)> {
    let entry = match kind {
        TokenKind::OrOr => (BinaryOp::Or, BindingPower::left_assoc(10)),
        TokenKind::AndAnd => (BinaryOp::And, BindingPower::left_assoc(20)),
        TokenKind::EqualEqual => (BinaryOp::Equal, BindingPower::left_assoc(30)),
        TokenKind::NotEqual => (BinaryOp::NotEqual, BindingPower::left_assoc(30)),
        TokenKind::Less => (BinaryOp::Less, BindingPower::left_assoc(40)),
        TokenKind::LessEqual => (BinaryOp::LessEqual, BindingPower::left_assoc(40)),
        TokenKind::Greater => (BinaryOp::Greater, BindingPower::left_assoc(40)),
        TokenKind::GreaterEqual => (BinaryOp::GreaterEqual, BindingPower::left_assoc(40)),
        TokenKind::Concat => (BinaryOp::Concat, BindingPower::left_assoc(50)),
        TokenKind::Plus => (BinaryOp::Add, BindingPower::left_assoc(60)),
        TokenKind::Minus => (BinaryOp::Sub, BindingPower::left_assoc(60)),
        TokenKind::Star => (BinaryOp::Mul, BindingPower::left_assoc(70)),
        TokenKind::Slash => (BinaryOp::Div, BindingPower::left_assoc(70)),
        TokenKind::Percent => (BinaryOp::Rem, BindingPower::left_assoc(70)),
        TokenKind::Caret => (BinaryOp::Pow, BindingPower::right_assoc(80)),
        _ => return None,
    };
    Some(entry)
}

/// Token display names accepted at the start of an expression atom.
const ATOM_START: &[&str] = &[
    "'true'", "'false'", "INTEGER", "FLOAT", "HEX", "STRING", "NAME", "'('", "'!'", "'-'",
];

impl Parser {
    /// expr := binary expression over atoms
    pub(crate) fn parse_expr(&mut self) -> SourceResult<Expr> {
        self.parse_binary(0)
    }

    fn parse_binary(&mut self, min_bp: u8) -> SourceResult<Expr> {
        let mut lhs = self.parse_unary()?;
        while let Some((op, bp)) = binary_operator(self.current_kind()) {
            if bp.left < min_bp {
                break;
            }
            self.advance();
            let rhs = self.parse_binary(bp.right)?;
            let span = lhs.span().cover(rhs.span());
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                span,
            };
        }
        Ok(lhs)
    }

    /// unary := '!' unary | '-' number | atom
    ///
    /// The operator grammar has no general unary minus; a `-` is only
    /// accepted directly before a numeric literal, which it negates.
    fn parse_unary(&mut self) -> SourceResult<Expr> {
        match self.current_kind() {
            TokenKind::Not => {
                let start = self.current_span();
                self.advance();
                let operand = self.parse_unary()?;
                let span = start.cover(operand.span());
                Ok(Expr::Not {
                    operand: Box::new(operand),
                    span,
                })
            }
            TokenKind::Minus => {
                let start = self.current_span();
                self.advance();
                match self.current_kind() {
                    TokenKind::Integer(_) | TokenKind::Hex(_) | TokenKind::Float(_) => {
                        self.parse_number(true, start)
                    }
                    _ => Err(self.unexpected(&["INTEGER", "FLOAT", "HEX"])),
                }
            }
            _ => self.parse_atom(),
        }
    }

    fn parse_atom(&mut self) -> SourceResult<Expr> {
        let span = self.current_span();
        match self.current_kind() {
            TokenKind::Keyword(Keyword::True) => {
                self.advance();
                Ok(Expr::Bool(true, span))
            }
            TokenKind::Keyword(Keyword::False) => {
                self.advance();
                Ok(Expr::Bool(false, span))
            }
            TokenKind::Integer(_) | TokenKind::Hex(_) | TokenKind::Float(_) => {
                self.parse_number(false, span)
            }
            TokenKind::String(text) => {
                let expr = Expr::Str(text.clone(), span);
                self.advance();
                Ok(expr)
            }
            TokenKind::Identifier(name) => {
                let expr = Expr::Ident(name.clone(), span);
                self.advance();
                Ok(expr)
            }
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(&TokenKind::RightParen)?;
                Ok(inner)
            }
            _ => Err(self.unexpected(ATOM_START)),
        }
    }

    /// Parses the current numeric literal token, applying `negative`.
    ///
    /// Decimal integers must fit `i32` after negation; hex digits fill the
    /// 32-bit pattern and reinterpret as signed, so `0xFFFFFFFF` is `-1`.
    /// Values that do not fit are a parse-time diagnostic.
    fn parse_number(&mut self, negative: bool, start: Span) -> SourceResult<Expr> {
        let token_span = self.current_span();
        let span = start.cover(token_span);
        let invalid = |text: &str| {
            let rendered = if negative {
                EcoString::from(format!("-{text}"))
            } else {
                EcoString::from(text)
            };
            ErrorKind::InvalidNumber { text: rendered }.at(span)
        };

        let expr = match self.current_kind() {
            TokenKind::Integer(text) => {
                let magnitude: i64 = text.parse().map_err(|_| invalid(text))?;
                let value = if negative { -magnitude } else { magnitude };
                let value = i32::try_from(value).map_err(|_| invalid(text))?;
                Expr::Int(value, span)
            }
            TokenKind::Hex(text) => {
                let digits = &text[2..];
                let bits = u32::from_str_radix(digits, 16).map_err(|_| invalid(text))?;
                #[expect(
                    clippy::cast_possible_wrap,
                    reason = "hex literals fill the 32-bit pattern and reinterpret as signed"
                )]
                let mut value = bits as i32;
                if negative {
                    value = value.wrapping_neg();
                }
                Expr::Int(value, span)
            }
            TokenKind::Float(text) => {
                let magnitude: f64 = text.parse().map_err(|_| invalid(text))?;
                if !magnitude.is_finite() {
                    return Err(invalid(text));
                }
                let value = if negative { -magnitude } else { magnitude };
                Expr::Float(value, span)
            }
            _ => unreachable!("caller checked for a numeric literal"),
        };
        self.advance();
        Ok(expr)
    }
}
