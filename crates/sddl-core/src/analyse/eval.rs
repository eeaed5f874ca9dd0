// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Constant expression evaluation.
//!
//! Two operations are exposed over the syntactic [`Expr`] tree:
//!
//! - [`type_of`] — the statically resolvable result kind, used to infer
//!   the kind of `auto`/`local` constants. Mixed operand kinds that no
//!   operator accepts fail with a type-mismatch diagnostic.
//! - [`eval`] — folds the tree to a [`Value`] under a [`Scope`].
//!
//! Both resolve identifiers the same way: the public constant table first,
//! then the current file's constants.
//!
//! Numeric promotion: any arithmetic involving a float yields a float;
//! integer/integer stays integer, including `^` (computed through the
//! math library and truncated back).

use std::collections::HashMap;

use ecow::EcoString;

use crate::ast::{BinaryOp, Expr};
use crate::error::{ErrorKind, SourceResult};
use crate::source_analysis::Span;

use super::value::{float_eq, float_le, float_lt, Kind, Value};

/// Identifier resolution context for expression evaluation.
///
/// Lookups try the public (cross-file) table first, then the file table.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    public: &'a std::collections::BTreeMap<EcoString, Value>,
    file: Option<&'a HashMap<EcoString, Value>>,
}

impl<'a> Scope<'a> {
    /// Creates a scope over the public constant table alone.
    #[must_use]
    pub fn new(public: &'a std::collections::BTreeMap<EcoString, Value>) -> Self {
        Self { public, file: None }
    }

    /// Extends the scope with a file-level constant table.
    #[must_use]
    pub fn with_file(self, file: &'a HashMap<EcoString, Value>) -> Self {
        Self {
            file: Some(file),
            ..self
        }
    }

    /// Resolves a constant by name, public table first.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&'a Value> {
        self.public
            .get(name)
            .or_else(|| self.file.and_then(|file| file.get(name)))
    }
}

/// Computes the statically resolvable result kind of an expression.
///
/// # Errors
///
/// Fails with a type mismatch when no operator accepts the operand kinds,
/// or with an unresolved-variable diagnostic for unknown identifiers.
pub fn type_of(expr: &Expr, scope: &Scope) -> SourceResult<Kind> {
    match expr {
        Expr::Bool(..) => Ok(Kind::Bool),
        Expr::Int(..) => Ok(Kind::Int),
        Expr::Float(..) => Ok(Kind::Float),
        Expr::Str(..) => Ok(Kind::String),
        Expr::Ident(name, span) => scope
            .lookup(name)
            .map(Value::kind)
            .ok_or_else(|| unresolved(name, *span)),
        Expr::Not { operand, span } => match type_of(operand, scope)? {
            Kind::Bool => Ok(Kind::Bool),
            _ => Err(mismatch(*span)),
        },
        Expr::Binary {
            op,
            lhs,
            rhs,
            span,
        } => {
            let left = type_of(lhs, scope)?;
            let right = type_of(rhs, scope)?;
            binary_kind(*op, left, right).ok_or_else(|| mismatch(*span))
        }
    }
}

/// The result kind of `op` over operand kinds, or `None` on mismatch.
fn binary_kind(op: BinaryOp, left: Kind, right: Kind) -> Option<Kind> {
    use BinaryOp::{
        Add, And, Concat, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mul, NotEqual, Or,
        Pow, Rem, Sub,
    };
    match op {
        Add | Sub | Mul | Div | Rem | Pow => match (left, right) {
            (Kind::Int, Kind::Int) => Some(Kind::Int),
            (l, r) if l.is_numeric() && r.is_numeric() => Some(Kind::Float),
            _ => None,
        },
        Less | LessEqual | Greater | GreaterEqual => {
            (left.is_numeric() && right.is_numeric()).then_some(Kind::Bool)
        }
        Equal | NotEqual => match (left, right) {
            (Kind::Bool, Kind::Bool) | (Kind::String, Kind::String) => Some(Kind::Bool),
            (l, r) if l.is_numeric() && r.is_numeric() => Some(Kind::Bool),
            _ => None,
        },
        And | Or => (left == Kind::Bool && right == Kind::Bool).then_some(Kind::Bool),
        Concat => (left == Kind::String && right == Kind::String).then_some(Kind::String),
    }
}

/// Folds an expression to a concrete [`Value`].
///
/// # Errors
///
/// Fails on unresolved identifiers, operand kind mismatches, and integer
/// division by zero.
pub fn eval(expr: &Expr, scope: &Scope) -> SourceResult<Value> {
    match expr {
        Expr::Bool(b, _) => Ok(Value::Bool(*b)),
        Expr::Int(i, _) => Ok(Value::Int(*i)),
        Expr::Float(f, _) => Ok(Value::Float(*f)),
        Expr::Str(s, _) => Ok(Value::String(s.clone())),
        Expr::Ident(name, span) => scope
            .lookup(name)
            .cloned()
            .ok_or_else(|| unresolved(name, *span)),
        Expr::Not { operand, span } => match eval(operand, scope)? {
            Value::Bool(b) => Ok(Value::Bool(!b)),
            _ => Err(mismatch(*span)),
        },
        Expr::Binary {
            op,
            lhs,
            rhs,
            span,
        } => eval_binary(*op, lhs, rhs, *span, scope),
    }
}

fn eval_binary(
    op: BinaryOp,
    lhs: &Expr,
    rhs: &Expr,
    span: Span,
    scope: &Scope,
) -> SourceResult<Value> {
    // Logical operators short-circuit; everything else folds both sides.
    if matches!(op, BinaryOp::And | BinaryOp::Or) {
        let Value::Bool(left) = eval(lhs, scope)? else {
            return Err(mismatch(span));
        };
        let short = match op {
            BinaryOp::And => !left,
            _ => left,
        };
        if short {
            return Ok(Value::Bool(left));
        }
        let Value::Bool(right) = eval(rhs, scope)? else {
            return Err(mismatch(span));
        };
        return Ok(Value::Bool(right));
    }

    let left = eval(lhs, scope)?;
    let right = eval(rhs, scope)?;

    match op {
        BinaryOp::Add => arithmetic(left, right, span, i32::wrapping_add, |a, b| a + b),
        BinaryOp::Sub => arithmetic(left, right, span, i32::wrapping_sub, |a, b| a - b),
        BinaryOp::Mul => arithmetic(left, right, span, i32::wrapping_mul, |a, b| a * b),
        BinaryOp::Div => match (&left, &right) {
            (Value::Int(_), Value::Int(0)) => Err(ErrorKind::DivisionByZero.at(span)),
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_div(*b))),
            _ => float_arithmetic(left, right, span, |a, b| a / b),
        },
        BinaryOp::Rem => match (&left, &right) {
            (Value::Int(_), Value::Int(0)) => Err(ErrorKind::DivisionByZero.at(span)),
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_rem(*b))),
            _ => float_arithmetic(left, right, span, |a, b| a % b),
        },
        BinaryOp::Pow => match (&left, &right) {
            (Value::Int(a), Value::Int(b)) => {
                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "integer exponentiation truncates back to 32 bits"
                )]
                let value = f64::from(*a).powf(f64::from(*b)) as i32;
                Ok(Value::Int(value))
            }
            _ => float_arithmetic(left, right, span, f64::powf),
        },
        BinaryOp::Less => comparison(left, right, span, |a, b| a < b, float_lt),
        BinaryOp::LessEqual => comparison(left, right, span, |a, b| a <= b, float_le),
        BinaryOp::Greater => comparison(left, right, span, |a, b| a > b, |a, b| float_lt(b, a)),
        BinaryOp::GreaterEqual => {
            comparison(left, right, span, |a, b| a >= b, |a, b| float_le(b, a))
        }
        BinaryOp::Equal => equality(left, right, span).map(Value::Bool),
        BinaryOp::NotEqual => equality(left, right, span).map(|eq| Value::Bool(!eq)),
        BinaryOp::Concat => match (left, right) {
            (Value::String(a), Value::String(b)) => {
                let mut joined = a;
                joined.push_str(&b);
                Ok(Value::String(joined))
            }
            _ => Err(mismatch(span)),
        },
        BinaryOp::And | BinaryOp::Or => unreachable!("handled before operand folding"),
    }
}

/// Applies an arithmetic operator with Int/Int → Int, otherwise Float.
fn arithmetic(
    left: Value,
    right: Value,
    span: Span,
    int_op: impl Fn(i32, i32) -> i32,
    float_op: impl Fn(f64, f64) -> f64,
) -> SourceResult<Value> {
    match (&left, &right) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(int_op(*a, *b))),
        _ => float_arithmetic(left, right, span, float_op),
    }
}

/// Applies a float operator after promoting both operands.
fn float_arithmetic(
    left: Value,
    right: Value,
    span: Span,
    op: impl Fn(f64, f64) -> f64,
) -> SourceResult<Value> {
    match (left.try_to_float(), right.try_to_float()) {
        (Some(a), Some(b)) => Ok(Value::Float(op(a, b))),
        _ => Err(mismatch(span)),
    }
}

/// Applies an ordering comparison over numeric operands.
fn comparison(
    left: Value,
    right: Value,
    span: Span,
    int_op: impl Fn(i32, i32) -> bool,
    float_op: impl Fn(f64, f64) -> bool,
) -> SourceResult<Value> {
    match (&left, &right) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Bool(int_op(*a, *b))),
        _ => match (left.try_to_float(), right.try_to_float()) {
            (Some(a), Some(b)) => Ok(Value::Bool(float_op(a, b))),
            _ => Err(mismatch(span)),
        },
    }
}

/// Equality over matched bools, numerics, or strings.
fn equality(left: Value, right: Value, span: Span) -> SourceResult<bool> {
    match (&left, &right) {
        (Value::Bool(a), Value::Bool(b)) => Ok(a == b),
        (Value::String(a), Value::String(b)) => Ok(a == b),
        (Value::Int(a), Value::Int(b)) => Ok(a == b),
        _ => match (left.try_to_float(), right.try_to_float()) {
            (Some(a), Some(b)) => Ok(float_eq(a, b)),
            _ => Err(mismatch(span)),
        },
    }
}

fn mismatch(span: Span) -> crate::error::SourceError {
    ErrorKind::TypeMismatch.at(span)
}

fn unresolved(name: &EcoString, span: Span) -> crate::error::SourceError {
    ErrorKind::UnresolvedVariable { name: name.clone() }.at(span)
}
