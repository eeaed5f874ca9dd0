// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The constant collector.
//!
//! Constants are collected in two passes per file. The Enter pass records
//! a slot for every defined constant and a stub for every name referenced
//! before (or without) a definition, building the dependency edges between
//! them. The Collect pass orders the slots topologically, folds each
//! expression, and routes the result to the public table — or to the
//! file-local table for `local` constants, which later expressions in the
//! same file can still read.
//!
//! Identifiers resolve against the public table first; a public hit is a
//! plain value and contributes no dependency edge.

use std::collections::HashMap;

use ecow::EcoString;
use tracing::debug;

use crate::ast::{ConstantDef, ConstantKind, Expr, Item, Schema};
use crate::error::{ErrorKind, SourceResult};
use crate::model::Compilation;
use crate::source_analysis::Span;

use super::eval::{eval, type_of, Scope};
use super::graph::topological_order;
use super::value::{Kind, Value};

/// Runs both collector passes for one file.
///
/// Returns the file-local table: the `local` constants of this file, which
/// message defaults may still reference.
///
/// # Errors
///
/// Fails on redefinitions, unresolved or circular references, and
/// expressions that cannot satisfy their declared kind.
pub fn collect(
    schema: &Schema,
    tables: &mut Compilation,
) -> SourceResult<HashMap<EcoString, Value>> {
    let mut collector = Collector::default();
    for item in &schema.items {
        if let Item::Constant(def) = item {
            collector.enter(def, tables)?;
        }
    }
    collector.finish(tables)
}

/// One constant being collected: a definition, or a stub for a name that
/// has only been referenced so far.
struct Slot<'a> {
    /// The right-hand side, once the definition is seen.
    expr: Option<&'a Expr>,
    /// Declared kind; `None` means infer.
    declared: Option<Kind>,
    /// `local` constants never reach the public table.
    hidden: bool,
    /// Definition site, or the first referencing site for stubs.
    span: Span,
    /// Names of in-progress constants this one depends on.
    refs: Vec<EcoString>,
}

impl Slot<'_> {
    fn stub(span: Span) -> Self {
        Self {
            expr: None,
            declared: None,
            hidden: false,
            span,
            refs: Vec::new(),
        }
    }
}

#[derive(Default)]
struct Collector<'a> {
    slots: HashMap<EcoString, Slot<'a>>,
}

impl<'a> Collector<'a> {
    /// Enter pass for one `constant` definition.
    fn enter(&mut self, def: &'a ConstantDef, tables: &Compilation) -> SourceResult<()> {
        let name = &def.name.name;
        let redefined = || {
            ErrorKind::Redefined {
                category: "constant",
                name: name.clone(),
            }
            .at(def.name.span)
        };
        if tables.constants.contains_key(name) {
            return Err(redefined());
        }
        if self
            .slots
            .get(name)
            .is_some_and(|slot| slot.expr.is_some())
        {
            return Err(redefined());
        }

        // References to public constants resolve to plain values; only
        // in-progress names become stubs and dependency edges.
        let mut refs: Vec<(EcoString, Span)> = Vec::new();
        def.value.for_each_ident(&mut |ident, span| {
            if !tables.constants.contains_key(ident) {
                refs.push((ident.clone(), span));
            }
        });
        for (ident, span) in &refs {
            self.slots
                .entry(ident.clone())
                .or_insert_with(|| Slot::stub(*span));
        }

        let slot = self
            .slots
            .entry(name.clone())
            .or_insert_with(|| Slot::stub(def.name.span));
        slot.expr = Some(&def.value);
        slot.declared = declared_kind(def.kind);
        slot.hidden = def.kind == ConstantKind::Local;
        slot.span = def.name.span;
        slot.refs = refs.into_iter().map(|(ident, _)| ident).collect();
        Ok(())
    }

    /// Collect pass: order, fold, and promote every slot.
    fn finish(self, tables: &mut Compilation) -> SourceResult<HashMap<EcoString, Value>> {
        let mut names: Vec<EcoString> = self.slots.keys().cloned().collect();
        names.sort();

        for name in &names {
            let slot = &self.slots[name];
            if slot.expr.is_none() {
                return Err(ErrorKind::UnresolvedVariable { name: name.clone() }.at(slot.span));
            }
        }

        let order = topological_order(&names, |name| self.slots[name].refs.clone())
            .map_err(|name| ErrorKind::CircularConstant.at(self.slots[&name].span))?;

        let mut resolved: HashMap<EcoString, Value> = HashMap::new();
        let mut locals: HashMap<EcoString, Value> = HashMap::new();
        for name in order {
            let slot = &self.slots[&name];
            let expr = slot.expr.expect("undefined slots rejected above");
            let scope = Scope::new(&tables.constants).with_file(&resolved);
            let value = match slot.declared {
                Some(kind) => {
                    let folded = eval(expr, &scope)?;
                    folded.convert(kind).ok_or_else(|| {
                        ErrorKind::Conversion {
                            kind: kind.keyword(),
                        }
                        .at(expr.span())
                    })?
                }
                None => {
                    type_of(expr, &scope)?;
                    eval(expr, &scope)?
                }
            };
            resolved.insert(name.clone(), value.clone());
            if slot.hidden {
                locals.insert(name, value);
            } else {
                tables.constants.insert(name, value);
            }
        }

        debug!(
            public = resolved.len() - locals.len(),
            local = locals.len(),
            "collected constants"
        );
        Ok(locals)
    }
}

/// Maps the declared kind to a conversion target; `auto` and `local` infer.
fn declared_kind(kind: ConstantKind) -> Option<Kind> {
    match kind {
        ConstantKind::Auto | ConstantKind::Local => None,
        ConstantKind::Boolean => Some(Kind::Bool),
        ConstantKind::Integer => Some(Kind::Int),
        ConstantKind::Number => Some(Kind::Float),
        ConstantKind::String => Some(Kind::String),
    }
}
