// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The message collector.
//!
//! The Enter pass resolves each message definition: place and name
//! uniqueness, entry types (creating forward stubs for user types seen
//! before their definition), carriage options, and defaults. Required
//! entries of user type contribute the dependency edges between messages.
//!
//! The Collect pass rejects stubs that never saw a definition, orders the
//! messages topologically (rejecting cycles), re-verifies every default
//! against its entry's declared kind, and promotes the results to the
//! public message table.

use std::collections::{HashMap, HashSet};

use ecow::EcoString;
use tracing::debug;

use crate::ast::{AssignClause, Item, MessageDef, Schema, TypeName};
use crate::error::{ErrorKind, SourceResult};
use crate::model::{Compilation, Entry, EntryOption, FieldType, Message};
use crate::source_analysis::Span;

use super::eval::{eval, Scope};
use super::graph::topological_order;
use super::value::Value;

/// Runs both collector passes for one file.
///
/// `locals` is the file-local constant table produced by the constant
/// collector; entry defaults see it merged under the public table.
///
/// # Errors
///
/// Fails on redefinitions, place or name conflicts, unresolved types,
/// dependency cycles, and defaults that mismatch their entry's kind.
pub fn collect(
    schema: &Schema,
    tables: &mut Compilation,
    locals: &HashMap<EcoString, Value>,
) -> SourceResult<()> {
    let mut collector = Collector::default();
    for item in &schema.items {
        if let Item::Message(def) = item {
            collector.enter(def, tables, locals)?;
        }
    }
    collector.finish(tables)
}

/// One message being collected: a definition, or a stub for a type name
/// that has only been referenced so far.
#[derive(Default)]
struct Slot {
    /// Resolved entries, place-sorted, once the definition is seen.
    entries: Option<Vec<Entry>>,
    /// Definition site, or the first referencing site for stubs.
    span: Span,
    /// Names of in-progress messages this one requires.
    refs: Vec<EcoString>,
    /// Field name → span of its explicit default, for Collect-phase
    /// verification diagnostics.
    default_spans: Vec<(EcoString, Span)>,
}

impl Slot {
    fn stub(span: Span) -> Self {
        Self {
            span,
            ..Self::default()
        }
    }
}

#[derive(Default)]
struct Collector {
    slots: HashMap<EcoString, Slot>,
}

impl Collector {
    /// Enter pass for one `message` definition.
    fn enter(
        &mut self,
        def: &MessageDef,
        tables: &Compilation,
        locals: &HashMap<EcoString, Value>,
    ) -> SourceResult<()> {
        let name = &def.name.name;
        let redefined = || {
            ErrorKind::Redefined {
                category: "message",
                name: name.clone(),
            }
            .at(def.name.span)
        };
        if tables.messages.contains_key(name) {
            return Err(redefined());
        }
        if self
            .slots
            .get(name)
            .is_some_and(|slot| slot.entries.is_some())
        {
            return Err(redefined());
        }

        let mut places: HashSet<u32> = HashSet::new();
        let mut names: HashSet<EcoString> = HashSet::new();
        let mut entries: Vec<Entry> = Vec::new();
        let mut refs: Vec<EcoString> = Vec::new();
        let mut default_spans: Vec<(EcoString, Span)> = Vec::new();

        for entry in &def.entries {
            if !places.insert(entry.place.value) {
                return Err(ErrorKind::PlaceConflict {
                    place: entry.place.value,
                }
                .at(entry.place.span));
            }
            if !names.insert(entry.name.name.clone()) {
                return Err(ErrorKind::NameConflict {
                    name: entry.name.name.clone(),
                }
                .at(entry.name.span));
            }
            if matches!(entry.assign, Some(AssignClause::Delete(_))) {
                continue;
            }

            let ty = match &entry.ty.name {
                TypeName::Boolean => FieldType::Bool,
                TypeName::Integer => FieldType::Int,
                TypeName::Number => FieldType::Float,
                TypeName::String => FieldType::String,
                TypeName::Named(target) => {
                    if !tables.messages.contains_key(target)
                        && target != name
                        && !self.slots.contains_key(target)
                    {
                        self.slots
                            .insert(target.clone(), Slot::stub(entry.ty.span));
                    }
                    FieldType::Other(target.clone())
                }
            };

            let option = match &entry.assign {
                Some(AssignClause::Option(_)) => EntryOption::Option,
                Some(AssignClause::Array(_)) => EntryOption::Array,
                Some(AssignClause::Table(_)) => EntryOption::Table,
                Some(AssignClause::Default(_) | AssignClause::Delete(_)) | None => {
                    EntryOption::Require
                }
            };

            let default = if option == EntryOption::Require {
                if let Some(AssignClause::Default(expr)) = &entry.assign {
                    let scope = Scope::new(&tables.constants).with_file(locals);
                    default_spans.push((entry.name.name.clone(), expr.span()));
                    Some(eval(expr, &scope)?)
                } else {
                    ty.zero_value()
                }
            } else {
                None
            };

            if option == EntryOption::Require {
                if let FieldType::Other(target) = &ty {
                    if !tables.messages.contains_key(target) {
                        refs.push(target.clone());
                    }
                }
            }

            entries.push(Entry {
                name: entry.name.name.clone(),
                place: entry.place.value,
                ty,
                option,
                default,
            });
        }

        entries.sort_by_key(|entry| entry.place);

        let slot = self
            .slots
            .entry(name.clone())
            .or_insert_with(|| Slot::stub(def.name.span));
        slot.entries = Some(entries);
        slot.span = def.name.span;
        slot.refs = refs;
        slot.default_spans = default_spans;
        Ok(())
    }

    /// Collect pass: order, verify defaults, and promote every slot.
    fn finish(mut self, tables: &mut Compilation) -> SourceResult<()> {
        let mut names: Vec<EcoString> = self.slots.keys().cloned().collect();
        names.sort();

        for name in &names {
            let slot = &self.slots[name];
            if slot.entries.is_none() {
                return Err(ErrorKind::UnresolvedType { name: name.clone() }.at(slot.span));
            }
        }

        let order = topological_order(&names, |name| self.slots[name].refs.clone())
            .map_err(|name| ErrorKind::CircularMessage.at(self.slots[&name].span))?;

        for name in order {
            let slot = self.slots.get_mut(&name).expect("ordered names are slots");
            let mut entries = slot.entries.take().expect("stubs rejected above");
            verify_defaults(&mut entries, &slot.default_spans, slot.span)?;
            tables.messages.insert(
                name.clone(),
                Message {
                    name: name.clone(),
                    entries,
                },
            );
        }

        debug!(count = tables.messages.len(), "collected messages");
        Ok(())
    }
}

/// Checks every default against its entry's declared kind, converting
/// explicit defaults to that kind (`number x @1 = 2` stores `2.0`).
///
/// Entries of user type carry no default; an explicit one can never
/// satisfy the type and is rejected here.
fn verify_defaults(
    entries: &mut [Entry],
    default_spans: &[(EcoString, Span)],
    message_span: Span,
) -> SourceResult<()> {
    for entry in entries.iter_mut() {
        let span = default_spans
            .iter()
            .find(|(name, _)| *name == entry.name)
            .map_or(message_span, |(_, span)| *span);
        match (entry.ty.kind(), &mut entry.default) {
            (Some(kind), Some(default)) => match default.convert(kind) {
                Some(converted) => *default = converted,
                None => return Err(ErrorKind::TypeMismatch.at(span)),
            },
            (None, Some(_)) => return Err(ErrorKind::TypeMismatch.at(span)),
            _ => {}
        }
    }
    Ok(())
}
