// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The rpc collector.
//!
//! Mirrors the typedef collector: one pass per block, same-file blocks
//! merge, place and name uniqueness per block, `delete` tombstones drop
//! the call while keeping its place claimed. The request and response
//! types of a call are recorded nominally; no cross-reference analysis
//! is performed.

use std::collections::{BTreeMap, HashSet};

use ecow::EcoString;

use crate::ast::{CallTarget, Item, RpcDef, Schema, TypeName, TypeRef};
use crate::error::{ErrorKind, SourceResult};
use crate::model::{Call, Compilation, FieldType, Rpc};

/// Collects every `rpc` block of one file into the public table.
///
/// # Errors
///
/// Fails on redefinitions and on place or name conflicts within a block.
pub fn collect(schema: &Schema, tables: &mut Compilation) -> SourceResult<()> {
    let mut building: BTreeMap<EcoString, Build> = BTreeMap::new();
    for item in &schema.items {
        if let Item::Rpc(def) = item {
            enter(def, tables, &mut building)?;
        }
    }
    for (name, build) in building {
        tables.rpcs.insert(
            name.clone(),
            Rpc {
                name,
                calls: build.calls,
            },
        );
    }
    Ok(())
}

/// An rpc under construction within the current file.
#[derive(Default)]
struct Build {
    places: HashSet<u32>,
    names: HashSet<EcoString>,
    calls: Vec<Call>,
}

fn enter(
    def: &RpcDef,
    tables: &Compilation,
    building: &mut BTreeMap<EcoString, Build>,
) -> SourceResult<()> {
    let name = &def.name.name;
    if tables.rpcs.contains_key(name) {
        return Err(ErrorKind::Redefined {
            category: "rpc",
            name: name.clone(),
        }
        .at(def.name.span));
    }
    let build = building.entry(name.clone()).or_default();

    for call in &def.calls {
        if !build.places.insert(call.place.value) {
            return Err(ErrorKind::PlaceConflict {
                place: call.place.value,
            }
            .at(call.place.span));
        }
        let CallTarget::Signature { request, response } = &call.target else {
            continue;
        };
        if !build.names.insert(call.name.name.clone()) {
            return Err(ErrorKind::NameConflict {
                name: call.name.name.clone(),
            }
            .at(call.name.span));
        }
        build.calls.push(Call {
            name: call.name.name.clone(),
            place: call.place.value,
            request: request.as_ref().map(payload_type),
            response: response.as_ref().map(payload_type),
        });
    }
    Ok(())
}

fn payload_type(ty: &TypeRef) -> FieldType {
    match &ty.name {
        TypeName::Boolean => FieldType::Bool,
        TypeName::Integer => FieldType::Int,
        TypeName::Number => FieldType::Float,
        TypeName::String => FieldType::String,
        TypeName::Named(target) => FieldType::Other(target.clone()),
    }
}
