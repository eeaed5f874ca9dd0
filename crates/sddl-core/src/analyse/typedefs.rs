// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The typedef collector.
//!
//! Typedefs carry no dependency analysis: aliases reference types by name
//! only, so each block resolves in one pass. Blocks with the same name
//! within a file merge into one descriptor; a name already promoted by an
//! earlier file is a redefinition.
//!
//! `delete`-marked aliases are parsed and their place recorded (so the
//! place cannot be reused), but they claim no name and are not emitted.

use std::collections::{BTreeMap, HashSet};

use ecow::EcoString;

use crate::ast::{AliasTarget, Item, Schema, TypeName, TypedefDef};
use crate::error::{ErrorKind, SourceResult};
use crate::model::{Alias, AliasType, Compilation, Typedef};

/// Collects every `typedef` block of one file into the public table.
///
/// # Errors
///
/// Fails on redefinitions and on place or name conflicts within a block.
pub fn collect(schema: &Schema, tables: &mut Compilation) -> SourceResult<()> {
    let mut building: BTreeMap<EcoString, Build> = BTreeMap::new();
    for item in &schema.items {
        if let Item::Typedef(def) = item {
            enter(def, tables, &mut building)?;
        }
    }
    for (name, build) in building {
        tables.typedefs.insert(
            name.clone(),
            Typedef {
                name,
                aliases: build.aliases,
            },
        );
    }
    Ok(())
}

/// A typedef under construction within the current file.
#[derive(Default)]
struct Build {
    places: HashSet<u32>,
    names: HashSet<EcoString>,
    aliases: Vec<Alias>,
}

fn enter(
    def: &TypedefDef,
    tables: &Compilation,
    building: &mut BTreeMap<EcoString, Build>,
) -> SourceResult<()> {
    let name = &def.name.name;
    if tables.typedefs.contains_key(name) {
        return Err(ErrorKind::Redefined {
            category: "typedef",
            name: name.clone(),
        }
        .at(def.name.span));
    }
    let build = building.entry(name.clone()).or_default();

    for alias in &def.aliases {
        if !build.places.insert(alias.place.value) {
            return Err(ErrorKind::PlaceConflict {
                place: alias.place.value,
            }
            .at(alias.place.span));
        }
        let ty = match &alias.target {
            AliasTarget::Delete(_) => continue,
            AliasTarget::Null(_) => AliasType::Null,
            AliasTarget::Type(ty) => match &ty.name {
                TypeName::Boolean => AliasType::Bool,
                TypeName::Integer => AliasType::Int,
                TypeName::Number => AliasType::Float,
                TypeName::String => AliasType::String,
                TypeName::Named(target) => AliasType::Other(target.clone()),
            },
        };
        if !build.names.insert(alias.name.name.clone()) {
            return Err(ErrorKind::NameConflict {
                name: alias.name.name.clone(),
            }
            .at(alias.name.span));
        }
        build.aliases.push(Alias {
            name: alias.name.name.clone(),
            place: alias.place.value,
            ty,
        });
    }
    Ok(())
}
