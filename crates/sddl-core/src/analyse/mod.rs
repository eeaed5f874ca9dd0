// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Semantic analysis for parsed schema files.
//!
//! Each file runs through the collectors in a fixed order — constants,
//! messages, typedefs, rpcs — with results promoted into the shared
//! [`Compilation`] tables as each collector finishes. Later files see
//! everything earlier files promoted; forward references within a file
//! are resolved by the collectors themselves.

pub mod eval;
pub mod value;

mod constants;
mod graph;
mod messages;
mod rpcs;
mod typedefs;

use crate::ast::Schema;
use crate::error::SourceResult;
use crate::model::Compilation;

/// Runs all collector phases for one parsed file, promoting its
/// definitions into `tables`.
///
/// # Errors
///
/// Returns the first semantic error in the file: conflicts, unresolved
/// or circular references, or type mismatches.
pub fn analyse(schema: &Schema, tables: &mut Compilation) -> SourceResult<()> {
    let locals = constants::collect(schema, tables)?;
    messages::collect(schema, tables, &locals)?;
    typedefs::collect(schema, tables)?;
    rpcs::collect(schema, tables)?;
    Ok(())
}
