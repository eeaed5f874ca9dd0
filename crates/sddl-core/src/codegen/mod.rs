// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Back-end code generation for compiled schemas.
//!
//! A back-end implements [`Target`]; the emission driver [`emit`] feeds it
//! the public tables in a fixed, deterministic sequence. The driver never
//! inspects what a target writes — it only guarantees the order of
//! callbacks:
//!
//! 1. [`Target::prepare`]
//! 2. Constants, lexicographic by name, dispatched on value kind
//! 3. Messages, lexicographic by name, entries already place-sorted
//! 4. Typedefs, lexicographic by name, aliases sorted by name
//! 5. Rpcs, lexicographic by name, calls sorted by name
//! 6. [`Target::flush`]
//!
//! Shipped back-ends:
//! - **`markdown`**: a schema reference page in Markdown

pub mod markdown;

use std::io::{self, Write};

use tracing::debug;

use crate::model::{Alias, Call, Compilation, Entry, Typedef, Value};

/// A code generation back-end.
///
/// All operations write through the provided sink; a target should hold
/// only formatting state of its own.
pub trait Target {
    /// The character encoding this target writes, e.g. `"UTF-8"`.
    fn encoding(&self) -> &'static str;

    /// The newline sequence this target writes.
    fn newline(&self) -> &'static str;

    /// Called once before any definition is emitted.
    ///
    /// # Errors
    ///
    /// Propagates sink write failures, as do all other operations.
    fn prepare(&mut self, out: &mut dyn Write) -> io::Result<()>;

    /// Emits a boolean constant.
    fn value_bool(&mut self, out: &mut dyn Write, name: &str, value: bool) -> io::Result<()>;

    /// Emits an integer constant.
    fn value_int(&mut self, out: &mut dyn Write, name: &str, value: i32) -> io::Result<()>;

    /// Emits a float constant.
    fn value_float(&mut self, out: &mut dyn Write, name: &str, value: f64) -> io::Result<()>;

    /// Emits a string constant.
    fn value_string(&mut self, out: &mut dyn Write, name: &str, value: &str) -> io::Result<()>;

    /// Emits a message; entries arrive sorted by place.
    fn message(&mut self, out: &mut dyn Write, name: &str, entries: &[Entry]) -> io::Result<()>;

    /// Emits a typedef; aliases arrive sorted by name.
    fn typedef(&mut self, out: &mut dyn Write, name: &str, aliases: &[Alias]) -> io::Result<()>;

    /// Emits an rpc; calls arrive sorted by name.
    fn rpc(&mut self, out: &mut dyn Write, name: &str, calls: &[Call]) -> io::Result<()>;

    /// Called once after the last definition.
    fn flush(&mut self, out: &mut dyn Write) -> io::Result<()>;
}

/// Names accepted by [`resolve_target`].
pub const TARGET_NAMES: &[&str] = &["markdown"];

/// Instantiates the back-end registered under `name`.
///
/// `namespace` is the logical name of the compiled artifact; targets are
/// free to use it as a title, module name, or similar.
#[must_use]
pub fn resolve_target(name: &str, namespace: &str) -> Option<Box<dyn Target>> {
    match name {
        "markdown" | "md" => Some(Box::new(markdown::MarkdownTarget::new(namespace))),
        _ => None,
    }
}

/// Drives a target over the compiled tables in the guaranteed order.
///
/// # Errors
///
/// Propagates the first sink write failure.
pub fn emit(
    compilation: &Compilation,
    target: &mut dyn Target,
    out: &mut dyn Write,
) -> io::Result<()> {
    target.prepare(out)?;

    for (name, value) in &compilation.constants {
        match value {
            Value::Bool(b) => target.value_bool(out, name, *b)?,
            Value::Int(i) => target.value_int(out, name, *i)?,
            Value::Float(f) => target.value_float(out, name, *f)?,
            Value::String(s) => target.value_string(out, name, s)?,
        }
    }

    for (name, message) in &compilation.messages {
        target.message(out, name, &message.entries)?;
    }

    for (name, typedef) in &compilation.typedefs {
        target.typedef(out, name, &name_sorted_aliases(typedef))?;
    }

    for (name, rpc) in &compilation.rpcs {
        let mut calls = rpc.calls.clone();
        calls.sort_by(|a, b| a.name.cmp(&b.name));
        target.rpc(out, name, &calls)?;
    }

    target.flush(out)?;
    debug!(
        constants = compilation.constants.len(),
        messages = compilation.messages.len(),
        "emission complete"
    );
    Ok(())
}

fn name_sorted_aliases(typedef: &Typedef) -> Vec<Alias> {
    let mut aliases = typedef.aliases.clone();
    aliases.sort_by(|a, b| a.name.cmp(&b.name));
    aliases
}
