// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Markdown documentation back-end.
//!
//! Renders the compiled tables as a schema reference page: one table of
//! constants, then a section per message, typedef, and rpc. UTF-8, `\n`
//! newlines. The emission driver already delivers everything in its
//! deterministic order, so the output is stable across runs.

use std::io::{self, Write};

use crate::model::{Alias, AliasType, Call, Entry, EntryOption, FieldType, Value};

use super::Target;

/// Which part of the page is currently being written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Constants,
    Messages,
    Typedefs,
    Rpcs,
}

impl Section {
    const fn heading(self) -> &'static str {
        match self {
            Self::Constants => "## Constants",
            Self::Messages => "## Messages",
            Self::Typedefs => "## Typedefs",
            Self::Rpcs => "## RPC",
        }
    }
}

/// The Markdown documentation target.
pub struct MarkdownTarget {
    namespace: String,
    section: Option<Section>,
}

impl MarkdownTarget {
    /// Creates a target titling the page with `namespace`.
    #[must_use]
    pub fn new(namespace: &str) -> Self {
        Self {
            namespace: namespace.to_owned(),
            section: None,
        }
    }

    /// Writes the section heading (and the constants table header) the
    /// first time a callback of that section arrives.
    fn section(&mut self, out: &mut dyn Write, section: Section) -> io::Result<()> {
        if self.section == Some(section) {
            return Ok(());
        }
        self.section = Some(section);
        writeln!(out, "{}", section.heading())?;
        writeln!(out)?;
        if section == Section::Constants {
            writeln!(out, "| Name | Kind | Value |")?;
            writeln!(out, "|---|---|---|")?;
        }
        Ok(())
    }

    fn constant_row(
        &mut self,
        out: &mut dyn Write,
        name: &str,
        kind: &str,
        value: &str,
    ) -> io::Result<()> {
        self.section(out, Section::Constants)?;
        writeln!(out, "| {name} | {kind} | {value} |")
    }
}

impl Target for MarkdownTarget {
    fn encoding(&self) -> &'static str {
        "UTF-8"
    }

    fn newline(&self) -> &'static str {
        "\n"
    }

    fn prepare(&mut self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "# {}", self.namespace)?;
        writeln!(out)
    }

    fn value_bool(&mut self, out: &mut dyn Write, name: &str, value: bool) -> io::Result<()> {
        self.constant_row(out, name, "boolean", &value.to_string())
    }

    fn value_int(&mut self, out: &mut dyn Write, name: &str, value: i32) -> io::Result<()> {
        self.constant_row(out, name, "integer", &value.to_string())
    }

    fn value_float(&mut self, out: &mut dyn Write, name: &str, value: f64) -> io::Result<()> {
        self.constant_row(out, name, "number", &value.to_string())
    }

    fn value_string(&mut self, out: &mut dyn Write, name: &str, value: &str) -> io::Result<()> {
        self.constant_row(out, name, "string", &format!("\"{value}\""))
    }

    fn message(&mut self, out: &mut dyn Write, name: &str, entries: &[Entry]) -> io::Result<()> {
        self.section(out, Section::Messages)?;
        writeln!(out, "### {name}")?;
        writeln!(out)?;
        writeln!(out, "| Place | Field | Type | Carriage | Default |")?;
        writeln!(out, "|---|---|---|---|---|")?;
        for entry in entries {
            writeln!(
                out,
                "| @{} | {} | {} | {} | {} |",
                entry.place,
                entry.name,
                field_type(&entry.ty),
                carriage(entry.option),
                entry.default.as_ref().map_or_else(String::new, render_value),
            )?;
        }
        writeln!(out)
    }

    fn typedef(&mut self, out: &mut dyn Write, name: &str, aliases: &[Alias]) -> io::Result<()> {
        self.section(out, Section::Typedefs)?;
        writeln!(out, "### {name}")?;
        writeln!(out)?;
        writeln!(out, "| Alias | Place | Type |")?;
        writeln!(out, "|---|---|---|")?;
        for alias in aliases {
            writeln!(
                out,
                "| {} | @{} | {} |",
                alias.name,
                alias.place,
                alias_type(&alias.ty)
            )?;
        }
        writeln!(out)
    }

    fn rpc(&mut self, out: &mut dyn Write, name: &str, calls: &[Call]) -> io::Result<()> {
        self.section(out, Section::Rpcs)?;
        writeln!(out, "### {name}")?;
        writeln!(out)?;
        writeln!(out, "| Call | Place | Request | Response |")?;
        writeln!(out, "|---|---|---|---|")?;
        for call in calls {
            writeln!(
                out,
                "| {} | @{} | {} | {} |",
                call.name,
                call.place,
                call.request.as_ref().map_or("-", |ty| field_type(ty)),
                call.response.as_ref().map_or("-", |ty| field_type(ty)),
            )?;
        }
        writeln!(out)
    }

    fn flush(&mut self, _out: &mut dyn Write) -> io::Result<()> {
        Ok(())
    }
}

fn field_type(ty: &FieldType) -> &str {
    match ty {
        FieldType::Bool => "boolean",
        FieldType::Int => "integer",
        FieldType::Float => "number",
        FieldType::String => "string",
        FieldType::Other(name) => name.as_str(),
    }
}

fn alias_type(ty: &AliasType) -> &str {
    match ty {
        AliasType::Bool => "boolean",
        AliasType::Int => "integer",
        AliasType::Float => "number",
        AliasType::String => "string",
        AliasType::Other(name) => name.as_str(),
        AliasType::Null => "null",
    }
}

const fn carriage(option: EntryOption) -> &'static str {
    match option {
        EntryOption::Require => "require",
        EntryOption::Option => "option",
        EntryOption::Array => "array",
        EntryOption::Table => "table",
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::String(s) => format!("\"{s}\""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::emit;
    use crate::model::{Compilation, Message};

    fn page(compilation: &Compilation) -> String {
        let mut target = MarkdownTarget::new("demo");
        let mut sink = Vec::new();
        emit(compilation, &mut target, &mut sink).unwrap();
        String::from_utf8(sink).unwrap()
    }

    #[test]
    fn renders_title_and_constant_table() {
        let mut compilation = Compilation::new();
        compilation.constants.insert("N".into(), Value::Int(14));
        compilation
            .constants
            .insert("Greeting".into(), Value::String("hi".into()));

        let out = page(&compilation);
        assert!(out.starts_with("# demo\n"));
        assert!(out.contains("## Constants"));
        assert!(out.contains("| Greeting | string | \"hi\" |"));
        assert!(out.contains("| N | integer | 14 |"));
    }

    #[test]
    fn renders_message_entries_with_defaults() {
        let mut compilation = Compilation::new();
        compilation.messages.insert(
            "Pos".into(),
            Message {
                name: "Pos".into(),
                entries: vec![Entry {
                    name: "x".into(),
                    place: 1,
                    ty: FieldType::Int,
                    option: EntryOption::Require,
                    default: Some(Value::Int(0)),
                }],
            },
        );

        let out = page(&compilation);
        assert!(out.contains("### Pos"));
        assert!(out.contains("| @1 | x | integer | require | 0 |"));
    }

    #[test]
    fn section_headings_appear_once() {
        let mut compilation = Compilation::new();
        compilation.constants.insert("A".into(), Value::Int(1));
        compilation.constants.insert("B".into(), Value::Int(2));

        let out = page(&compilation);
        assert_eq!(out.matches("## Constants").count(), 1);
    }

    #[test]
    fn declares_utf8_and_unix_newlines() {
        let target = MarkdownTarget::new("x");
        assert_eq!(target.encoding(), "UTF-8");
        assert_eq!(target.newline(), "\n");
    }
}
