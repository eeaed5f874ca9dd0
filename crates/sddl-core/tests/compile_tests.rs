// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! End-to-end compiler tests: real files on disk, through [`compile`] and
//! the emission driver, asserting the exact back-end callback sequences.

use std::fs;
use std::io::{self, Write};

use camino::Utf8PathBuf;
use tempfile::TempDir;

use sddl_core::codegen::{emit, resolve_target, Target};
use sddl_core::compile;
use sddl_core::error::{CompileError, ErrorKind};
use sddl_core::model::{Alias, Call, Compilation, Entry};

/// Records every driver callback as one line of text.
#[derive(Default)]
struct Recorder {
    events: Vec<String>,
}

impl Target for Recorder {
    fn encoding(&self) -> &'static str {
        "UTF-8"
    }
    fn newline(&self) -> &'static str {
        "\n"
    }
    fn prepare(&mut self, _out: &mut dyn Write) -> io::Result<()> {
        self.events.push("prepare".to_owned());
        Ok(())
    }
    fn value_bool(&mut self, _out: &mut dyn Write, name: &str, value: bool) -> io::Result<()> {
        self.events.push(format!("value {name}={value}"));
        Ok(())
    }
    fn value_int(&mut self, _out: &mut dyn Write, name: &str, value: i32) -> io::Result<()> {
        self.events.push(format!("value {name}={value}"));
        Ok(())
    }
    fn value_float(&mut self, _out: &mut dyn Write, name: &str, value: f64) -> io::Result<()> {
        self.events.push(format!("value {name}={value}"));
        Ok(())
    }
    fn value_string(&mut self, _out: &mut dyn Write, name: &str, value: &str) -> io::Result<()> {
        self.events.push(format!("value {name}=\"{value}\""));
        Ok(())
    }
    fn message(&mut self, _out: &mut dyn Write, name: &str, entries: &[Entry]) -> io::Result<()> {
        let fields: Vec<String> = entries
            .iter()
            .map(|e| format!("{}@{}", e.name, e.place))
            .collect();
        self.events.push(format!("message {name}({})", fields.join(" ")));
        Ok(())
    }
    fn typedef(&mut self, _out: &mut dyn Write, name: &str, aliases: &[Alias]) -> io::Result<()> {
        let names: Vec<&str> = aliases.iter().map(|a| a.name.as_str()).collect();
        self.events.push(format!("typedef {name}({})", names.join(" ")));
        Ok(())
    }
    fn rpc(&mut self, _out: &mut dyn Write, name: &str, calls: &[Call]) -> io::Result<()> {
        let names: Vec<&str> = calls.iter().map(|c| c.name.as_str()).collect();
        self.events.push(format!("rpc {name}({})", names.join(" ")));
        Ok(())
    }
    fn flush(&mut self, _out: &mut dyn Write) -> io::Result<()> {
        self.events.push("flush".to_owned());
        Ok(())
    }
}

/// Writes a schema file into the scratch directory.
fn write_schema(dir: &TempDir, name: &str, content: &str) -> Utf8PathBuf {
    let path = Utf8PathBuf::from_path_buf(dir.path().join(name)).expect("utf-8 temp path");
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create schema dir");
    }
    fs::write(&path, content).expect("write schema");
    path
}

/// Compiles a single in-memory schema.
fn compile_one(content: &str) -> Result<Compilation, CompileError> {
    let dir = TempDir::new().expect("temp dir");
    let path = write_schema(&dir, "main.sddl", content);
    compile(&[path])
}

/// Compiles and returns the recorded emission sequence.
fn events_of(content: &str) -> Vec<String> {
    let tables = compile_one(content).expect("schema should compile");
    let mut recorder = Recorder::default();
    let mut sink = Vec::new();
    emit(&tables, &mut recorder, &mut sink).expect("emission should succeed");
    recorder.events
}

#[test]
fn simple_constant_is_emitted_between_prepare_and_flush() {
    assert_eq!(
        events_of("integer N = 2 + 3 * 4;"),
        vec!["prepare", "value N=14", "flush"]
    );
}

#[test]
fn forward_referenced_constants_emit_in_name_order() {
    assert_eq!(
        events_of("auto A = B + 1; integer B = 5;"),
        vec!["prepare", "value A=6", "value B=5", "flush"]
    );
}

#[test]
fn circular_constants_fail_at_the_first_declaration() {
    let err = compile_one("auto A = B;\nauto B = A;").unwrap_err();
    assert_eq!(err.kind, ErrorKind::CircularConstant);
    assert_eq!(err.line, 1);
    assert!(err
        .to_string()
        .ends_with("unable to evaluate expression due to circular reference"));
}

#[test]
fn message_with_forward_type_compiles() {
    assert_eq!(
        events_of("Outer { Inner child @1; }\nInner { integer x @1; }"),
        vec!["prepare", "message Inner(x@1)", "message Outer(child@1)", "flush"]
    );
}

#[test]
fn circular_messages_are_rejected() {
    let err = compile_one("A { B b @1; }\nB { A a @1; }").unwrap_err();
    assert_eq!(err.kind, ErrorKind::CircularMessage);
    assert!(err.to_string().ends_with("circular reference"));
}

#[test]
fn local_constants_never_reach_the_back_end() {
    assert_eq!(
        events_of("local integer Hidden = 7; integer Visible = Hidden + 1;"),
        vec!["prepare", "value Visible=8", "flush"]
    );
}

#[test]
fn deleted_typedef_aliases_are_absent_and_name_sorted() {
    assert_eq!(
        events_of("T [ c @3 = string; a @1 = integer; b @2 = delete; ]"),
        vec!["prepare", "typedef T(a c)", "flush"]
    );
}

#[test]
fn exponent_chain_folds_right_to_left() {
    assert_eq!(
        events_of("integer P = 2 ^ 3 ^ 2;"),
        vec!["prepare", "value P=512", "flush"]
    );
}

#[test]
fn near_integer_floats_convert_and_halves_do_not() {
    let tables = compile_one("integer A = 1.00000000000000001;").unwrap();
    assert_eq!(
        tables.constants.get("A"),
        Some(&sddl_core::model::Value::Int(1))
    );

    let err = compile_one("integer B = 1.5;").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conversion { kind: "integer" });
}

#[test]
fn empty_require_block_is_legal() {
    assert_eq!(events_of("require { }"), vec!["prepare", "flush"]);
}

#[test]
fn required_files_are_loaded_before_the_requiring_file() {
    let dir = TempDir::new().unwrap();
    write_schema(&dir, "limits.sddl", "integer Max = 100;");
    let main = write_schema(
        &dir,
        "main.sddl",
        "require { \"limits.sddl\" }\nauto Half = Max / 2;",
    );

    let tables = compile(&[main]).unwrap();
    assert_eq!(
        tables.constants.get("Half"),
        Some(&sddl_core::model::Value::Int(50))
    );
}

#[test]
fn requires_resolve_relative_to_the_requiring_file() {
    let dir = TempDir::new().unwrap();
    write_schema(&dir, "shared/types.sddl", "Point { integer x @1; }");
    write_schema(
        &dir,
        "shared/api.sddl",
        "require { \"types.sddl\" }\nPath { Point start @1; }",
    );
    let main = write_schema(&dir, "main.sddl", "require { \"shared/api.sddl\" }");

    let tables = compile(&[main]).unwrap();
    assert!(tables.messages.contains_key("Point"));
    assert!(tables.messages.contains_key("Path"));
}

#[test]
fn diamond_requires_load_each_file_once() {
    // If shared.sddl were parsed twice, its constant would collide with
    // itself and the compile would fail.
    let dir = TempDir::new().unwrap();
    write_schema(&dir, "shared.sddl", "integer S = 1;");
    write_schema(&dir, "a.sddl", "require { \"shared.sddl\" }\nauto A = S + 1;");
    write_schema(&dir, "b.sddl", "require { \"shared.sddl\" }\nauto B = S + 2;");
    let main = write_schema(
        &dir,
        "main.sddl",
        "require { \"a.sddl\" \"b.sddl\" }\nauto M = A + B;",
    );

    let tables = compile(&[main]).unwrap();
    assert_eq!(
        tables.constants.get("M"),
        Some(&sddl_core::model::Value::Int(5))
    );
}

#[test]
fn missing_required_file_reports_the_requiring_line() {
    let dir = TempDir::new().unwrap();
    let main = write_schema(&dir, "main.sddl", "require {\n\"gone.sddl\"\n}");

    let err = compile(&[main]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Io { .. }));
    assert_eq!(err.line, 2);
    assert!(err.to_string().contains("gone.sddl"));
}

#[test]
fn duplicate_names_across_files_are_rejected() {
    let dir = TempDir::new().unwrap();
    write_schema(&dir, "first.sddl", "integer N = 1;");
    let main = write_schema(&dir, "main.sddl", "require { \"first.sddl\" }\ninteger N = 2;");

    let err = compile(&[main]).unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::Redefined {
            category: "constant",
            name: "N".into()
        }
    );
    assert_eq!(err.line, 2);
}

#[test]
fn inputs_listed_on_the_command_line_share_one_table_set() {
    let dir = TempDir::new().unwrap();
    let first = write_schema(&dir, "first.sddl", "integer A = 1;");
    let second = write_schema(&dir, "second.sddl", "auto B = A + 1;");

    let tables = compile(&[first, second]).unwrap();
    assert_eq!(
        tables.constants.get("B"),
        Some(&sddl_core::model::Value::Int(2))
    );
}

#[test]
fn parse_errors_carry_expected_token_lists() {
    let err = compile_one("integer = 1;").unwrap_err();
    let ErrorKind::UnexpectedToken { found, expected } = err.kind else {
        panic!("expected a parse diagnostic");
    };
    assert_eq!(found, "=");
    assert_eq!(expected, "NAME");
    assert_eq!(err.line, 1);
}

#[test]
fn compiling_twice_yields_identical_emission_sequences() {
    let source = "auto A = 2 ^ 5;\nPos { integer x @2; integer y @1; }\nT [ b @2 = null; a @1 = integer ]\nNav ( go @1 = Pos -> Pos )";
    assert_eq!(events_of(source), events_of(source));
}

#[test]
fn full_schema_emits_every_category_in_order() {
    let events = events_of(
        "integer Max = 64;\n\
         string Name = 'nav';\n\
         Position { integer x @1; integer y @2; }\n\
         Handles [ h @1 = integer ]\n\
         Navigation ( position @1 = -> Position )",
    );
    assert_eq!(
        events,
        vec![
            "prepare",
            "value Max=64",
            "value Name=\"nav\"",
            "message Position(x@1 y@2)",
            "typedef Handles(h)",
            "rpc Navigation(position)",
            "flush",
        ]
    );
}

#[test]
fn markdown_target_renders_a_reference_page() {
    let tables = compile_one(
        "integer Max = 64;\nPosition { integer x @1; integer y @2 = Max; }",
    )
    .unwrap();
    let mut target = resolve_target("markdown", "navigation").expect("markdown target exists");
    let mut sink = Vec::new();
    emit(&tables, target.as_mut(), &mut sink).unwrap();
    let page = String::from_utf8(sink).unwrap();

    assert!(page.starts_with("# navigation\n"));
    assert!(page.contains("| Max | integer | 64 |"));
    assert!(page.contains("### Position"));
    assert!(page.contains("| @2 | y | integer | require | 64 |"));
}

#[test]
fn unknown_targets_are_not_resolved() {
    assert!(resolve_target("cobol", "x").is_none());
}
