// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Error types for the SDDL compiler.
//!
//! Every error the compiler raises carries a source file and line. Inside
//! the pipeline, errors travel as [`SourceError`] (kind + span); the compile
//! driver attaches the file context to produce a [`CompileError`], which
//! integrates with [`miette`] for rich terminal reporting while its plain
//! `Display` form stays the classic one-line `file:line: message`.

// Spurious warnings from miette derive macro expansion
#![allow(unused_assignments)]

use camino::Utf8PathBuf;
use ecow::EcoString;
use miette::Diagnostic;
use thiserror::Error;

use crate::source_analysis::Span;

/// The category of a compiler error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorKind {
    /// The parser hit a token it did not expect. `expected` is the list of
    /// acceptable token display names, already joined with `" or "`.
    #[error("mismatched input '{found}' expecting {expected}")]
    UnexpectedToken {
        /// Source text of the offending token.
        found: EcoString,
        /// Display names of the tokens that would have been accepted.
        expected: EcoString,
    },

    /// A numeric literal does not fit its 32-bit (integer) or 64-bit
    /// (float) representation.
    #[error("invalid number literal '{text}'")]
    InvalidNumber {
        /// The literal as written.
        text: EcoString,
    },

    /// A string literal was not terminated before end of line or file.
    #[error("unterminated string literal")]
    UnterminatedString,

    /// A character with no meaning in the grammar.
    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),

    /// Redeclaration of a constant, message, typedef, or rpc.
    #[error("{category} '{name}' is already defined")]
    Redefined {
        /// `"constant"`, `"message"`, `"typedef"`, or `"rpc"`.
        category: &'static str,
        /// The redeclared name.
        name: EcoString,
    },

    /// A duplicated field, alias, or call name within one block.
    #[error("name conflict: '{name}'")]
    NameConflict {
        /// The duplicated name.
        name: EcoString,
    },

    /// A duplicated place number within one block.
    #[error("place conflict: '@{place}'")]
    PlaceConflict {
        /// The duplicated place tag.
        place: u32,
    },

    /// A constant referenced by name was never defined.
    #[error("variable '{name}' could not be found")]
    UnresolvedVariable {
        /// The missing constant name.
        name: EcoString,
    },

    /// A message type referenced by name was never defined.
    #[error("type '{name}' could not be found")]
    UnresolvedType {
        /// The missing type name.
        name: EcoString,
    },

    /// A dependency cycle among constants.
    #[error("unable to evaluate expression due to circular reference")]
    CircularConstant,

    /// A dependency cycle among messages.
    #[error("circular reference")]
    CircularMessage,

    /// A declared kind rejected the expression's value.
    #[error("value cannot convert to '{kind}'")]
    Conversion {
        /// Keyword of the declared kind (`integer`, `number`, ...).
        kind: &'static str,
    },

    /// An expression cannot be typed, or a default value mismatches its
    /// entry's declared kind.
    #[error("type mismatch in the expression")]
    TypeMismatch,

    /// Integer division or modulo by zero during constant folding.
    #[error("division by zero")]
    DivisionByZero,

    /// A schema file could not be read.
    #[error("{message}")]
    Io {
        /// Rendered I/O failure, including the offending path.
        message: String,
    },
}

/// An error located within a single source file, before the file context is
/// known. Produced by the lexer, parser, and collectors; upgraded to a
/// [`CompileError`] by the compile driver.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}")]
pub struct SourceError {
    /// The category of error.
    pub kind: ErrorKind,
    /// Where in the file it was detected.
    pub span: Span,
}

impl SourceError {
    /// Creates a new located error.
    #[must_use]
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

impl ErrorKind {
    /// Attaches a span, producing a [`SourceError`].
    #[must_use]
    pub fn at(self, span: Span) -> SourceError {
        SourceError::new(self, span)
    }
}

/// A fully located compiler error: kind, file, line, and source context.
///
/// `Display` renders the one-line `file:line: message` form; the
/// [`miette::Diagnostic`] implementation additionally points an arrow at
/// the offending span when the caller prints the error as a report.
#[derive(Debug, Error, Diagnostic)]
#[error("{path}:{line}: {kind}")]
#[diagnostic(code(sddl::compile))]
pub struct CompileError {
    /// The category of error.
    pub kind: ErrorKind,
    /// Path of the offending file, relative to the process working
    /// directory where possible.
    pub path: Utf8PathBuf,
    /// 1-based source line.
    pub line: u32,
    /// Source text for terminal snippets.
    #[source_code]
    src: miette::NamedSource<String>,
    /// The offending span.
    #[label("here")]
    label: miette::SourceSpan,
}

impl CompileError {
    /// Creates a compile error from a [`SourceError`] plus its file context.
    #[must_use]
    pub fn new(error: SourceError, path: Utf8PathBuf, source: &str) -> Self {
        let line = error.span.line_number(source);
        Self {
            kind: error.kind,
            src: miette::NamedSource::new(path.as_str(), source.to_owned()),
            label: error.span.into(),
            path,
            line,
        }
    }

    /// Creates a compile error with no useful span, for failures that
    /// happen before any source text exists (unreadable input files).
    #[must_use]
    pub fn file_level(kind: ErrorKind, path: Utf8PathBuf) -> Self {
        Self {
            kind,
            src: miette::NamedSource::new(path.as_str(), String::new()),
            label: Span::default().into(),
            path,
            line: 1,
        }
    }
}

/// Result alias used throughout the per-file pipeline.
pub type SourceResult<T> = Result<T, SourceError>;
