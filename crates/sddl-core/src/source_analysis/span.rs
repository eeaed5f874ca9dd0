// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Source spans for diagnostics.
//!
//! The compiler reports at most one diagnostic per run, and that
//! diagnostic needs the same position rendered two ways: the one-line
//! `file:line` prefix and a miette label pointing into the source
//! snippet. A `Span` is the raw byte range that both renderings are
//! derived from; it travels from the lexer through the syntax tree to
//! whichever collector finally fails.

use std::ops::Range;

/// A half-open byte range in one schema file.
///
/// Spans are plain data with public fields; nothing about them is
/// validated until a diagnostic renders one against its source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// First byte of the spanned text.
    pub start: u32,
    /// One past the last byte.
    pub end: u32,
}

impl Span {
    /// Creates a span from start and end byte offsets.
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Widens this span to also cover `other`.
    ///
    /// Used by the parser to give a syntax node the extent of its first
    /// and last tokens, e.g. an expression spanning both operands.
    #[must_use]
    pub fn cover(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// The span as a `Range<usize>` for slicing source text.
    #[must_use]
    pub const fn as_range(self) -> Range<usize> {
        self.start as usize..self.end as usize
    }

    /// The 1-based line number of the span's start within `source`, for
    /// the `file:line` diagnostic prefix.
    ///
    /// Offsets past the end of `source` report the last line, so
    /// diagnostics at end-of-input still point somewhere sensible.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "source files over 4GB are not supported"
    )]
    pub fn line_number(self, source: &str) -> u32 {
        let end = (self.start as usize).min(source.len());
        source[..end].bytes().filter(|&b| b == b'\n').count() as u32 + 1
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        (span.start as usize, (span.end - span.start) as usize).into()
    }
}
