// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The batch compile driver.
//!
//! Files are processed depth-first: parsing a file immediately loads and
//! fully processes everything its `require` block names, so by the time a
//! file's own definitions are analysed, its dependencies are already in
//! the public tables. Each canonical path is processed at most once, no
//! matter how many files require it.
//!
//! Require paths resolve relative to the requiring file's directory; the
//! directory is carried here explicitly rather than through the process
//! working directory. Diagnostics render paths relative to the working
//! directory the compiler started in.

use std::collections::HashSet;
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, info};

use crate::analyse;
use crate::error::{CompileError, ErrorKind};
use crate::model::Compilation;
use crate::source_analysis::{parse, Span};

/// Compiles a list of schema files into one set of public tables.
///
/// Inputs are processed in order; `require`-induced loads are spliced in
/// depth-first at the point of first mention.
///
/// # Errors
///
/// Returns the first error of any phase, located with file and line. No
/// tables are returned on failure.
pub fn compile(inputs: &[Utf8PathBuf]) -> Result<Compilation, CompileError> {
    let mut driver = Driver::new();
    for input in inputs {
        driver.load(input, None)?;
    }
    info!(
        constants = driver.tables.constants.len(),
        messages = driver.tables.messages.len(),
        typedefs = driver.tables.typedefs.len(),
        rpcs = driver.tables.rpcs.len(),
        "compiled schema set"
    );
    Ok(driver.tables)
}

/// Context identifying the `require` string that caused a load, for
/// attributing I/O failures to the requiring site.
struct RequiredFrom<'a> {
    path: &'a Utf8Path,
    source: &'a str,
    span: Span,
}

struct Driver {
    tables: Compilation,
    /// Canonical paths already processed.
    seen: HashSet<Utf8PathBuf>,
    /// The working directory diagnostics are rendered relative to.
    base: Option<Utf8PathBuf>,
}

impl Driver {
    fn new() -> Self {
        let base = std::env::current_dir()
            .ok()
            .and_then(|dir| Utf8PathBuf::from_path_buf(dir).ok());
        Self {
            tables: Compilation::new(),
            seen: HashSet::new(),
            base,
        }
    }

    /// Loads, parses, and analyses one file and (first) its requires.
    fn load(&mut self, path: &Utf8Path, origin: Option<&RequiredFrom<'_>>) -> Result<(), CompileError> {
        let canonical = match path.canonicalize_utf8() {
            Ok(canonical) => canonical,
            Err(err) => return Err(self.io_error(path, &err, origin)),
        };
        if !self.seen.insert(canonical.clone()) {
            return Ok(());
        }

        let source = match fs::read_to_string(&canonical) {
            Ok(source) => source,
            Err(err) => return Err(self.io_error(path, &err, origin)),
        };
        let display_path = self.display_path(&canonical);

        let schema = parse(&source)
            .map_err(|err| CompileError::new(err, display_path.clone(), &source))?;
        debug!(file = %display_path, items = schema.items.len(), "parsed schema");

        // Dependencies first, spliced in at the point of first mention.
        let dir = canonical.parent().unwrap_or_else(|| Utf8Path::new("."));
        for require in &schema.requires {
            let resolved = resolve_require(dir, &require.path);
            let origin = RequiredFrom {
                path: &display_path,
                source: &source,
                span: require.span,
            };
            self.load(&resolved, Some(&origin))?;
        }

        analyse::analyse(&schema, &mut self.tables)
            .map_err(|err| CompileError::new(err, display_path, &source))?;
        Ok(())
    }

    /// Builds the diagnostic for an unreadable file, attributed to the
    /// `require` string when there is one.
    fn io_error(
        &self,
        path: &Utf8Path,
        err: &std::io::Error,
        origin: Option<&RequiredFrom<'_>>,
    ) -> CompileError {
        let kind = ErrorKind::Io {
            message: format!("cannot open '{path}': {err}"),
        };
        match origin {
            Some(from) => CompileError::new(kind.at(from.span), from.path.to_owned(), from.source),
            None => CompileError::file_level(kind, self.display_path(path)),
        }
    }

    /// Renders a path relative to the starting working directory where
    /// possible.
    fn display_path(&self, path: &Utf8Path) -> Utf8PathBuf {
        self.base
            .as_deref()
            .and_then(|base| path.strip_prefix(base).ok())
            .unwrap_or(path)
            .to_owned()
    }
}

/// Resolves a `require` string against the requiring file's directory,
/// normalizing foreign path separators.
fn resolve_require(dir: &Utf8Path, path: &str) -> Utf8PathBuf {
    let sep = std::path::MAIN_SEPARATOR;
    let normalized: String = path
        .chars()
        .map(|c| if c == '/' || c == '\\' { sep } else { c })
        .collect();
    dir.join(normalized)
}
