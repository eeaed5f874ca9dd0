// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! SDDL compiler command-line interface.
//!
//! This is the main entry point for the `sddl` command: compile one or
//! more schema files and write a single artifact through the chosen
//! back-end. Exit status is zero on success; any failure prints one
//! diagnostic to stderr and exits non-zero.

use std::fs;

use camino::Utf8PathBuf;
use clap::Parser;
use miette::{Context, IntoDiagnostic, Result};
use tracing::{debug, info};

use sddl_core::codegen::{emit, resolve_target, TARGET_NAMES};
use sddl_core::compile;

/// SDDL: a schema definition and description language compiler
#[derive(Debug, Parser)]
#[command(name = "sddl")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Schema files to compile
    #[arg(required = true)]
    inputs: Vec<Utf8PathBuf>,

    /// Path of the artifact to write
    #[arg(short, long)]
    output: Utf8PathBuf,

    /// Back-end target that renders the artifact
    #[arg(short, long)]
    target: String,

    /// Namespace handed to the back-end (default: the output file's stem)
    #[arg(short, long)]
    namespace: Option<String>,
}

fn main() -> Result<()> {
    // Initialize tracing subscriber only if RUST_LOG is explicitly set,
    // so normal runs keep stderr clean for the single diagnostic line.
    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .try_init();
    }

    // Install miette's fancy error handler
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok();

    run(&Cli::parse())
}

fn run(cli: &Cli) -> Result<()> {
    let namespace = cli
        .namespace
        .clone()
        .or_else(|| cli.output.file_stem().map(str::to_owned))
        .unwrap_or_else(|| "schema".to_owned());

    let mut target = resolve_target(&cli.target, &namespace).ok_or_else(|| {
        miette::miette!(
            "unknown target '{}'; known targets: {}",
            cli.target,
            TARGET_NAMES.join(", ")
        )
    })?;
    debug!(target = %cli.target, namespace = %namespace, "resolved back-end");

    let tables = compile(&cli.inputs)?;

    // Emit into a buffer so a failed run leaves no partial artifact.
    let mut buffer = Vec::new();
    emit(&tables, target.as_mut(), &mut buffer)
        .into_diagnostic()
        .wrap_err("emission failed")?;
    fs::write(&cli.output, &buffer)
        .into_diagnostic()
        .wrap_err_with(|| format!("cannot write '{}'", cli.output))?;

    info!(
        output = %cli.output,
        bytes = buffer.len(),
        "artifact written"
    );
    Ok(())
}
