// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # sdfcodec CLI
//!
//! Inspect SDF byte streams and the process-wide type registry.
//!
//! ## Usage
//!
//! ```sh
//! # Decode a hex stream
//! sdfcodec decode 91019101
//!
//! # Decode with session caches, printing JSON
//! sdfcodec decode --session session.toml --json 8c012c
//!
//! # List registered types and error messages
//! sdfcodec types --filter handshake
//! sdfcodec errors
//!
//! # Show the shape of a registered type
//! sdfcodec show '#github.com/sllt/sparrow/gen/Version'
//! ```

mod cmd;
mod common;

use std::process;

use clap::{Parser, Subcommand};
use cmd::{DecodeCmd, ErrorsCmd, ShowCmd, TypesCmd};
use common::Result;

/// sdfcodec - SDF wire format toolkit
///
/// Decode SDF byte streams and inspect the framework type registry.
#[derive(Parser, Clone)]
#[command(name = "sdfcodec")]
#[command(about = "SDF wire format toolkit", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "ArcheBase")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Clone)]
enum Commands {
    /// Decode every value in a hex-encoded byte stream
    Decode(DecodeCmd),

    /// List registered type names
    Types(TypesCmd),

    /// List registered error messages
    Errors(ErrorsCmd),

    /// Show the shape of a registered type
    Show(ShowCmd),
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Decode(cmd) => cmd.run(),
        Commands::Types(cmd) => cmd.run(),
        Commands::Errors(cmd) => cmd.run(),
        Commands::Show(cmd) => cmd.run(),
    }
}

fn main() {
    let result = run();

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
