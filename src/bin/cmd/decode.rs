// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Decode command - decode a hex-encoded SDF byte stream.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::common::{format_bytes, load_options, parse_hex, Result};
use sdfcodec::SdfCodec;

/// Decode every value in a byte stream.
#[derive(Args, Clone, Debug)]
pub struct DecodeCmd {
    /// Hex-encoded bytes, optionally prefixed with 0x
    #[arg(value_name = "HEX")]
    input: String,

    /// Session file with cache tables (TOML)
    #[arg(short, long, value_name = "FILE")]
    session: Option<PathBuf>,

    /// Output as JSON
    #[arg(short, long)]
    json: bool,
}

#[derive(Serialize)]
struct DecodedEntry {
    offset: usize,
    length: usize,
    value: serde_json::Value,
}

impl DecodeCmd {
    pub fn run(self) -> Result<()> {
        let bytes = parse_hex(&self.input)?;
        let options = load_options(self.session.as_deref())?;
        let codec = SdfCodec::new(options);
        let values = codec.decode_all(&bytes)?;

        if self.json {
            let mut offset = 0;
            let entries: Vec<DecodedEntry> = values
                .iter()
                .map(|(value, length)| {
                    let entry = DecodedEntry {
                        offset,
                        length: *length,
                        value: value.to_json(),
                    };
                    offset += length;
                    entry
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
            return Ok(());
        }

        let mut offset = 0;
        for (value, length) in &values {
            println!(
                "[{offset}..{}] {value}    ({})",
                offset + length,
                format_bytes(&bytes[offset..offset + length], 16)
            );
            offset += length;
        }
        println!();
        println!("{} values, {} bytes", values.len(), bytes.len());
        Ok(())
    }
}
