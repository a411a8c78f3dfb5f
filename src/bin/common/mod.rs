// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for CLI commands.

use std::path::Path;

use sdfcodec::{Options, SessionConfig};

pub use anyhow::Result as CliResult;
pub type Result<T = ()> = CliResult<T>;

/// Parse a hex string into bytes.
///
/// Accepts an optional `0x` prefix and ignores whitespace, `:` and `,` separators.
pub fn parse_hex(s: &str) -> CliResult<Vec<u8>> {
    let trimmed = s.trim();
    let body = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let digits: String = body
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':' && *c != ',')
        .collect();

    if digits.is_empty() {
        return Err(anyhow::anyhow!("No input bytes"));
    }
    hex::decode(&digits).map_err(|e| anyhow::anyhow!("Invalid hex input: {e}"))
}

/// Codec options for a session file, or defaults when none is given.
pub fn load_options(session: Option<&Path>) -> CliResult<Options> {
    match session {
        Some(path) => Ok(SessionConfig::load(path)?.to_options()?),
        None => Ok(Options::default()),
    }
}

/// Hex preview of `bytes`, truncated after `limit` bytes.
pub fn format_bytes(bytes: &[u8], limit: usize) -> String {
    if bytes.len() <= limit {
        hex::encode(bytes)
    } else {
        format!("{}.. ({} bytes)", hex::encode(&bytes[..limit]), bytes.len())
    }
}
