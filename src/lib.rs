// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # sdfcodec
//!
//! Self-describing binary codec for actor framework messages.
//!
//! Every encoded value starts with a tag byte. Anonymous composites carry a compact type
//! descriptor; named types are registered once in a process-wide registry and travel by
//! name or by session cache id. Session caches shorten atoms, registered names and error
//! messages to 16-bit ids.
//!
//! ## Architecture
//!
//! - `core/` - Value model, type descriptors, identity types, error taxonomy and registry
//! - `encoding/sdf/` - Wire encoder, decoder, descriptors and session caches
//! - `framework/` - Framework types and error messages registered at startup
//! - `config` - TOML session configuration
//!
//! ## Example
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use sdfcodec::{Options, ScalarKind, Value};
//!
//! let value = Value::slice(ScalarKind::Bool, vec![Value::Bool(false), Value::Bool(true)]);
//! let bytes = sdfcodec::encode(&value, &Options::default())?;
//! let (decoded, used) = sdfcodec::decode(&bytes, &Options::default())?;
//! assert_eq!(decoded, value);
//! assert_eq!(used, bytes.len());
//! # Ok(())
//! # }
//! ```

// Core types
pub mod core;

pub use core::{
    canonical_name, global_registry, Alias, Atom, CustomValue, Event, HookError, Pid,
    ProcessId, Ref, Result, ScalarKind, SdfError, Serializable, Shape, Timestamp,
    TypeDesc, TypeRegistry, Value,
};

// Wire format
pub mod encoding;

pub use encoding::sdf::{AtomMapping, CacheTable, DescriptorCache, SdfCodec};
pub use encoding::{Options, SdfDecoder, SdfEncoder};

// Framework registrations
pub mod framework;

// Session configuration
pub mod config;

pub use config::SessionConfig;

/// Append `value` to `sink` using the global registry.
///
/// On error `sink` is left as it was.
pub fn encode_into(value: &Value, sink: &mut Vec<u8>, options: &Options) -> Result<()> {
    SdfEncoder::new(global_registry(), options).encode(value, sink)
}

/// Encode `value` into a new buffer using the global registry.
pub fn encode(value: &Value, options: &Options) -> Result<Vec<u8>> {
    let mut sink = Vec::new();
    encode_into(value, &mut sink, options)?;
    Ok(sink)
}

/// Decode one value from the front of `data` using the global registry.
///
/// Returns the value and the number of bytes it occupied.
pub fn decode(data: &[u8], options: &Options) -> Result<(Value, usize)> {
    SdfDecoder::new(global_registry(), options).decode(data)
}
