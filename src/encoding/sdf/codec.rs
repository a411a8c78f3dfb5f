// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Session codec pairing a registry with one connection's options.

use tracing::debug;

use super::cache::Options;
use super::decoder::SdfDecoder;
use super::encoder::SdfEncoder;
use crate::core::registry::{global_registry, TypeRegistry};
use crate::core::{Result, Value};

/// Encoder and decoder sharing one registry and one set of session tables.
///
/// Stateless apart from the options it holds, so one codec can serve concurrent calls.
pub struct SdfCodec<'r> {
    registry: &'r TypeRegistry,
    options: Options,
}

impl SdfCodec<'static> {
    /// Codec over the process-wide registry.
    pub fn new(options: Options) -> Self {
        Self::with_registry(global_registry(), options)
    }
}

impl<'r> SdfCodec<'r> {
    pub fn with_registry(registry: &'r TypeRegistry, options: Options) -> Self {
        Self { registry, options }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn registry(&self) -> &TypeRegistry {
        self.registry
    }

    /// Append `value` to `sink`.
    pub fn encode_into(&self, value: &Value, sink: &mut Vec<u8>) -> Result<()> {
        SdfEncoder::new(self.registry, &self.options).encode(value, sink)
    }

    /// Encode `value` into a fresh buffer.
    pub fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        let mut sink = Vec::new();
        self.encode_into(value, &mut sink)?;
        Ok(sink)
    }

    /// Decode one value from the front of `data`.
    pub fn decode(&self, data: &[u8]) -> Result<(Value, usize)> {
        SdfDecoder::new(self.registry, &self.options).decode(data)
    }

    /// Decode consecutive values until `data` is exhausted.
    ///
    /// Each entry pairs a value with the number of bytes it occupied.
    pub fn decode_all(&self, data: &[u8]) -> Result<Vec<(Value, usize)>> {
        let decoder = SdfDecoder::new(self.registry, &self.options);
        let mut values = Vec::new();
        let mut offset = 0;
        while offset < data.len() {
            let (value, used) = decoder.decode(&data[offset..])?;
            offset += used;
            values.push((value, used));
        }
        debug!(values = values.len(), bytes = offset, "decoded stream");
        Ok(values)
    }
}
