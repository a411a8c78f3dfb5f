// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Serialized form of [`TypeDesc`].
//!
//! ```text
//! scalar      := <scalar tag>
//! any         := Any
//! slice       := Slice <desc>
//! array       := Array <len u32> <desc>
//! map         := Map <key desc> <value desc>
//! registered  := Reg <id-or-inline name>
//! ```
//!
//! A typeless composite is written as `Type`, the descriptor length as u16, then the
//! descriptor bytes.

use std::sync::Arc;

use byteorder::{BigEndian, WriteBytesExt};
use tracing::trace;

use super::cache::{read_id_or_inline, write_id_or_inline, Options};
use super::cursor::SdfCursor;
use crate::core::registry::TypeRegistry;
use crate::core::tags;
use crate::core::{Result, ScalarKind, SdfError, TypeDesc};

/// Append the descriptor grammar for `desc`.
///
/// A slice of `uint8` is written as `binary`.
pub fn write_descriptor(desc: &TypeDesc, sink: &mut Vec<u8>, options: &Options) -> Result<()> {
    match desc {
        TypeDesc::Scalar(kind) => sink.push(kind.tag()),
        TypeDesc::Any => sink.push(tags::ANY),
        TypeDesc::Slice(elem) if elem.is_byte() => sink.push(tags::BINARY),
        TypeDesc::Slice(elem) => {
            sink.push(tags::SLICE);
            write_descriptor(elem, sink, options)?;
        }
        TypeDesc::Array(len, elem) => {
            sink.push(tags::ARRAY);
            sink.write_u32::<BigEndian>(*len)?;
            write_descriptor(elem, sink, options)?;
        }
        TypeDesc::Map(key, value) => {
            sink.push(tags::MAP);
            write_descriptor(key, sink, options)?;
            write_descriptor(value, sink, options)?;
        }
        TypeDesc::Registered(name) => {
            sink.push(tags::REG);
            write_id_or_inline(sink, name, options.reg_cache.as_deref(), "registered name")?;
        }
    }
    Ok(())
}

/// Serialized descriptor, served from the session descriptor cache when one is set.
pub fn descriptor_bytes(desc: &TypeDesc, options: &Options) -> Result<Arc<[u8]>> {
    if let Some(bytes) = options.cache.as_ref().and_then(|c| c.encoded(desc)) {
        return Ok(bytes);
    }

    let mut sink = Vec::new();
    write_descriptor(desc, &mut sink, options)?;
    if sink.len() > u16::MAX as usize {
        return Err(SdfError::unsupported(
            desc.to_string(),
            format!("descriptor of {} bytes exceeds the 65535 byte limit", sink.len()),
        ));
    }

    let bytes: Arc<[u8]> = Arc::from(sink);
    if let Some(cache) = &options.cache {
        trace!(desc = %desc, len = bytes.len(), "caching encoded descriptor");
        cache.store_encoded(desc, Arc::clone(&bytes));
    }
    Ok(bytes)
}

/// Read one descriptor. Registered names must be known to `registry`.
pub fn read_descriptor(
    cursor: &mut SdfCursor<'_>,
    registry: &TypeRegistry,
    options: &Options,
    depth: usize,
) -> Result<TypeDesc> {
    if depth > options.max_depth {
        return Err(SdfError::too_deep(options.max_depth));
    }

    let position = cursor.position();
    let tag = cursor.read_u8()?;
    if let Some(kind) = ScalarKind::from_tag(tag) {
        return Ok(TypeDesc::Scalar(kind));
    }

    let desc = match tag {
        tags::ANY => TypeDesc::Any,
        tags::SLICE => {
            TypeDesc::Slice(Box::new(read_descriptor(cursor, registry, options, depth + 1)?))
        }
        tags::ARRAY => {
            let len = cursor.read_u32()?;
            TypeDesc::Array(
                len,
                Box::new(read_descriptor(cursor, registry, options, depth + 1)?),
            )
        }
        tags::MAP => {
            let key = read_descriptor(cursor, registry, options, depth + 1)?;
            let value = read_descriptor(cursor, registry, options, depth + 1)?;
            TypeDesc::map(key, value)
        }
        tags::REG => {
            let name = read_id_or_inline(cursor, options.reg_cache.as_deref(), "registered name")?;
            if !registry.contains(&name)? {
                return Err(SdfError::unknown_type(name));
            }
            TypeDesc::Registered(name)
        }
        other => return Err(SdfError::unknown_tag(other, position)),
    };
    Ok(desc)
}

/// Parse a complete descriptor block of known length.
///
/// Trailing bytes inside the block are rejected.
pub fn parse_descriptor(
    bytes: &[u8],
    registry: &TypeRegistry,
    options: &Options,
    depth: usize,
) -> Result<TypeDesc> {
    if let Some(desc) = options.cache.as_ref().and_then(|c| c.decoded(bytes)) {
        return Ok(desc);
    }

    let mut cursor = SdfCursor::new(bytes);
    let desc = read_descriptor(&mut cursor, registry, options, depth)?;
    if !cursor.is_at_end() {
        return Err(SdfError::invalid_data(
            "descriptor",
            format!(
                "{} trailing bytes after {desc}",
                cursor.remaining()
            ),
        ));
    }

    if let Some(cache) = &options.cache {
        cache.store_decoded(bytes, &desc);
    }
    Ok(desc)
}
