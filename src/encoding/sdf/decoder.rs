// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! SDF decoder.
//!
//! Mirrors [`SdfEncoder`](super::SdfEncoder): reads tags and descriptors, resolves
//! registered names through the registry and the session caches, and rebuilds the
//! [`Value`] tree. A slice of `uint8` is accepted both in compact `Binary` form and in the
//! generic `Type/Slice/Uint8` form.

use std::cell::Cell;
use std::sync::Arc;

use tracing::{debug, trace};

use super::cache::{read_id_or_inline, Options};
use super::cursor::SdfCursor;
use super::descriptor::parse_descriptor;
use crate::core::registry::{RegisteredType, Shape, TypeRegistry};
use crate::core::tags;
use crate::core::{
    Alias, Atom, Event, Pid, ProcessId, Ref, Result, ScalarKind, SdfError, Timestamp, TypeDesc,
    Value,
};

/// Decoder bound to a registry and one set of session options.
pub struct SdfDecoder<'a> {
    registry: &'a TypeRegistry,
    options: &'a Options,
    /// Container items built so far for the current value
    items: Cell<usize>,
}

impl<'a> SdfDecoder<'a> {
    pub fn new(registry: &'a TypeRegistry, options: &'a Options) -> Self {
        Self {
            registry,
            options,
            items: Cell::new(0),
        }
    }

    /// Decode one value from the front of `data`.
    ///
    /// Returns the value and the number of bytes it occupied. Trailing bytes are left for
    /// the caller.
    pub fn decode(&self, data: &[u8]) -> Result<(Value, usize)> {
        let mut cursor = SdfCursor::new(data);
        self.items.set(0);
        match self.decode_any(&mut cursor, 0) {
            Ok(value) => {
                trace!(kind = %value.type_name(), consumed = cursor.position(), "decoded value");
                Ok((value, cursor.position()))
            }
            Err(err) => {
                debug!(error = %err, position = cursor.position(), "decode failed");
                Err(err)
            }
        }
    }

    fn check_depth(&self, depth: usize) -> Result<()> {
        if depth > self.options.max_depth {
            return Err(SdfError::too_deep(self.options.max_depth));
        }
        Ok(())
    }

    /// Charge `count` items against the per-value limit before allocating them.
    fn reserve_items(&self, count: usize, position: usize) -> Result<()> {
        let total = self.items.get().saturating_add(count);
        if total > self.options.max_items {
            return Err(SdfError::invalid_data(
                "container",
                format!(
                    "{count} items at offset {position} exceed the limit of {} items per value",
                    self.options.max_items
                ),
            ));
        }
        self.items.set(total);
        Ok(())
    }

    fn entry(&self, name: &str) -> Result<Arc<RegisteredType>> {
        self.registry
            .lookup(name)?
            .ok_or_else(|| SdfError::unknown_type(name))
    }

    fn decode_any(&self, cursor: &mut SdfCursor<'_>, depth: usize) -> Result<Value> {
        self.check_depth(depth)?;
        let position = cursor.position();
        let tag = cursor.read_u8()?;
        match tag {
            tags::NIL => Ok(Value::Nil),
            tags::TYPE => {
                let len = cursor.read_u16()? as usize;
                let bytes = cursor.read_bytes(len)?;
                let desc = parse_descriptor(bytes, self.registry, self.options, depth)?;
                self.decode_static(cursor, &desc, depth)
            }
            tags::REG => {
                let name = read_id_or_inline(
                    cursor,
                    self.options.reg_cache.as_deref(),
                    "registered name",
                )?;
                let entry = self.entry(&name)?;
                let body = self.decode_registered_body(cursor, &entry, depth)?;
                Ok(Value::registered(name, body))
            }
            other => match ScalarKind::from_tag(other) {
                Some(kind) => self.decode_scalar(cursor, kind),
                None => Err(SdfError::unknown_tag(other, position)),
            },
        }
    }

    fn decode_static(
        &self,
        cursor: &mut SdfCursor<'_>,
        desc: &TypeDesc,
        depth: usize,
    ) -> Result<Value> {
        self.check_depth(depth)?;
        match desc {
            TypeDesc::Scalar(kind) => self.decode_scalar(cursor, *kind),
            TypeDesc::Any => self.decode_any(cursor, depth),
            TypeDesc::Slice(elem) if elem.is_byte() => self.decode_byte_slice(cursor),
            TypeDesc::Slice(elem) => self.decode_slice(cursor, elem, depth),
            TypeDesc::Array(len, elem) => self.decode_array(cursor, *len, elem, depth),
            TypeDesc::Map(key, value) => self.decode_map(cursor, key, value, depth),
            TypeDesc::Registered(name) => {
                let entry = self.entry(name)?;
                let body = self.decode_registered_body(cursor, &entry, depth)?;
                Ok(Value::registered(name.clone(), body))
            }
        }
    }

    fn decode_registered_body(
        &self,
        cursor: &mut SdfCursor<'_>,
        entry: &RegisteredType,
        depth: usize,
    ) -> Result<Value> {
        match entry.shape() {
            Shape::Scalar(kind) => self.decode_scalar(cursor, *kind),
            Shape::Slice(elem) => self.decode_slice(cursor, elem, depth),
            Shape::Array(len, elem) => self.decode_array(cursor, *len, elem, depth),
            Shape::Map(key, value) => self.decode_map(cursor, key, value, depth),
            Shape::Struct(fields) => {
                let values = fields
                    .iter()
                    .map(|field| self.decode_static(cursor, &field.desc, depth + 1))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Value::Struct(values))
            }
            Shape::Custom(custom) => {
                let len = cursor.read_u32()? as usize;
                let blob = cursor.read_bytes(len)?;
                let value = (custom.reader())(blob)
                    .map_err(|e| SdfError::unmarshal_failed(entry.name(), e))?;
                Ok(Value::Custom(value))
            }
        }
    }

    // ========================================================================
    // Containers
    // ========================================================================

    /// Read a section marker. Returns false when the container is nil.
    fn read_marker(&self, cursor: &mut SdfCursor<'_>, shape: u8) -> Result<bool> {
        let position = cursor.position();
        match cursor.read_u8()? {
            tags::NIL => Ok(false),
            tags::REG => Ok(true),
            marker if marker == shape => Ok(true),
            other => Err(SdfError::unknown_tag(other, position)),
        }
    }

    fn decode_slice(
        &self,
        cursor: &mut SdfCursor<'_>,
        elem: &TypeDesc,
        depth: usize,
    ) -> Result<Value> {
        let elem_desc = elem.normalized();
        if !self.read_marker(cursor, tags::SLICE)? {
            return Ok(Value::nil_slice(elem_desc));
        }
        let position = cursor.position();
        let count = cursor.read_count(min_encoded_len(elem))?;
        self.reserve_items(count, position)?;
        let mut items = Vec::with_capacity(count.min(cursor.remaining()));
        for _ in 0..count {
            items.push(self.decode_static(cursor, elem, depth + 1)?);
        }
        Ok(Value::slice(elem_desc, items))
    }

    /// Generic `Slice/Uint8` payload, decoded as binary.
    fn decode_byte_slice(&self, cursor: &mut SdfCursor<'_>) -> Result<Value> {
        if !self.read_marker(cursor, tags::SLICE)? {
            return Ok(Value::Binary(Vec::new()));
        }
        let count = cursor.read_count(1)?;
        Ok(Value::Binary(cursor.read_bytes(count)?.to_vec()))
    }

    fn decode_array(
        &self,
        cursor: &mut SdfCursor<'_>,
        len: u32,
        elem: &TypeDesc,
        depth: usize,
    ) -> Result<Value> {
        let len = len as usize;
        let needed = len.saturating_mul(min_encoded_len(elem));
        if needed > cursor.remaining() {
            return Err(SdfError::truncated(needed, cursor.remaining(), cursor.position()));
        }
        self.reserve_items(len, cursor.position())?;
        let mut items = Vec::with_capacity(len.min(cursor.remaining()));
        for _ in 0..len {
            items.push(self.decode_static(cursor, elem, depth + 1)?);
        }
        Ok(Value::array(elem.normalized(), items))
    }

    fn decode_map(
        &self,
        cursor: &mut SdfCursor<'_>,
        key: &TypeDesc,
        value: &TypeDesc,
        depth: usize,
    ) -> Result<Value> {
        if !self.read_marker(cursor, tags::MAP)? {
            return Ok(Value::nil_map(key.normalized(), value.normalized()));
        }
        let position = cursor.position();
        let count = cursor.read_count(min_encoded_len(key).saturating_add(min_encoded_len(value)))?;
        self.reserve_items(count, position)?;
        let mut entries = Vec::with_capacity(count.min(cursor.remaining()));
        for _ in 0..count {
            let k = self.decode_static(cursor, key, depth + 1)?;
            let v = self.decode_static(cursor, value, depth + 1)?;
            entries.push((k, v));
        }
        Ok(Value::map(key.normalized(), value.normalized(), entries))
    }

    // ========================================================================
    // Scalars
    // ========================================================================

    fn decode_scalar(&self, cursor: &mut SdfCursor<'_>, kind: ScalarKind) -> Result<Value> {
        let value = match kind {
            ScalarKind::Bool => Value::Bool(cursor.read_u8()? != 0),
            ScalarKind::Atom => Value::Atom(self.read_atom(cursor)?),
            ScalarKind::String => {
                let len = cursor.read_u16()? as usize;
                Value::String(cursor.read_str(len, "string")?.to_string())
            }
            ScalarKind::Binary => {
                let len = cursor.read_u32()? as usize;
                Value::Binary(cursor.read_bytes(len)?.to_vec())
            }
            ScalarKind::Float32 => Value::Float32(cursor.read_f32()?),
            ScalarKind::Float64 => Value::Float64(cursor.read_f64()?),
            ScalarKind::Int8 => Value::Int8(cursor.read_i8()?),
            ScalarKind::Int16 => Value::Int16(cursor.read_i16()?),
            ScalarKind::Int32 => Value::Int32(cursor.read_i32()?),
            ScalarKind::Int64 => Value::Int64(cursor.read_i64()?),
            ScalarKind::Int => Value::Int(cursor.read_i64()?),
            ScalarKind::Uint8 => Value::Uint8(cursor.read_u8()?),
            ScalarKind::Uint16 => Value::Uint16(cursor.read_u16()?),
            ScalarKind::Uint32 => Value::Uint32(cursor.read_u32()?),
            ScalarKind::Uint64 => Value::Uint64(cursor.read_u64()?),
            ScalarKind::Uint => Value::Uint(cursor.read_u64()?),
            ScalarKind::Error => self.read_error(cursor)?,
            ScalarKind::Time => {
                let len = cursor.read_u8()? as usize;
                Value::Time(Timestamp::read_blob(cursor.read_bytes(len)?)?)
            }
            ScalarKind::Pid => Value::Pid(Pid {
                node: self.read_atom(cursor)?,
                id: cursor.read_u64()?,
                creation: cursor.read_i64()?,
            }),
            ScalarKind::ProcessId => {
                let node = self.read_atom(cursor)?;
                let name = self.read_atom(cursor)?;
                Value::ProcessId(ProcessId { name, node })
            }
            ScalarKind::Event => {
                let node = self.read_atom(cursor)?;
                let name = self.read_atom(cursor)?;
                Value::Event(Event { name, node })
            }
            ScalarKind::Ref => {
                let (node, creation, id) = self.read_ref_layout(cursor)?;
                Value::Ref(Ref { node, creation, id })
            }
            ScalarKind::Alias => {
                let (node, creation, id) = self.read_ref_layout(cursor)?;
                Value::Alias(Alias { node, creation, id })
            }
        };
        Ok(value)
    }

    fn read_atom(&self, cursor: &mut SdfCursor<'_>) -> Result<Atom> {
        let wire = read_id_or_inline(cursor, self.options.atom_cache.as_deref(), "atom")?;
        Ok(Atom::new(self.options.incoming_atom(&wire)))
    }

    /// Cached id, `0xFFFF` for nil, or an inline message.
    fn read_error(&self, cursor: &mut SdfCursor<'_>) -> Result<Value> {
        let v = cursor.read_u16()?;
        let message = match self.options.err_cache.as_deref().and_then(|c| c.value_of(v)) {
            Some(cached) => cached.to_string(),
            None if v == u16::MAX => return Ok(Value::Nil),
            None => cursor.read_str(v as usize, "error")?.to_string(),
        };
        match self.registry.lookup_error(&message)? {
            Some(registered) => Ok(Value::Error(registered)),
            None => Ok(Value::Error(Arc::from(message))),
        }
    }

    fn read_ref_layout(&self, cursor: &mut SdfCursor<'_>) -> Result<(Atom, i64, [u64; 3])> {
        let node = self.read_atom(cursor)?;
        let creation = cursor.read_i64()?;
        let id = [cursor.read_u64()?, cursor.read_u64()?, cursor.read_u64()?];
        Ok((node, creation, id))
    }
}

/// Smallest number of bytes a value of `desc` can occupy at a static position.
fn min_encoded_len(desc: &TypeDesc) -> usize {
    match desc {
        TypeDesc::Scalar(kind) => match kind {
            ScalarKind::Bool | ScalarKind::Int8 | ScalarKind::Uint8 | ScalarKind::Time => 1,
            ScalarKind::Int16
            | ScalarKind::Uint16
            | ScalarKind::Atom
            | ScalarKind::String
            | ScalarKind::Error => 2,
            ScalarKind::Float32 | ScalarKind::Int32 | ScalarKind::Uint32 | ScalarKind::Binary => 4,
            ScalarKind::ProcessId | ScalarKind::Event => 4,
            ScalarKind::Float64
            | ScalarKind::Int64
            | ScalarKind::Int
            | ScalarKind::Uint64
            | ScalarKind::Uint => 8,
            ScalarKind::Pid => 18,
            ScalarKind::Ref | ScalarKind::Alias => 34,
        },
        TypeDesc::Any | TypeDesc::Slice(_) | TypeDesc::Map(..) => 1,
        TypeDesc::Array(len, elem) => (*len as usize).saturating_mul(min_encoded_len(elem)),
        TypeDesc::Registered(_) => 0,
    }
}
