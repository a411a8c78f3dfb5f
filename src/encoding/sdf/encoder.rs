// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! SDF encoder.
//!
//! Values are written in one of three modes:
//! - at a statically typed position only the payload is written
//! - at a typeless position an anonymous container is written as `Type`, descriptor, payload
//! - a registered value is written as `Reg`, id-or-inline name, payload of its shape
//!
//! Scalars at typeless positions carry their own tag.

use std::sync::Arc;

use byteorder::{BigEndian, ByteOrder, WriteBytesExt};
use tracing::{debug, trace};

use super::cache::{write_id_or_inline, Options};
use super::descriptor::descriptor_bytes;
use crate::core::registry::{RegisteredType, Shape, TypeRegistry};
use crate::core::tags;
use crate::core::{Atom, Result, ScalarKind, SdfError, TypeDesc, Value};

/// Encoder bound to a registry and one set of session options.
///
/// # Example
///
/// ```
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use sdfcodec::core::{ScalarKind, TypeRegistry, Value};
/// use sdfcodec::encoding::sdf::{Options, SdfEncoder};
///
/// let registry = TypeRegistry::new();
/// let options = Options::default();
/// let encoder = SdfEncoder::new(&registry, &options);
///
/// let mut sink = Vec::new();
/// encoder.encode(&Value::slice(ScalarKind::Bool, vec![false.into(), true.into()]), &mut sink)?;
/// assert_eq!(sink, [130, 0, 2, 157, 145, 157, 0, 0, 0, 2, 0, 1]);
/// # Ok(())
/// # }
/// ```
pub struct SdfEncoder<'a> {
    registry: &'a TypeRegistry,
    options: &'a Options,
}

impl<'a> SdfEncoder<'a> {
    pub fn new(registry: &'a TypeRegistry, options: &'a Options) -> Self {
        Self { registry, options }
    }

    /// Append the encoding of `value` to `sink`.
    ///
    /// On error the sink is restored to its length before the call.
    pub fn encode(&self, value: &Value, sink: &mut Vec<u8>) -> Result<()> {
        let start = sink.len();
        trace!(kind = %value.type_name(), "encoding value");
        let result = self.encode_any(value, sink, 0);
        match &result {
            Ok(()) => trace!(bytes = sink.len() - start, "encoded value"),
            Err(err) => {
                sink.truncate(start);
                debug!(error = %err, "encode failed");
            }
        }
        result
    }

    fn check_depth(&self, depth: usize) -> Result<()> {
        if depth > self.options.max_depth {
            return Err(SdfError::too_deep(self.options.max_depth));
        }
        Ok(())
    }

    fn entry(&self, name: &str) -> Result<Arc<RegisteredType>> {
        self.registry
            .lookup(name)?
            .ok_or_else(|| SdfError::unsupported(name, "type is not registered"))
    }

    // ========================================================================
    // Typeless positions
    // ========================================================================

    fn encode_any(&self, value: &Value, sink: &mut Vec<u8>, depth: usize) -> Result<()> {
        self.check_depth(depth)?;
        match value {
            Value::Nil => sink.push(tags::NIL),
            Value::Slice { elem, .. } if elem.is_byte() => {
                sink.push(tags::BINARY);
                self.encode_scalar(ScalarKind::Binary, value, sink)?;
            }
            Value::Slice { .. } | Value::Array { .. } | Value::Map { .. } => {
                let desc = value
                    .type_desc()
                    .ok_or_else(|| SdfError::unsupported(value.type_name(), "no descriptor"))?;
                let bytes = descriptor_bytes(&desc, self.options)?;
                sink.push(tags::TYPE);
                sink.write_u16::<BigEndian>(bytes.len() as u16)?;
                sink.extend_from_slice(&bytes);
                self.encode_static(value, &desc, sink, depth)?;
            }
            Value::Registered { name, body } => {
                let entry = self.entry(name)?;
                sink.push(tags::REG);
                write_id_or_inline(
                    sink,
                    name,
                    self.options.reg_cache.as_deref(),
                    "registered name",
                )?;
                self.encode_registered_body(&entry, body, sink, depth)?;
            }
            Value::Struct(_) | Value::Custom(_) => {
                return Err(SdfError::unsupported(
                    value.type_name(),
                    "only encodable as the body of a registered type",
                ));
            }
            scalar => {
                let kind = scalar
                    .scalar_kind()
                    .ok_or_else(|| SdfError::unsupported(scalar.type_name(), "not a scalar"))?;
                sink.push(kind.tag());
                self.encode_scalar(kind, scalar, sink)?;
            }
        }
        Ok(())
    }

    // ========================================================================
    // Statically typed positions
    // ========================================================================

    fn encode_static(
        &self,
        value: &Value,
        desc: &TypeDesc,
        sink: &mut Vec<u8>,
        depth: usize,
    ) -> Result<()> {
        self.check_depth(depth)?;
        match desc {
            TypeDesc::Scalar(kind) => self.encode_scalar(*kind, value, sink),
            TypeDesc::Any => self.encode_any(value, sink, depth),
            TypeDesc::Slice(elem) if elem.is_byte() => {
                self.encode_scalar(ScalarKind::Binary, value, sink)
            }
            TypeDesc::Slice(elem) => self.encode_slice(tags::SLICE, elem, value, sink, depth),
            TypeDesc::Array(len, elem) => self.encode_array(*len, elem, value, sink, depth),
            TypeDesc::Map(key, val) => self.encode_map(tags::MAP, key, val, value, sink, depth),
            TypeDesc::Registered(name) => {
                let entry = self.entry(name)?;
                let body = match value {
                    Value::Registered { name: found, body } if found == name => body.as_ref(),
                    Value::Registered { name: found, .. } => {
                        return Err(SdfError::unsupported(
                            found.as_str(),
                            format!("expected {name}"),
                        ));
                    }
                    other => other,
                };
                self.encode_registered_body(&entry, body, sink, depth)
            }
        }
    }

    /// Payload of a registered value according to its recorded shape.
    ///
    /// Slice and map payloads of a registered type use `Reg` as their section marker.
    fn encode_registered_body(
        &self,
        entry: &RegisteredType,
        body: &Value,
        sink: &mut Vec<u8>,
        depth: usize,
    ) -> Result<()> {
        match entry.shape() {
            Shape::Scalar(kind) => self.encode_scalar(*kind, body, sink),
            Shape::Slice(elem) => self.encode_slice(tags::REG, elem, body, sink, depth),
            Shape::Array(len, elem) => self.encode_array(*len, elem, body, sink, depth),
            Shape::Map(key, val) => self.encode_map(tags::REG, key, val, body, sink, depth),
            Shape::Struct(fields) => {
                let Value::Struct(values) = body else {
                    return Err(SdfError::unsupported(
                        body.type_name(),
                        format!("expected struct body of {}", entry.name()),
                    ));
                };
                if values.len() != fields.len() {
                    return Err(SdfError::unsupported(
                        entry.name(),
                        format!("expected {} fields, found {}", fields.len(), values.len()),
                    ));
                }
                for (field, value) in fields.iter().zip(values) {
                    self.encode_static(value, &field.desc, sink, depth + 1)?;
                }
                Ok(())
            }
            Shape::Custom(custom) => {
                let value = match body {
                    Value::Custom(value) if custom.accepts(value) => value,
                    other => {
                        return Err(SdfError::unsupported(
                            other.type_name(),
                            format!("expected {} for {}", custom.rust_type(), entry.name()),
                        ));
                    }
                };
                let len_at = sink.len();
                sink.extend_from_slice(&[0; 4]);
                value
                    .write_self(sink)
                    .map_err(|e| SdfError::marshal_failed(entry.name(), e))?;
                let len = u32::try_from(sink.len() - len_at - 4).map_err(|_| {
                    SdfError::marshal_failed(entry.name(), "payload exceeds 4 GiB")
                })?;
                BigEndian::write_u32(&mut sink[len_at..len_at + 4], len);
                Ok(())
            }
        }
    }

    fn encode_slice(
        &self,
        marker: u8,
        elem: &TypeDesc,
        value: &Value,
        sink: &mut Vec<u8>,
        depth: usize,
    ) -> Result<()> {
        let items = match value {
            Value::Nil | Value::Slice { items: None, .. } => {
                sink.push(tags::NIL);
                return Ok(());
            }
            Value::Slice {
                elem: found,
                items: Some(items),
            } if found.matches(elem) => items,
            other => {
                return Err(SdfError::unsupported(
                    other.type_name(),
                    format!("expected []{elem}"),
                ));
            }
        };

        sink.push(marker);
        write_count(sink, items.len(), "slice")?;
        for item in items {
            self.encode_static(item, elem, sink, depth + 1)?;
        }
        Ok(())
    }

    fn encode_array(
        &self,
        len: u32,
        elem: &TypeDesc,
        value: &Value,
        sink: &mut Vec<u8>,
        depth: usize,
    ) -> Result<()> {
        let items = match value {
            Value::Array { elem: found, items }
                if found.matches(elem) && items.len() == len as usize =>
            {
                items
            }
            other => {
                return Err(SdfError::unsupported(
                    other.type_name(),
                    format!("expected [{len}]{elem}"),
                ));
            }
        };
        for item in items {
            self.encode_static(item, elem, sink, depth + 1)?;
        }
        Ok(())
    }

    fn encode_map(
        &self,
        marker: u8,
        key: &TypeDesc,
        val: &TypeDesc,
        value: &Value,
        sink: &mut Vec<u8>,
        depth: usize,
    ) -> Result<()> {
        let entries = match value {
            Value::Nil | Value::Map { entries: None, .. } => {
                sink.push(tags::NIL);
                return Ok(());
            }
            Value::Map {
                key: found_key,
                value: found_value,
                entries: Some(entries),
            } if found_key.matches(key) && found_value.matches(val) => entries,
            other => {
                return Err(SdfError::unsupported(
                    other.type_name(),
                    format!("expected map[{key}]{val}"),
                ));
            }
        };

        sink.push(marker);
        write_count(sink, entries.len(), "map")?;
        for (k, v) in entries {
            self.encode_static(k, key, sink, depth + 1)?;
            self.encode_static(v, val, sink, depth + 1)?;
        }
        Ok(())
    }

    // ========================================================================
    // Scalars
    // ========================================================================

    fn encode_scalar(&self, kind: ScalarKind, value: &Value, sink: &mut Vec<u8>) -> Result<()> {
        match (kind, value) {
            (ScalarKind::Bool, Value::Bool(b)) => sink.push(u8::from(*b)),
            (ScalarKind::Atom, Value::Atom(atom)) => self.write_atom(atom, sink)?,
            (ScalarKind::String, Value::String(s)) => {
                let len = u16::try_from(s.len()).map_err(|_| {
                    SdfError::unsupported("string", format!("{} bytes exceed 65535", s.len()))
                })?;
                sink.write_u16::<BigEndian>(len)?;
                sink.extend_from_slice(s.as_bytes());
            }
            (ScalarKind::Binary, Value::Binary(bytes)) => write_binary(sink, bytes)?,
            (ScalarKind::Binary, Value::Nil) => write_binary(sink, &[])?,
            (ScalarKind::Binary, Value::Slice { elem, items }) if elem.is_byte() => {
                let bytes = items
                    .iter()
                    .flatten()
                    .map(|item| match item {
                        Value::Uint8(b) => Ok(*b),
                        other => Err(SdfError::unsupported(other.type_name(), "expected uint8")),
                    })
                    .collect::<Result<Vec<u8>>>()?;
                write_binary(sink, &bytes)?;
            }
            (ScalarKind::Float32, Value::Float32(v)) => sink.write_f32::<BigEndian>(*v)?,
            (ScalarKind::Float64, Value::Float64(v)) => sink.write_f64::<BigEndian>(*v)?,
            (ScalarKind::Int8, Value::Int8(v)) => sink.write_i8(*v)?,
            (ScalarKind::Int16, Value::Int16(v)) => sink.write_i16::<BigEndian>(*v)?,
            (ScalarKind::Int32, Value::Int32(v)) => sink.write_i32::<BigEndian>(*v)?,
            (ScalarKind::Int64, Value::Int64(v)) | (ScalarKind::Int, Value::Int(v)) => {
                sink.write_i64::<BigEndian>(*v)?
            }
            (ScalarKind::Uint8, Value::Uint8(v)) => sink.push(*v),
            (ScalarKind::Uint16, Value::Uint16(v)) => sink.write_u16::<BigEndian>(*v)?,
            (ScalarKind::Uint32, Value::Uint32(v)) => sink.write_u32::<BigEndian>(*v)?,
            (ScalarKind::Uint64, Value::Uint64(v)) | (ScalarKind::Uint, Value::Uint(v)) => {
                sink.write_u64::<BigEndian>(*v)?
            }
            (ScalarKind::Error, Value::Error(message)) => self.write_error(message, sink)?,
            (ScalarKind::Error, Value::Nil) => sink.write_u16::<BigEndian>(u16::MAX)?,
            (ScalarKind::Time, Value::Time(ts)) => {
                sink.push(ts.blob_len() as u8);
                ts.write_blob(sink)?;
            }
            (ScalarKind::Pid, Value::Pid(pid)) => {
                self.write_atom(&pid.node, sink)?;
                sink.write_u64::<BigEndian>(pid.id)?;
                sink.write_i64::<BigEndian>(pid.creation)?;
            }
            (ScalarKind::ProcessId, Value::ProcessId(p)) => {
                self.write_atom(&p.node, sink)?;
                self.write_atom(&p.name, sink)?;
            }
            (ScalarKind::Event, Value::Event(e)) => {
                self.write_atom(&e.node, sink)?;
                self.write_atom(&e.name, sink)?;
            }
            (ScalarKind::Ref, Value::Ref(r)) => {
                self.write_ref_layout(&r.node, r.creation, &r.id, sink)?
            }
            (ScalarKind::Alias, Value::Alias(a)) => {
                self.write_ref_layout(&a.node, a.creation, &a.id, sink)?
            }
            (kind, other) => {
                return Err(SdfError::unsupported(
                    other.type_name(),
                    format!("expected {kind}"),
                ));
            }
        }
        Ok(())
    }

    fn write_atom(&self, atom: &Atom, sink: &mut Vec<u8>) -> Result<()> {
        let wire = self.options.outgoing_atom(atom.as_str());
        write_id_or_inline(sink, wire, self.options.atom_cache.as_deref(), "atom")
    }

    /// Error messages use id-or-inline; `0xFFFF` is reserved for a nil error.
    fn write_error(&self, message: &str, sink: &mut Vec<u8>) -> Result<()> {
        let cache = self.options.err_cache.as_deref();
        let cached = cache.and_then(|c| c.id_of(message)).is_some();
        if !cached && message.len() >= u16::MAX as usize {
            return Err(SdfError::unsupported(
                "error",
                format!("message of {} bytes exceeds 65534", message.len()),
            ));
        }
        write_id_or_inline(sink, message, cache, "error")
    }

    fn write_ref_layout(
        &self,
        node: &Atom,
        creation: i64,
        id: &[u64; 3],
        sink: &mut Vec<u8>,
    ) -> Result<()> {
        self.write_atom(node, sink)?;
        sink.write_i64::<BigEndian>(creation)?;
        for part in id {
            sink.write_u64::<BigEndian>(*part)?;
        }
        Ok(())
    }
}

fn write_count(sink: &mut Vec<u8>, count: usize, kind: &str) -> Result<()> {
    let count = u32::try_from(count)
        .map_err(|_| SdfError::unsupported(kind, format!("{count} items exceed u32")))?;
    sink.write_u32::<BigEndian>(count)?;
    Ok(())
}

fn write_binary(sink: &mut Vec<u8>, bytes: &[u8]) -> Result<()> {
    write_count(sink, bytes.len(), "binary")?;
    sink.extend_from_slice(bytes);
    Ok(())
}
