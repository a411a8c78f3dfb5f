// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for integration tests.

#![allow(dead_code)]

use sdfcodec::core::registry::Shape;
use sdfcodec::{
    Alias, Event, HookError, Options, Pid, ProcessId, Ref, Result, ScalarKind, SdfDecoder,
    SdfEncoder, Serializable, TypeDesc, TypeRegistry, Value,
};

// ============================================================================
// Codec Helpers
// ============================================================================

/// Encode `value` into a fresh buffer.
pub fn encode_with(registry: &TypeRegistry, options: &Options, value: &Value) -> Result<Vec<u8>> {
    let mut sink = Vec::new();
    SdfEncoder::new(registry, options).encode(value, &mut sink)?;
    Ok(sink)
}

/// Decode one value and return it with the number of bytes consumed.
pub fn decode_with(registry: &TypeRegistry, options: &Options, bytes: &[u8]) -> Result<(Value, usize)> {
    SdfDecoder::new(registry, options).decode(bytes)
}

/// Encode then decode, asserting that the whole buffer was consumed.
pub fn round_trip(registry: &TypeRegistry, options: &Options, value: &Value) -> Value {
    let bytes = encode_with(registry, options, value).unwrap();
    let (decoded, used) = decode_with(registry, options, &bytes).unwrap();
    assert_eq!(used, bytes.len(), "trailing bytes after {value}");
    decoded
}

/// Encode with an empty registry and default options.
pub fn encode_plain(value: &Value) -> Vec<u8> {
    encode_with(&TypeRegistry::new(), &Options::default(), value).unwrap()
}

/// Decode with an empty registry and default options.
pub fn decode_plain(bytes: &[u8]) -> Result<(Value, usize)> {
    decode_with(&TypeRegistry::new(), &Options::default(), bytes)
}

// ============================================================================
// Identity Fixtures
// ============================================================================

pub const NODE: &str = "abc@def";
pub const NODE_BYTES: [u8; 9] = [0x00, 0x07, b'a', b'b', b'c', b'@', b'd', b'e', b'f'];

pub fn pid() -> Pid {
    Pid {
        node: NODE.into(),
        id: 32767,
        creation: 2,
    }
}

pub fn process_id() -> ProcessId {
    ProcessId {
        name: "ghi".into(),
        node: NODE.into(),
    }
}

pub fn event() -> Event {
    Event {
        name: "ghi".into(),
        node: NODE.into(),
    }
}

pub fn reference() -> Ref {
    Ref {
        node: NODE.into(),
        creation: 2,
        id: [4, 5, 6],
    }
}

pub fn alias() -> Alias {
    Alias {
        node: NODE.into(),
        creation: 2,
        id: [4, 5, 6],
    }
}

// ============================================================================
// Registered Types
// ============================================================================

pub const POINT: &str = "#app/geometry/Point";
pub const FLAGS: &str = "#app/Flags";
pub const SCORES: &str = "#app/Scores";
pub const TRIPLE: &str = "#app/Triple";
pub const LEVEL: &str = "#app/Level";
pub const TOKEN: &str = "#app/Token";
pub const ENVELOPE: &str = "#app/Envelope";

/// Value with its own byte layout: an upper-cased label.
#[derive(Debug, Clone, PartialEq)]
pub struct Token(pub String);

impl Serializable for Token {
    fn write_self(&self, sink: &mut Vec<u8>) -> std::result::Result<(), HookError> {
        sink.extend_from_slice(self.0.to_uppercase().as_bytes());
        Ok(())
    }

    fn read_self(bytes: &[u8]) -> std::result::Result<Self, HookError> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Token(text.to_lowercase()))
    }
}

/// Registry holding one type of every shape.
pub fn app_registry() -> TypeRegistry {
    let registry = TypeRegistry::new();
    registry
        .register_type(
            POINT,
            Shape::structure([("X", ScalarKind::Int32), ("Y", ScalarKind::Int32)]),
        )
        .unwrap();
    registry
        .register_type(FLAGS, Shape::Slice(ScalarKind::Bool.into()))
        .unwrap();
    registry
        .register_type(
            SCORES,
            Shape::Map(ScalarKind::String.into(), ScalarKind::Int8.into()),
        )
        .unwrap();
    registry
        .register_type(TRIPLE, Shape::Array(3, ScalarKind::Uint16.into()))
        .unwrap();
    registry
        .register_type(LEVEL, Shape::Scalar(ScalarKind::Int))
        .unwrap();
    registry.register_custom::<Token>(TOKEN).unwrap();
    registry
        .register_type(
            ENVELOPE,
            Shape::structure([
                ("From", TypeDesc::from(ScalarKind::Pid)),
                ("At", TypeDesc::registered(POINT)),
                ("Flags", TypeDesc::registered(FLAGS)),
                ("Tags", TypeDesc::slice(ScalarKind::Atom)),
                ("Payload", TypeDesc::Any),
                ("Reason", TypeDesc::from(ScalarKind::Error)),
            ]),
        )
        .unwrap();
    registry
}

pub fn point(x: i32, y: i32) -> Value {
    Value::registered(POINT, Value::Struct(vec![Value::Int32(x), Value::Int32(y)]))
}

pub fn flags(values: &[bool]) -> Value {
    Value::registered(
        FLAGS,
        Value::slice(
            ScalarKind::Bool,
            values.iter().map(|b| Value::Bool(*b)).collect(),
        ),
    )
}
