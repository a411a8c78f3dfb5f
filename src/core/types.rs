// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Static type model: scalar kinds and recursive type descriptors.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::tags;

/// Scalar kinds that have their own wire tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarKind {
    Atom,
    String,
    Binary,
    Float32,
    Float64,
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    /// Machine-width signed integer, always 64 bits on the wire
    Int,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    /// Machine-width unsigned integer, always 64 bits on the wire
    Uint,
    Error,
    Pid,
    ProcessId,
    Alias,
    Event,
    Ref,
    Time,
}

impl ScalarKind {
    /// Wire tag for this kind.
    pub const fn tag(self) -> u8 {
        match self {
            ScalarKind::Atom => tags::ATOM,
            ScalarKind::String => tags::STRING,
            ScalarKind::Binary => tags::BINARY,
            ScalarKind::Float32 => tags::FLOAT32,
            ScalarKind::Float64 => tags::FLOAT64,
            ScalarKind::Bool => tags::BOOL,
            ScalarKind::Int8 => tags::INT8,
            ScalarKind::Int16 => tags::INT16,
            ScalarKind::Int32 => tags::INT32,
            ScalarKind::Int64 => tags::INT64,
            ScalarKind::Int => tags::INT,
            ScalarKind::Uint8 => tags::UINT8,
            ScalarKind::Uint16 => tags::UINT16,
            ScalarKind::Uint32 => tags::UINT32,
            ScalarKind::Uint64 => tags::UINT64,
            ScalarKind::Uint => tags::UINT,
            ScalarKind::Error => tags::ERROR,
            ScalarKind::Pid => tags::PID,
            ScalarKind::ProcessId => tags::PROCESS_ID,
            ScalarKind::Alias => tags::ALIAS,
            ScalarKind::Event => tags::EVENT,
            ScalarKind::Ref => tags::REF,
            ScalarKind::Time => tags::TIME,
        }
    }

    /// Scalar kind for a wire tag, if the tag names a scalar.
    pub const fn from_tag(tag: u8) -> Option<Self> {
        let kind = match tag {
            tags::ATOM => ScalarKind::Atom,
            tags::STRING => ScalarKind::String,
            tags::BINARY => ScalarKind::Binary,
            tags::FLOAT32 => ScalarKind::Float32,
            tags::FLOAT64 => ScalarKind::Float64,
            tags::BOOL => ScalarKind::Bool,
            tags::INT8 => ScalarKind::Int8,
            tags::INT16 => ScalarKind::Int16,
            tags::INT32 => ScalarKind::Int32,
            tags::INT64 => ScalarKind::Int64,
            tags::INT => ScalarKind::Int,
            tags::UINT8 => ScalarKind::Uint8,
            tags::UINT16 => ScalarKind::Uint16,
            tags::UINT32 => ScalarKind::Uint32,
            tags::UINT64 => ScalarKind::Uint64,
            tags::UINT => ScalarKind::Uint,
            tags::ERROR => ScalarKind::Error,
            tags::PID => ScalarKind::Pid,
            tags::PROCESS_ID => ScalarKind::ProcessId,
            tags::ALIAS => ScalarKind::Alias,
            tags::EVENT => ScalarKind::Event,
            tags::REF => ScalarKind::Ref,
            tags::TIME => ScalarKind::Time,
            _ => return None,
        };
        Some(kind)
    }

    /// Lowercase name, as used in diagnostics and CLI output.
    pub const fn name(self) -> &'static str {
        tags::tag_name(self.tag())
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Recursive description of a value's static type.
///
/// A descriptor is what an enclosing container, struct field or registry entry knows about the
/// values it holds. Positions described as [`TypeDesc::Any`] carry a tag per value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeDesc {
    Scalar(ScalarKind),
    Any,
    Slice(Box<TypeDesc>),
    Array(u32, Box<TypeDesc>),
    Map(Box<TypeDesc>, Box<TypeDesc>),
    /// Reference to a registered type by canonical name
    Registered(String),
}

impl TypeDesc {
    /// Slice descriptor. A slice of bytes is described as [`ScalarKind::Binary`].
    pub fn slice(elem: impl Into<TypeDesc>) -> Self {
        match elem.into() {
            TypeDesc::Scalar(ScalarKind::Uint8) => TypeDesc::Scalar(ScalarKind::Binary),
            elem => TypeDesc::Slice(Box::new(elem)),
        }
    }

    pub fn array(len: u32, elem: impl Into<TypeDesc>) -> Self {
        TypeDesc::Array(len, Box::new(elem.into()))
    }

    pub fn map(key: impl Into<TypeDesc>, value: impl Into<TypeDesc>) -> Self {
        TypeDesc::Map(Box::new(key.into()), Box::new(value.into()))
    }

    pub fn registered(name: impl Into<String>) -> Self {
        TypeDesc::Registered(name.into())
    }

    /// True for `uint8`, the element kind that slices compact into binary.
    pub fn is_byte(&self) -> bool {
        matches!(self, TypeDesc::Scalar(ScalarKind::Uint8))
    }

    /// Copy with every slice of `uint8` rewritten as `binary`.
    pub fn normalized(&self) -> TypeDesc {
        match self {
            TypeDesc::Slice(elem) => TypeDesc::slice(elem.normalized()),
            TypeDesc::Array(len, elem) => TypeDesc::array(*len, elem.normalized()),
            TypeDesc::Map(key, value) => TypeDesc::map(key.normalized(), value.normalized()),
            other => other.clone(),
        }
    }

    /// Equality that treats a slice of `uint8` and `binary` as the same type.
    pub fn matches(&self, other: &TypeDesc) -> bool {
        match (self, other) {
            (TypeDesc::Slice(a), TypeDesc::Slice(b)) => a.matches(b),
            (TypeDesc::Slice(elem), TypeDesc::Scalar(ScalarKind::Binary))
            | (TypeDesc::Scalar(ScalarKind::Binary), TypeDesc::Slice(elem)) => elem.is_byte(),
            (TypeDesc::Array(n, a), TypeDesc::Array(m, b)) => n == m && a.matches(b),
            (TypeDesc::Map(k1, v1), TypeDesc::Map(k2, v2)) => k1.matches(k2) && v1.matches(v2),
            (a, b) => a == b,
        }
    }

    /// Registered names referenced anywhere in this descriptor.
    pub fn registered_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_names(&mut names);
        names
    }

    fn collect_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            TypeDesc::Registered(name) => names.push(name),
            TypeDesc::Slice(elem) | TypeDesc::Array(_, elem) => elem.collect_names(names),
            TypeDesc::Map(key, value) => {
                key.collect_names(names);
                value.collect_names(names);
            }
            TypeDesc::Scalar(_) | TypeDesc::Any => {}
        }
    }
}

impl From<ScalarKind> for TypeDesc {
    fn from(kind: ScalarKind) -> Self {
        TypeDesc::Scalar(kind)
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDesc::Scalar(kind) => write!(f, "{kind}"),
            TypeDesc::Any => f.write_str("any"),
            TypeDesc::Slice(elem) => write!(f, "[]{elem}"),
            TypeDesc::Array(len, elem) => write!(f, "[{len}]{elem}"),
            TypeDesc::Map(key, value) => write!(f, "map[{key}]{value}"),
            TypeDesc::Registered(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_tag_round_trip() {
        for tag in 0..=u8::MAX {
            if let Some(kind) = ScalarKind::from_tag(tag) {
                assert_eq!(kind.tag(), tag);
            }
        }
        assert_eq!(ScalarKind::from_tag(tags::SLICE), None);
        assert_eq!(ScalarKind::from_tag(tags::NIL), None);
    }

    #[test]
    fn test_byte_slice_is_binary() {
        assert_eq!(
            TypeDesc::slice(ScalarKind::Uint8),
            TypeDesc::Scalar(ScalarKind::Binary)
        );
        assert_eq!(
            TypeDesc::slice(ScalarKind::Int8),
            TypeDesc::Slice(Box::new(TypeDesc::Scalar(ScalarKind::Int8)))
        );
    }

    #[test]
    fn test_normalized_and_matches() {
        let raw = TypeDesc::Slice(Box::new(TypeDesc::Slice(Box::new(TypeDesc::Scalar(
            ScalarKind::Uint8,
        )))));
        let normal = TypeDesc::slice(ScalarKind::Binary);
        assert_ne!(raw, normal);
        assert_eq!(raw.normalized(), normal);
        assert!(raw.matches(&normal));
        assert!(normal.matches(&raw));
        assert!(!TypeDesc::slice(ScalarKind::Int8).matches(&normal));
        assert!(!TypeDesc::array(2, ScalarKind::Bool).matches(&TypeDesc::array(3, ScalarKind::Bool)));
    }

    #[test]
    fn test_display() {
        let desc = TypeDesc::map(
            ScalarKind::String,
            TypeDesc::slice(TypeDesc::array(2, TypeDesc::registered("#app/Point"))),
        );
        assert_eq!(desc.to_string(), "map[string][][2]#app/Point");
        assert_eq!(TypeDesc::slice(TypeDesc::Any).to_string(), "[]any");
    }

    #[test]
    fn test_registered_names() {
        let desc = TypeDesc::map(
            TypeDesc::registered("#app/Key"),
            TypeDesc::slice(TypeDesc::registered("#app/Value")),
        );
        assert_eq!(desc.registered_names(), vec!["#app/Key", "#app/Value"]);
    }
}
