// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Dynamic value tree handed to the encoder and produced by the decoder.

use std::fmt;
use std::sync::Arc;

use serde_json::json;

use super::hook::CustomValue;
use super::ident::{Alias, Atom, Event, Pid, ProcessId, Ref};
use super::time::Timestamp;
use super::types::{ScalarKind, TypeDesc};

/// A value that can cross a node boundary.
///
/// Containers record the static descriptor of what they hold, which is what the wire
/// needs to describe them. `None` items or entries stand for a nil container, distinct
/// from an empty one.
///
/// `Struct` and `Custom` only appear as the body of a [`Value::Registered`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,

    Bool(bool),
    Atom(Atom),
    String(String),
    Binary(Vec<u8>),

    Float32(f32),
    Float64(f64),

    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Int(i64),

    Uint8(u8),
    Uint16(u16),
    Uint32(u32),
    Uint64(u64),
    Uint(u64),

    /// Error message
    Error(Arc<str>),
    Time(Timestamp),

    Pid(Pid),
    ProcessId(ProcessId),
    Alias(Alias),
    Event(Event),
    Ref(Ref),

    Slice {
        elem: TypeDesc,
        items: Option<Vec<Value>>,
    },
    Array {
        elem: TypeDesc,
        items: Vec<Value>,
    },
    Map {
        key: TypeDesc,
        value: TypeDesc,
        entries: Option<Vec<(Value, Value)>>,
    },

    /// Ordered field values of a registered struct
    Struct(Vec<Value>),
    /// Registered value carried through its marshal hook
    Custom(CustomValue),
    /// Value of a registered type.
    ///
    /// At a position whose static type is already this registered type, the encoder
    /// accepts either the wrapper or the bare body. The decoder always returns the
    /// wrapper, so encode-then-decode of a bare body yields `Registered`.
    Registered { name: String, body: Box<Value> },
}

impl Value {
    // ========================================================================
    // Constructors
    // ========================================================================

    pub fn atom(s: impl Into<String>) -> Self {
        Value::Atom(Atom::new(s))
    }

    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    pub fn error(message: impl AsRef<str>) -> Self {
        Value::Error(Arc::from(message.as_ref()))
    }

    /// Slice of values sharing the static type `elem`.
    ///
    /// A slice of `uint8` items becomes [`Value::Binary`], the form it decodes to.
    pub fn slice(elem: impl Into<TypeDesc>, items: Vec<Value>) -> Self {
        let elem = elem.into();
        if elem.is_byte() {
            let bytes = items
                .iter()
                .map(|item| match item {
                    Value::Uint8(b) => Some(*b),
                    _ => None,
                })
                .collect::<Option<Vec<u8>>>();
            if let Some(bytes) = bytes {
                return Value::Binary(bytes);
            }
        }
        Value::Slice {
            elem,
            items: Some(items),
        }
    }

    /// Nil slice; a nil slice of `uint8` is an empty [`Value::Binary`].
    pub fn nil_slice(elem: impl Into<TypeDesc>) -> Self {
        let elem = elem.into();
        if elem.is_byte() {
            return Value::Binary(Vec::new());
        }
        Value::Slice { elem, items: None }
    }

    /// Slice of polymorphic values, each tagged on the wire.
    pub fn any_slice(items: Vec<Value>) -> Self {
        Value::slice(TypeDesc::Any, items)
    }

    pub fn array(elem: impl Into<TypeDesc>, items: Vec<Value>) -> Self {
        Value::Array {
            elem: elem.into(),
            items,
        }
    }

    pub fn map(
        key: impl Into<TypeDesc>,
        value: impl Into<TypeDesc>,
        entries: Vec<(Value, Value)>,
    ) -> Self {
        Value::Map {
            key: key.into(),
            value: value.into(),
            entries: Some(entries),
        }
    }

    pub fn nil_map(key: impl Into<TypeDesc>, value: impl Into<TypeDesc>) -> Self {
        Value::Map {
            key: key.into(),
            value: value.into(),
            entries: None,
        }
    }

    /// Value of the registered type `name`.
    pub fn registered(name: impl Into<String>, body: Value) -> Self {
        Value::Registered {
            name: name.into(),
            body: Box::new(body),
        }
    }

    // ========================================================================
    // Type Information
    // ========================================================================

    /// Scalar kind of this value, `None` for nil, containers and registered values.
    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        let kind = match self {
            Value::Bool(_) => ScalarKind::Bool,
            Value::Atom(_) => ScalarKind::Atom,
            Value::String(_) => ScalarKind::String,
            Value::Binary(_) => ScalarKind::Binary,
            Value::Float32(_) => ScalarKind::Float32,
            Value::Float64(_) => ScalarKind::Float64,
            Value::Int8(_) => ScalarKind::Int8,
            Value::Int16(_) => ScalarKind::Int16,
            Value::Int32(_) => ScalarKind::Int32,
            Value::Int64(_) => ScalarKind::Int64,
            Value::Int(_) => ScalarKind::Int,
            Value::Uint8(_) => ScalarKind::Uint8,
            Value::Uint16(_) => ScalarKind::Uint16,
            Value::Uint32(_) => ScalarKind::Uint32,
            Value::Uint64(_) => ScalarKind::Uint64,
            Value::Uint(_) => ScalarKind::Uint,
            Value::Error(_) => ScalarKind::Error,
            Value::Time(_) => ScalarKind::Time,
            Value::Pid(_) => ScalarKind::Pid,
            Value::ProcessId(_) => ScalarKind::ProcessId,
            Value::Alias(_) => ScalarKind::Alias,
            Value::Event(_) => ScalarKind::Event,
            Value::Ref(_) => ScalarKind::Ref,
            _ => return None,
        };
        Some(kind)
    }

    /// Static descriptor of this value when it stands alone.
    ///
    /// Returns `None` for nil and for bare struct or custom bodies, which have no
    /// descriptor outside a registered type.
    pub fn type_desc(&self) -> Option<TypeDesc> {
        match self {
            Value::Slice { elem, .. } => Some(TypeDesc::slice(elem.clone())),
            Value::Array { elem, items } => u32::try_from(items.len())
                .ok()
                .map(|len| TypeDesc::array(len, elem.clone())),
            Value::Map { key, value, .. } => Some(TypeDesc::map(key.clone(), value.clone())),
            Value::Registered { name, .. } => Some(TypeDesc::Registered(name.clone())),
            other => other.scalar_kind().map(TypeDesc::Scalar),
        }
    }

    /// Short name of the value's kind, for diagnostics.
    pub fn type_name(&self) -> String {
        match self {
            Value::Nil => "nil".to_string(),
            Value::Struct(_) => "struct".to_string(),
            Value::Custom(_) => "custom".to_string(),
            other => other
                .type_desc()
                .map(|desc| desc.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Text of a string, atom or error value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            Value::Atom(a) => Some(a.as_str()),
            Value::Error(e) => Some(e.as_ref()),
            _ => None,
        }
    }

    /// Integer value widened to `i64`, if it fits.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int8(v) => Some(*v as i64),
            Value::Int16(v) => Some(*v as i64),
            Value::Int32(v) => Some(*v as i64),
            Value::Int64(v) | Value::Int(v) => Some(*v),
            Value::Uint8(v) => Some(*v as i64),
            Value::Uint16(v) => Some(*v as i64),
            Value::Uint32(v) => Some(*v as i64),
            Value::Uint64(v) | Value::Uint(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float32(v) => Some(*v as f64),
            Value::Float64(v) => Some(*v),
            _ => None,
        }
    }

    /// Bytes of a binary value.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Binary(b) => Some(b.as_slice()),
            _ => None,
        }
    }

    /// Items of a slice or array. `None` for other values and nil slices.
    pub fn items(&self) -> Option<&[Value]> {
        match self {
            Value::Slice {
                items: Some(items), ..
            }
            | Value::Array { items, .. } => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Entries of a non-nil map.
    pub fn entries(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Map {
                entries: Some(entries),
                ..
            } => Some(entries.as_slice()),
            _ => None,
        }
    }

    /// Look up a map entry by key.
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Body of a registered value.
    pub fn body(&self) -> Option<&Value> {
        match self {
            Value::Registered { body, .. } => Some(body.as_ref()),
            _ => None,
        }
    }

    /// Field `index` of a registered struct, or of a bare struct body.
    pub fn field(&self, index: usize) -> Option<&Value> {
        match self {
            Value::Struct(fields) => fields.get(index),
            Value::Registered { body, .. } => body.field(index),
            _ => None,
        }
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// JSON rendering for tooling. Lossy: kinds collapse onto JSON types.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Nil => serde_json::Value::Null,
            Value::Bool(b) => json!(b),
            Value::Atom(a) => json!({ "atom": a.as_str() }),
            Value::String(s) => json!(s),
            Value::Binary(b) => json!({ "binary": hex::encode(b) }),
            Value::Float32(v) => json!(v),
            Value::Float64(v) => json!(v),
            Value::Int8(v) => json!(v),
            Value::Int16(v) => json!(v),
            Value::Int32(v) => json!(v),
            Value::Int64(v) | Value::Int(v) => json!(v),
            Value::Uint8(v) => json!(v),
            Value::Uint16(v) => json!(v),
            Value::Uint32(v) => json!(v),
            Value::Uint64(v) | Value::Uint(v) => json!(v),
            Value::Error(e) => json!({ "error": e.as_ref() }),
            Value::Time(t) => json!({ "time": t.to_string() }),
            Value::Pid(p) => json!({ "pid": p }),
            Value::ProcessId(p) => json!({ "process_id": p }),
            Value::Alias(a) => json!({ "alias": a }),
            Value::Event(e) => json!({ "event": e }),
            Value::Ref(r) => json!({ "ref": r }),
            Value::Slice { items: None, .. } | Value::Map { entries: None, .. } => {
                serde_json::Value::Null
            }
            Value::Slice {
                items: Some(items), ..
            }
            | Value::Array { items, .. }
            | Value::Struct(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Map {
                entries: Some(entries),
                ..
            } => serde_json::Value::Array(
                entries
                    .iter()
                    .map(|(k, v)| json!([k.to_json(), v.to_json()]))
                    .collect(),
            ),
            Value::Custom(c) => json!({ "custom": format!("{c:?}") }),
            Value::Registered { name, body } => {
                let mut object = serde_json::Map::new();
                object.insert(name.clone(), body.to_json());
                serde_json::Value::Object(object)
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("nil"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Atom(a) => write!(f, "{a}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Binary(b) => write!(f, "<binary {} bytes>", b.len()),
            Value::Float32(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::Int8(v) => write!(f, "{v}"),
            Value::Int16(v) => write!(f, "{v}"),
            Value::Int32(v) => write!(f, "{v}"),
            Value::Int64(v) | Value::Int(v) => write!(f, "{v}"),
            Value::Uint8(v) => write!(f, "{v}"),
            Value::Uint16(v) => write!(f, "{v}"),
            Value::Uint32(v) => write!(f, "{v}"),
            Value::Uint64(v) | Value::Uint(v) => write!(f, "{v}"),
            Value::Error(e) => write!(f, "error({e:?})"),
            Value::Time(t) => write!(f, "{t}"),
            Value::Pid(p) => write!(f, "{p}"),
            Value::ProcessId(p) => write!(f, "{p}"),
            Value::Alias(a) => write!(f, "{a}"),
            Value::Event(e) => write!(f, "{e}"),
            Value::Ref(r) => write!(f, "{r}"),
            Value::Slice { elem, items: None } => write!(f, "[]{elem}(nil)"),
            Value::Map {
                key,
                value,
                entries: None,
            } => write!(f, "map[{key}]{value}(nil)"),
            Value::Slice {
                items: Some(items), ..
            }
            | Value::Array { items, .. } => {
                f.write_str("[")?;
                write_joined(f, items)?;
                f.write_str("]")
            }
            Value::Map {
                entries: Some(entries),
                ..
            } => {
                f.write_str("map[")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{k}:{v}")?;
                }
                f.write_str("]")
            }
            Value::Struct(fields) => {
                f.write_str("{")?;
                write_joined(f, fields)?;
                f.write_str("}")
            }
            Value::Custom(c) => write!(f, "{c:?}"),
            Value::Registered { name, body } => write!(f, "{name}{body}"),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_scalar! {
    bool => Bool,
    Atom => Atom,
    String => String,
    Vec<u8> => Binary,
    f32 => Float32,
    f64 => Float64,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => Uint8,
    u16 => Uint16,
    u32 => Uint32,
    u64 => Uint64,
    Timestamp => Time,
    Pid => Pid,
    ProcessId => ProcessId,
    Alias => Alias,
    Event => Event,
    Ref => Ref,
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<isize> for Value {
    fn from(v: isize) -> Self {
        Value::Int(v as i64)
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::Uint(v as u64)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Nil, Into::into)
    }
}
