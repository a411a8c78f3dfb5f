// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Process-wide registry of named types and known error messages.
//!
//! Registration is append-only. A name maps to exactly one [`Shape`]: registering the
//! same shape again is a no-op, registering a different one fails with
//! [`SdfError::NameTaken`]. Lookups take a shared lock and never block each other.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, warn};

use super::error::{Result, SdfError};
use super::hook::{read_erased, CustomValue, ReadHook, Serializable};
use super::types::{ScalarKind, TypeDesc};
use crate::encoding::sdf::cache::CacheTable;

/// Canonical registered name: `#<module/path>/<TypeName>`.
///
/// Rust path separators are written as `/`.
pub fn canonical_name(module_path: &str, type_name: &str) -> String {
    format!("#{}/{}", module_path.replace("::", "/"), type_name)
}

/// Canonical name of a type declared in the calling module.
///
/// ```
/// let name = sdfcodec::sdf_name!(Point);
/// assert!(name.starts_with('#') && name.ends_with("/Point"));
/// ```
#[macro_export]
macro_rules! sdf_name {
    ($ty:ident) => {
        $crate::core::registry::canonical_name(module_path!(), stringify!($ty))
    };
}

/// Named struct field.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub desc: TypeDesc,
}

impl Field {
    pub fn new(name: impl Into<String>, desc: impl Into<TypeDesc>) -> Self {
        Field {
            name: name.into(),
            desc: desc.into(),
        }
    }
}

/// Structural shape recorded for a registered name.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Named alias of a scalar kind
    Scalar(ScalarKind),
    Slice(TypeDesc),
    Array(u32, TypeDesc),
    Map(TypeDesc, TypeDesc),
    /// Ordered fields, written without tags
    Struct(Vec<Field>),
    /// Opaque payload written by a marshal hook
    Custom(CustomShape),
}

impl Shape {
    /// Struct shape from `(field name, descriptor)` pairs.
    pub fn structure<N, D>(fields: impl IntoIterator<Item = (N, D)>) -> Self
    where
        N: Into<String>,
        D: Into<TypeDesc>,
    {
        Shape::Struct(
            fields
                .into_iter()
                .map(|(name, desc)| Field::new(name, desc))
                .collect(),
        )
    }

    /// Copy with byte slices rewritten as `binary`.
    ///
    /// A registered slice of `uint8` becomes a named alias of `binary`.
    fn normalized(self) -> Shape {
        match self {
            Shape::Slice(elem) if elem.is_byte() => Shape::Scalar(ScalarKind::Binary),
            Shape::Slice(elem) => Shape::Slice(elem.normalized()),
            Shape::Array(len, elem) => Shape::Array(len, elem.normalized()),
            Shape::Map(key, value) => Shape::Map(key.normalized(), value.normalized()),
            Shape::Struct(fields) => Shape::Struct(
                fields
                    .into_iter()
                    .map(|f| Field::new(f.name, f.desc.normalized()))
                    .collect(),
            ),
            other => other,
        }
    }

    /// Descriptors of everything this shape contains.
    fn inner_descs(&self) -> Vec<&TypeDesc> {
        match self {
            Shape::Scalar(_) | Shape::Custom(_) => Vec::new(),
            Shape::Slice(elem) | Shape::Array(_, elem) => vec![elem],
            Shape::Map(key, value) => vec![key, value],
            Shape::Struct(fields) => fields.iter().map(|f| &f.desc).collect(),
        }
    }

    /// Short kind name, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Scalar(_) => "scalar",
            Shape::Slice(_) => "slice",
            Shape::Array(..) => "array",
            Shape::Map(..) => "map",
            Shape::Struct(_) => "struct",
            Shape::Custom(_) => "custom",
        }
    }
}

/// Marshal-hook type recorded in the registry.
#[derive(Clone)]
pub struct CustomShape {
    type_id: TypeId,
    type_name: &'static str,
    read: ReadHook,
}

impl CustomShape {
    pub fn of<T: Serializable>() -> Self {
        CustomShape {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            read: read_erased::<T>,
        }
    }

    /// Reader that rebuilds the value from its opaque payload.
    pub fn reader(&self) -> ReadHook {
        self.read
    }

    pub fn rust_type(&self) -> &'static str {
        self.type_name
    }

    /// True when `value` holds the Rust type this shape was registered with.
    pub fn accepts(&self, value: &CustomValue) -> bool {
        value.type_id() == self.type_id
    }
}

impl PartialEq for CustomShape {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl fmt::Debug for CustomShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CustomShape").field(&self.type_name).finish()
    }
}

/// A registry entry.
#[derive(Debug)]
pub struct RegisteredType {
    name: String,
    shape: Shape,
}

impl RegisteredType {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }
}

/// Thread-safe registry of named types and error messages.
pub struct TypeRegistry {
    inner: RwLock<RegistryInner>,
}

#[derive(Default)]
struct RegistryInner {
    types: HashMap<String, Arc<RegisteredType>>,
    errors: HashMap<String, Arc<str>>,
}

impl TypeRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(RegistryInner::default()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, RegistryInner>> {
        self.inner
            .read()
            .map_err(|e| SdfError::Other(format!("Registry lock poisoned: {e}")))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, RegistryInner>> {
        self.inner
            .write()
            .map_err(|e| SdfError::Other(format!("Registry lock poisoned: {e}")))
    }

    /// Register `shape` under `name`.
    ///
    /// Every registered name the shape refers to must already be registered.
    pub fn register_type(&self, name: impl Into<String>, shape: Shape) -> Result<()> {
        let name = name.into();
        let shape = shape.normalized();
        if name.is_empty() || name.len() > u16::MAX as usize {
            return Err(SdfError::unsupported(
                name,
                "registered names must be 1..=65535 bytes",
            ));
        }

        let mut inner = self.write()?;
        for desc in shape.inner_descs() {
            for referenced in desc.registered_names() {
                if !inner.types.contains_key(referenced) {
                    return Err(SdfError::unknown_type(referenced));
                }
            }
        }

        if let Some(existing) = inner.types.get(&name) {
            if existing.shape == shape {
                debug!(name = %name, "type already registered with the same shape");
                return Ok(());
            }
            warn!(
                name = %name,
                existing = existing.shape.kind(),
                requested = shape.kind(),
                "conflicting type registration"
            );
            return Err(SdfError::name_taken(name));
        }

        debug!(name = %name, kind = shape.kind(), "registered type");
        inner
            .types
            .insert(name.clone(), Arc::new(RegisteredType { name, shape }));
        Ok(())
    }

    /// Register a type that writes its own payload through [`Serializable`].
    pub fn register_custom<T: Serializable>(&self, name: impl Into<String>) -> Result<()> {
        self.register_type(name, Shape::Custom(CustomShape::of::<T>()))
    }

    /// Register a well-known error message. Decoded errors with this message reuse it.
    pub fn register_error(&self, message: impl AsRef<str>) -> Result<()> {
        let message = message.as_ref();
        let mut inner = self.write()?;
        if inner.errors.contains_key(message) {
            return Err(SdfError::name_taken(message));
        }
        inner
            .errors
            .insert(message.to_string(), Arc::from(message));
        debug!(message, "registered error");
        Ok(())
    }

    /// Look up a registered type by name.
    pub fn lookup(&self, name: &str) -> Result<Option<Arc<RegisteredType>>> {
        Ok(self.read()?.types.get(name).cloned())
    }

    /// Look up a registered type through a session cache id.
    pub fn lookup_by_id(
        &self,
        cache: &CacheTable,
        id: u16,
    ) -> Result<Option<Arc<RegisteredType>>> {
        match cache.value_of(id) {
            Some(name) => self.lookup(name),
            None => Ok(None),
        }
    }

    /// Registered prototype for an error message.
    pub fn lookup_error(&self, message: &str) -> Result<Option<Arc<str>>> {
        Ok(self.read()?.errors.get(message).cloned())
    }

    pub fn contains(&self, name: &str) -> Result<bool> {
        Ok(self.read()?.types.contains_key(name))
    }

    /// All registered type names, sorted.
    pub fn names(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.read()?.types.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    /// All registered error messages, sorted.
    pub fn error_messages(&self) -> Result<Vec<String>> {
        let mut messages: Vec<String> = self.read()?.errors.keys().cloned().collect();
        messages.sort();
        Ok(messages)
    }

    /// Number of registered types.
    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.types.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL_REGISTRY: OnceLock<TypeRegistry> = OnceLock::new();

fn init_global_registry() -> TypeRegistry {
    let registry = TypeRegistry::new();
    crate::framework::register_all(&registry);
    registry
}

/// The process-wide registry, populated with framework types on first use.
pub fn global_registry() -> &'static TypeRegistry {
    GLOBAL_REGISTRY.get_or_init(init_global_registry)
}
