// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Marshal/unmarshal hook for registered types with their own byte layout.
//!
//! A type implementing [`Serializable`] and registered through
//! [`TypeRegistry::register_custom`](crate::core::registry::TypeRegistry::register_custom)
//! is carried on the wire as a 4-byte length followed by the bytes its hook produced.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Error type returned by user hooks.
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// Capability of a registered type to write and read its own opaque payload.
pub trait Serializable: fmt::Debug + PartialEq + Send + Sync + 'static {
    /// Append the payload to `sink`.
    fn write_self(&self, sink: &mut Vec<u8>) -> Result<(), HookError>;

    /// Rebuild a value from exactly the bytes a previous `write_self` produced.
    fn read_self(bytes: &[u8]) -> Result<Self, HookError>
    where
        Self: Sized;
}

/// Object-safe view of a [`Serializable`] value.
pub trait ErasedSerializable: fmt::Debug + Send + Sync {
    fn write_erased(&self, sink: &mut Vec<u8>) -> Result<(), HookError>;
    fn as_any(&self) -> &dyn Any;
    fn eq_erased(&self, other: &dyn ErasedSerializable) -> bool;
}

impl<T: Serializable> ErasedSerializable for T {
    fn write_erased(&self, sink: &mut Vec<u8>) -> Result<(), HookError> {
        self.write_self(sink)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_erased(&self, other: &dyn ErasedSerializable) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }
}

/// Shared handle to a user value with a marshal hook.
#[derive(Clone)]
pub struct CustomValue(Arc<dyn ErasedSerializable>);

impl CustomValue {
    pub fn new<T: Serializable>(value: T) -> Self {
        CustomValue(Arc::new(value))
    }

    /// Borrow the concrete value.
    pub fn downcast_ref<T: Serializable>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    /// Type id of the concrete value.
    pub fn type_id(&self) -> TypeId {
        self.0.as_any().type_id()
    }

    pub fn write_self(&self, sink: &mut Vec<u8>) -> Result<(), HookError> {
        self.0.write_erased(sink)
    }
}

impl PartialEq for CustomValue {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_erased(other.0.as_ref())
    }
}

impl fmt::Debug for CustomValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

/// Type-erased reader stored in the registry for a custom type.
pub type ReadHook = fn(&[u8]) -> Result<CustomValue, HookError>;

pub(crate) fn read_erased<T: Serializable>(bytes: &[u8]) -> Result<CustomValue, HookError> {
    T::read_self(bytes).map(CustomValue::new)
}
