// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types used throughout sdfcodec.
//!
//! This module provides the foundational types for the library:
//! - [`SdfError`] - Error taxonomy shared by encoder, decoder and registry
//! - [`Value`] - Dynamic value tree
//! - [`TypeDesc`] / [`ScalarKind`] - Static type model and wire tags
//! - [`TypeRegistry`] - Process-wide registry of named types

pub mod error;
pub mod hook;
pub mod ident;
pub mod registry;
pub mod tags;
pub mod time;
pub mod types;
pub mod value;

pub use error::{Result, SdfError};
pub use hook::{CustomValue, HookError, Serializable};
pub use ident::{Alias, Atom, Event, Pid, ProcessId, Ref};
pub use registry::{
    canonical_name, global_registry, CustomShape, Field, RegisteredType, Shape, TypeRegistry,
};
pub use time::Timestamp;
pub use types::{ScalarKind, TypeDesc};
pub use value::Value;
