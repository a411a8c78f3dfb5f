// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Session cache tables and codec options.
//!
//! Atoms, registered names and error messages share one wire form: a 2-byte value that is
//! either a cache id or, when the value is not cached, the byte length of the literal that
//! follows. Both sides must use consistent tables; the wire cannot tell the two apart.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use byteorder::{BigEndian, WriteBytesExt};
use tracing::trace;

use super::cursor::SdfCursor;
use crate::core::{Result, SdfError, TypeDesc};

/// Default nesting limit for encode and decode.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Default limit on container items materialized while decoding one value.
pub const DEFAULT_MAX_ITEMS: usize = 1 << 20;

/// Default number of descriptors a [`DescriptorCache`] keeps per direction.
pub const DEFAULT_DESCRIPTOR_CACHE_CAPACITY: usize = 1024;

/// Bidirectional string ↔ 16-bit id table for one session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheTable {
    by_value: HashMap<String, u16>,
    by_id: HashMap<u16, String>,
}

impl CacheTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate `id` with `value`, replacing any previous association of either.
    pub fn insert(&mut self, id: u16, value: impl Into<String>) {
        let value = value.into();
        if let Some(old) = self.by_id.insert(id, value.clone()) {
            self.by_value.remove(&old);
        }
        if let Some(old_id) = self.by_value.insert(value, id) {
            if old_id != id {
                self.by_id.remove(&old_id);
            }
        }
    }

    pub fn id_of(&self, value: &str) -> Option<u16> {
        self.by_value.get(value).copied()
    }

    pub fn value_of(&self, id: u16) -> Option<&str> {
        self.by_id.get(&id).map(String::as_str)
    }

    /// Entries ordered by id.
    pub fn entries(&self) -> Vec<(u16, &str)> {
        let mut entries: Vec<(u16, &str)> = self
            .by_id
            .iter()
            .map(|(id, value)| (*id, value.as_str()))
            .collect();
        entries.sort_unstable_by_key(|(id, _)| *id);
        entries
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(u16, S)> for CacheTable {
    fn from_iter<I: IntoIterator<Item = (u16, S)>>(iter: I) -> Self {
        let mut table = CacheTable::new();
        for (id, value) in iter {
            table.insert(id, value);
        }
        table
    }
}

/// One-directional atom rename table.
///
/// The encoder maps local atoms to wire atoms before the cache lookup; the decoder maps
/// wire atoms to local atoms after resolution. Each side keys its own table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AtomMapping(HashMap<String, String>);

impl AtomMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.0.insert(from.into(), to.into());
    }

    /// Mapped form of `atom`, or `atom` itself when unmapped.
    pub fn apply<'a>(&'a self, atom: &'a str) -> &'a str {
        self.0.get(atom).map_or(atom, String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<A: Into<String>, B: Into<String>> FromIterator<(A, B)> for AtomMapping {
    fn from_iter<I: IntoIterator<Item = (A, B)>>(iter: I) -> Self {
        AtomMapping(
            iter.into_iter()
                .map(|(from, to)| (from.into(), to.into()))
                .collect(),
        )
    }
}

/// Session-scoped acceleration cache for serialized descriptors.
///
/// Descriptor bytes embed registered-name ids, so one cache must only be shared by calls
/// that use the same registered-name table. Not part of the wire contract.
///
/// Each direction holds at most `capacity` entries. Once full, new descriptors are served
/// uncached; descriptor bytes arriving from a peer cannot grow it without bound.
#[derive(Debug)]
pub struct DescriptorCache {
    capacity: usize,
    encoded: RwLock<HashMap<TypeDesc, Arc<[u8]>>>,
    decoded: RwLock<HashMap<Vec<u8>, TypeDesc>>,
}

impl Default for DescriptorCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_DESCRIPTOR_CACHE_CAPACITY)
    }
}

impl DescriptorCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            encoded: RwLock::new(HashMap::new()),
            decoded: RwLock::new(HashMap::new()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn encoded(&self, desc: &TypeDesc) -> Option<Arc<[u8]>> {
        self.encoded.read().ok()?.get(desc).cloned()
    }

    pub(crate) fn store_encoded(&self, desc: &TypeDesc, bytes: Arc<[u8]>) {
        if let Ok(mut encoded) = self.encoded.write() {
            if encoded.len() < self.capacity || encoded.contains_key(desc) {
                encoded.insert(desc.clone(), bytes);
            }
        }
    }

    pub(crate) fn decoded(&self, bytes: &[u8]) -> Option<TypeDesc> {
        self.decoded.read().ok()?.get(bytes).cloned()
    }

    pub(crate) fn store_decoded(&self, bytes: &[u8], desc: &TypeDesc) {
        if let Ok(mut decoded) = self.decoded.write() {
            if decoded.len() < self.capacity {
                decoded.insert(bytes.to_vec(), desc.clone());
            } else {
                trace!(capacity = self.capacity, "descriptor cache full, not storing");
            }
        }
    }

    /// Number of cached descriptors in each direction.
    pub fn sizes(&self) -> (usize, usize) {
        let encoded = self.encoded.read().map_or(0, |m| m.len());
        let decoded = self.decoded.read().map_or(0, |m| m.len());
        (encoded, decoded)
    }
}

/// Per-call codec options. Every table is optional; the default caches nothing.
#[derive(Debug, Clone)]
pub struct Options {
    pub atom_cache: Option<Arc<CacheTable>>,
    pub atom_mapping: Option<Arc<AtomMapping>>,
    pub reg_cache: Option<Arc<CacheTable>>,
    pub err_cache: Option<Arc<CacheTable>>,
    pub cache: Option<Arc<DescriptorCache>>,
    /// Maximum nesting depth accepted by encoder and decoder
    pub max_depth: usize,
    /// Maximum slice, array and map items the decoder builds for one value
    pub max_items: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            atom_cache: None,
            atom_mapping: None,
            reg_cache: None,
            err_cache: None,
            cache: None,
            max_depth: DEFAULT_MAX_DEPTH,
            max_items: DEFAULT_MAX_ITEMS,
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_atom_cache(mut self, table: impl Into<Arc<CacheTable>>) -> Self {
        self.atom_cache = Some(table.into());
        self
    }

    pub fn with_atom_mapping(mut self, mapping: impl Into<Arc<AtomMapping>>) -> Self {
        self.atom_mapping = Some(mapping.into());
        self
    }

    pub fn with_reg_cache(mut self, table: impl Into<Arc<CacheTable>>) -> Self {
        self.reg_cache = Some(table.into());
        self
    }

    pub fn with_err_cache(mut self, table: impl Into<Arc<CacheTable>>) -> Self {
        self.err_cache = Some(table.into());
        self
    }

    pub fn with_cache(mut self, cache: impl Into<Arc<DescriptorCache>>) -> Self {
        self.cache = Some(cache.into());
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    /// Local atom as it goes on the wire.
    pub(crate) fn outgoing_atom<'a>(&'a self, atom: &'a str) -> &'a str {
        match &self.atom_mapping {
            Some(mapping) => mapping.apply(atom),
            None => atom,
        }
    }

    /// Wire atom as it is handed to the caller.
    pub(crate) fn incoming_atom(&self, atom: &str) -> String {
        self.outgoing_atom(atom).to_string()
    }
}

/// Write `value` as a cache id when `cache` knows it, inline otherwise.
pub fn write_id_or_inline(
    sink: &mut Vec<u8>,
    value: &str,
    cache: Option<&CacheTable>,
    kind: &str,
) -> Result<()> {
    if let Some(id) = cache.and_then(|c| c.id_of(value)) {
        sink.write_u16::<BigEndian>(id)?;
        return Ok(());
    }
    let len = u16::try_from(value.len()).map_err(|_| {
        SdfError::unsupported(kind, format!("{} bytes exceed the 65535 byte limit", value.len()))
    })?;
    sink.write_u16::<BigEndian>(len)?;
    sink.extend_from_slice(value.as_bytes());
    Ok(())
}

/// Read a value written by [`write_id_or_inline`].
pub fn read_id_or_inline(
    cursor: &mut SdfCursor<'_>,
    cache: Option<&CacheTable>,
    kind: &str,
) -> Result<String> {
    let v = cursor.read_u16()?;
    if let Some(cached) = cache.and_then(|c| c.value_of(v)) {
        return Ok(cached.to_string());
    }
    Ok(cursor.read_str(v as usize, kind)?.to_string())
}
