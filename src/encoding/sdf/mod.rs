// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! SDF binary format.
//!
//! Big-endian, unaligned, self-describing where the reader lacks static type knowledge.

pub mod cache;
pub mod codec;
pub mod cursor;
pub mod decoder;
pub mod descriptor;
pub mod encoder;

pub use cache::{
    AtomMapping, CacheTable, DescriptorCache, Options, DEFAULT_DESCRIPTOR_CACHE_CAPACITY,
    DEFAULT_MAX_DEPTH, DEFAULT_MAX_ITEMS,
};
pub use codec::SdfCodec;
pub use cursor::SdfCursor;
pub use decoder::SdfDecoder;
pub use encoder::SdfEncoder;
