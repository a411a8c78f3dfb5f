// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Wire encodings.
//!
//! - [`sdf`] - SDF encoder, decoder, session caches and descriptor grammar

pub mod sdf;

pub use sdf::{Options, SdfCodec, SdfDecoder, SdfEncoder};
