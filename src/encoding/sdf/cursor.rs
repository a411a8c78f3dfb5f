// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Bounds-checked big-endian reader over an encoded buffer.
//!
//! SDF is unaligned and big-endian throughout. Every read checks the remaining length
//! first and reports [`SdfError::Truncated`] with the cursor position on shortfall.
//!
//! # Example
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use sdfcodec::encoding::sdf::cursor::SdfCursor;
//!
//! let data = [0x01, 0x2C, 0xFF];
//! let mut cursor = SdfCursor::new(&data);
//! assert_eq!(cursor.read_u16()?, 300);
//! assert_eq!(cursor.read_u8()?, 0xFF);
//! assert!(cursor.is_at_end());
//! # Ok(())
//! # }
//! ```

use byteorder::{BigEndian, ByteOrder};

use crate::core::{Result, SdfError};

/// Cursor that tracks the read position inside an encoded buffer.
pub struct SdfCursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> SdfCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Bytes consumed so far.
    #[inline]
    pub fn position(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.offset)
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.offset >= self.data.len()
    }

    /// Take the next `count` bytes.
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        if count > self.remaining() {
            return Err(SdfError::truncated(count, self.remaining(), self.offset));
        }
        let start = self.offset;
        self.offset += count;
        Ok(&self.data[start..self.offset])
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(BigEndian::read_u16(self.read_bytes(2)?))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(BigEndian::read_i16(self.read_bytes(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(BigEndian::read_u32(self.read_bytes(4)?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(BigEndian::read_i32(self.read_bytes(4)?))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(BigEndian::read_u64(self.read_bytes(8)?))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(BigEndian::read_i64(self.read_bytes(8)?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(BigEndian::read_f32(self.read_bytes(4)?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(BigEndian::read_f64(self.read_bytes(8)?))
    }

    /// Read a 4-byte count and check that at least `min_item_size` bytes per item remain.
    ///
    /// Rejects counts that cannot possibly fit before any allocation happens.
    pub fn read_count(&mut self, min_item_size: usize) -> Result<usize> {
        let position = self.offset;
        let count = self.read_u32()? as usize;
        let needed = count.saturating_mul(min_item_size);
        if needed > self.remaining() {
            return Err(SdfError::truncated(needed, self.remaining(), position + 4));
        }
        Ok(count)
    }

    /// Read a UTF-8 string of `len` bytes.
    pub fn read_str(&mut self, len: usize, context: &str) -> Result<&'a str> {
        let bytes = self.read_bytes(len)?;
        std::str::from_utf8(bytes).map_err(|e| SdfError::invalid_data(context, e.to_string()))
    }
}
