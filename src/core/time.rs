// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Timestamps and their binary blob.
//!
//! The blob is the one produced by the peer runtime's binary time marshaller:
//!
//! ```text
//! version 1 (15 bytes): [1][seconds i64][nanos i32][offset minutes i16]
//! version 2 (16 bytes): [2][seconds i64][nanos i32][offset minutes i16][offset seconds i8]
//! ```
//!
//! Seconds count from 0001-01-01T00:00:00Z. An offset of -1 minutes marks UTC.

use std::fmt;

use byteorder::{BigEndian, ByteOrder, WriteBytesExt};
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::error::{Result, SdfError};

/// Seconds between 0001-01-01T00:00:00Z and the Unix epoch.
pub const UNIX_TO_INTERNAL: i64 = 62_135_596_800;

const BLOB_V1: u8 = 1;
const BLOB_V2: u8 = 2;
const BLOB_V1_LEN: usize = 15;
const BLOB_V2_LEN: usize = 16;
const UTC_MARKER: i16 = -1;

/// Wall-clock instant with an optional fixed zone offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    /// Seconds since 0001-01-01T00:00:00Z
    pub seconds: i64,
    /// Nanoseconds within the second, `0..1_000_000_000`
    pub nanos: i32,
    /// Zone offset in seconds east of UTC; `None` is UTC itself
    pub offset: Option<i32>,
}

impl Timestamp {
    /// UTC timestamp from Unix seconds and nanoseconds. Seconds saturate at the i64 range.
    pub fn from_unix(seconds: i64, nanos: u32) -> Self {
        Timestamp {
            seconds: seconds.saturating_add(UNIX_TO_INTERNAL),
            nanos: nanos as i32,
            offset: None,
        }
    }

    /// Seconds since the Unix epoch, `None` when not representable as i64.
    pub fn unix_seconds(&self) -> Option<i64> {
        self.seconds.checked_sub(UNIX_TO_INTERNAL)
    }

    /// Convert to a UTC date-time. `None` when outside chrono's range.
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        let nanos = u32::try_from(self.nanos).ok()?;
        DateTime::<Utc>::from_timestamp(self.unix_seconds()?, nanos)
    }

    /// Convert to a date-time in the recorded zone offset (UTC when none).
    pub fn to_fixed(&self) -> Option<DateTime<FixedOffset>> {
        let offset = FixedOffset::east_opt(self.offset.unwrap_or(0))?;
        Some(self.to_utc()?.with_timezone(&offset))
    }

    /// Encoded blob length for this timestamp.
    pub fn blob_len(&self) -> usize {
        match self.offset {
            Some(offset) if offset % 60 != 0 => BLOB_V2_LEN,
            _ => BLOB_V1_LEN,
        }
    }

    /// Append the binary blob (without its length byte).
    pub fn write_blob(&self, sink: &mut Vec<u8>) -> Result<()> {
        if !(0..1_000_000_000).contains(&self.nanos) {
            return Err(SdfError::unsupported(
                "time",
                format!("nanoseconds out of range: {}", self.nanos),
            ));
        }
        let (minutes, extra_seconds) = match self.offset {
            None => (UTC_MARKER, None),
            Some(offset) => {
                let minutes = offset / 60;
                if minutes < i16::MIN as i32 || minutes > i16::MAX as i32 || minutes == -1 {
                    return Err(SdfError::unsupported(
                        "time",
                        format!("zone offset {offset}s cannot be encoded"),
                    ));
                }
                let seconds = offset % 60;
                (minutes as i16, (seconds != 0).then_some(seconds as i8))
            }
        };

        sink.push(if extra_seconds.is_some() { BLOB_V2 } else { BLOB_V1 });
        sink.write_i64::<BigEndian>(self.seconds)?;
        sink.write_i32::<BigEndian>(self.nanos)?;
        sink.write_i16::<BigEndian>(minutes)?;
        if let Some(seconds) = extra_seconds {
            sink.write_i8(seconds)?;
        }
        Ok(())
    }

    /// Parse a version 1 or version 2 blob.
    pub fn read_blob(blob: &[u8]) -> Result<Self> {
        let (version, body) = blob
            .split_first()
            .ok_or_else(|| SdfError::invalid_data("time", "empty blob"))?;
        let expected = match *version {
            BLOB_V1 => BLOB_V1_LEN,
            BLOB_V2 => BLOB_V2_LEN,
            other => {
                return Err(SdfError::invalid_data(
                    "time",
                    format!("unsupported blob version {other}"),
                ))
            }
        };
        if blob.len() != expected {
            return Err(SdfError::invalid_data(
                "time",
                format!("blob length {} for version {version}", blob.len()),
            ));
        }

        let seconds = BigEndian::read_i64(&body[0..8]);
        let nanos = BigEndian::read_i32(&body[8..12]);
        let minutes = BigEndian::read_i16(&body[12..14]);
        if !(0..1_000_000_000).contains(&nanos) {
            return Err(SdfError::invalid_data(
                "time",
                format!("nanoseconds out of range: {nanos}"),
            ));
        }

        let mut offset = if minutes == UTC_MARKER {
            None
        } else {
            Some(minutes as i32 * 60)
        };
        if *version == BLOB_V2 {
            let seconds_part = body[14] as i8 as i32;
            offset = Some(offset.unwrap_or(0) + seconds_part);
        }

        Ok(Timestamp {
            seconds,
            nanos,
            offset,
        })
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Timestamp::from_unix(dt.timestamp(), dt.timestamp_subsec_nanos())
    }
}

impl From<DateTime<FixedOffset>> for Timestamp {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        let mut ts = Timestamp::from_unix(dt.timestamp(), dt.timestamp_subsec_nanos());
        ts.offset = Some(dt.offset().local_minus_utc());
        ts
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_fixed() {
            Some(dt) if self.offset.is_none() => write!(f, "{}", dt.with_timezone(&Utc).to_rfc3339()),
            Some(dt) => write!(f, "{}", dt.to_rfc3339()),
            None => write!(f, "{}s+{}ns", self.seconds, self.nanos),
        }
    }
}

/// Current wall-clock time in UTC.
pub fn now() -> Timestamp {
    Timestamp::from(Utc::now())
}

/// UTC timestamp for a calendar date at midnight, `None` for invalid dates.
pub fn utc_date(year: i32, month: u32, day: u32) -> Option<Timestamp> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .map(Timestamp::from)
}
