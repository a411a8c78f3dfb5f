// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Wire tag table.
//!
//! One byte per tag. Values are part of the wire contract and never reused.

/// Anonymous composite descriptor follows.
pub const TYPE: u8 = 130;
/// Registered type name or id follows. Also the section marker of registered containers.
pub const REG: u8 = 131;
/// Polymorphic slot (descriptor use only).
pub const ANY: u8 = 132;

pub const ATOM: u8 = 140;
pub const STRING: u8 = 141;
pub const BINARY: u8 = 142;
pub const FLOAT32: u8 = 143;
pub const FLOAT64: u8 = 144;
pub const BOOL: u8 = 145;
pub const INT8: u8 = 146;
pub const INT16: u8 = 147;
pub const INT32: u8 = 148;
pub const INT64: u8 = 149;
pub const INT: u8 = 150;
pub const UINT8: u8 = 151;
pub const UINT16: u8 = 152;
pub const UINT32: u8 = 153;
pub const UINT64: u8 = 154;
pub const UINT: u8 = 155;
pub const ERROR: u8 = 156;
pub const SLICE: u8 = 157;
pub const ARRAY: u8 = 158;
pub const MAP: u8 = 159;

pub const PID: u8 = 170;
pub const PROCESS_ID: u8 = 171;
pub const ALIAS: u8 = 172;
pub const EVENT: u8 = 173;
pub const REF: u8 = 174;
pub const TIME: u8 = 175;

/// Absent value.
pub const NIL: u8 = 255;

/// Human readable name of a tag, for diagnostics.
pub const fn tag_name(tag: u8) -> &'static str {
    match tag {
        TYPE => "type",
        REG => "reg",
        ANY => "any",
        ATOM => "atom",
        STRING => "string",
        BINARY => "binary",
        FLOAT32 => "float32",
        FLOAT64 => "float64",
        BOOL => "bool",
        INT8 => "int8",
        INT16 => "int16",
        INT32 => "int32",
        INT64 => "int64",
        INT => "int",
        UINT8 => "uint8",
        UINT16 => "uint16",
        UINT32 => "uint32",
        UINT64 => "uint64",
        UINT => "uint",
        ERROR => "error",
        SLICE => "slice",
        ARRAY => "array",
        MAP => "map",
        PID => "pid",
        PROCESS_ID => "process_id",
        ALIAS => "alias",
        EVENT => "event",
        REF => "ref",
        TIME => "time",
        NIL => "nil",
        _ => "unknown",
    }
}
