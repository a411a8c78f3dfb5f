// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Session cache tables carried by the `MessageIntroduce` handshake message.
//!
//! Each peer announces the atom, registered-name and error caches it will encode with.
//! The receiving side installs them as its decode tables for that connection.

use std::sync::Arc;

use super::types::handshake_name;
use crate::core::{Result, ScalarKind, SdfError, Value};
use crate::encoding::sdf::{CacheTable, Options};

const FIELD_ATOM_CACHE: usize = 5;
const FIELD_REG_CACHE: usize = 6;
const FIELD_ERR_CACHE: usize = 7;

/// The three id-or-inline tables of one connection direction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionTables {
    pub atom_cache: CacheTable,
    pub reg_cache: CacheTable,
    pub err_cache: CacheTable,
}

impl SessionTables {
    /// Read the tables a peer announced in its `MessageIntroduce`.
    pub fn from_introduce(introduce: &Value) -> Result<Self> {
        let expected = handshake_name("MessageIntroduce");
        match introduce {
            Value::Registered { name, .. } if *name == expected => {}
            other => {
                return Err(SdfError::invalid_data(
                    "handshake",
                    format!("expected {expected}, found {}", other.type_name()),
                ))
            }
        }

        Ok(SessionTables {
            atom_cache: table_from_field(introduce, FIELD_ATOM_CACHE, "AtomCache")?,
            reg_cache: table_from_field(introduce, FIELD_REG_CACHE, "RegCache")?,
            err_cache: table_from_field(introduce, FIELD_ERR_CACHE, "ErrCache")?,
        })
    }

    /// Map values for the `AtomCache`, `RegCache` and `ErrCache` fields.
    pub fn to_fields(&self) -> [Value; 3] {
        [
            cache_map(&self.atom_cache, ScalarKind::Atom, |s| Value::atom(s)),
            cache_map(&self.reg_cache, ScalarKind::String, |s| Value::string(s)),
            cache_map(&self.err_cache, ScalarKind::Error, |s| Value::error(s)),
        ]
    }

    /// Options that use these tables, keeping the rest of `base`.
    pub fn into_options(self, base: Options) -> Options {
        Options {
            atom_cache: Some(Arc::new(self.atom_cache)),
            reg_cache: Some(Arc::new(self.reg_cache)),
            err_cache: Some(Arc::new(self.err_cache)),
            ..base
        }
    }
}

fn table_from_field(introduce: &Value, index: usize, field: &str) -> Result<CacheTable> {
    let value = introduce
        .field(index)
        .ok_or_else(|| SdfError::invalid_data("handshake", format!("missing field {field}")))?;
    if value.is_nil() {
        return Ok(CacheTable::new());
    }
    let entries = match value {
        Value::Map { entries: None, .. } => return Ok(CacheTable::new()),
        Value::Map {
            entries: Some(entries),
            ..
        } => entries,
        other => {
            return Err(SdfError::invalid_data(
                "handshake",
                format!("field {field} is {}", other.type_name()),
            ))
        }
    };

    entries
        .iter()
        .map(|(id, value)| match (id, value.as_str()) {
            (Value::Uint16(id), Some(text)) => Ok((*id, text.to_string())),
            _ => Err(SdfError::invalid_data(
                "handshake",
                format!("bad entry in {field}: {id} => {value}"),
            )),
        })
        .collect()
}

fn cache_map<F>(table: &CacheTable, kind: ScalarKind, make: F) -> Value
where
    F: Fn(&str) -> Value,
{
    let entries = table
        .entries()
        .into_iter()
        .map(|(id, text)| (Value::Uint16(id), make(text)))
        .collect();
    Value::map(ScalarKind::Uint16, kind, entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn introduce(tables: &SessionTables) -> Value {
        let [atoms, regs, errs] = tables.to_fields();
        Value::registered(
            handshake_name("MessageIntroduce"),
            Value::Struct(vec![
                Value::atom("node@host"),
                Value::Nil,
                Value::Nil,
                Value::Int64(1),
                Value::Int(0),
                atoms,
                regs,
                errs,
                Value::string(""),
            ]),
        )
    }

    #[test]
    fn test_tables_round_trip_through_introduce() {
        let tables = SessionTables {
            atom_cache: [(1u16, "a@b")].into_iter().collect(),
            reg_cache: [(2u16, "#x/Y")].into_iter().collect(),
            err_cache: [(3u16, "boom")].into_iter().collect(),
        };
        let parsed = SessionTables::from_introduce(&introduce(&tables)).unwrap();
        assert_eq!(parsed, tables);

        let options = parsed.into_options(Options::default().with_max_depth(9));
        assert_eq!(options.max_depth, 9);
        assert_eq!(
            options.err_cache.as_ref().and_then(|c| c.value_of(3)),
            Some("boom")
        );
    }

    #[test]
    fn test_rejects_other_messages() {
        let err = SessionTables::from_introduce(&Value::Bool(true)).unwrap_err();
        assert!(matches!(err, SdfError::InvalidData { .. }));
    }
}
