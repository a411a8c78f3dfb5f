// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Session configuration loaded from TOML.
//!
//! ```toml
//! max_depth = 64
//! max_items = 65536
//!
//! [atom_cache]
//! 1 = "node@host"
//!
//! [atom_mapping]
//! "local@host" = "node@host"
//!
//! [reg_cache]
//! 2 = "#github.com/sllt/sparrow/gen/Version"
//!
//! [err_cache]
//! 3 = "timed out"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::core::{Result, SdfError};
use crate::encoding::sdf::{
    AtomMapping, CacheTable, Options, DEFAULT_MAX_DEPTH, DEFAULT_MAX_ITEMS,
};

/// Cache tables and limits for one session, as written in a config file.
///
/// Cache tables are keyed by their 16-bit id.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    #[serde(default)]
    pub atom_cache: BTreeMap<String, String>,

    #[serde(default)]
    pub atom_mapping: BTreeMap<String, String>,

    #[serde(default)]
    pub reg_cache: BTreeMap<String, String>,

    #[serde(default)]
    pub err_cache: BTreeMap<String, String>,

    /// Nesting limit, 128 when absent
    pub max_depth: Option<usize>,

    /// Container items decoded per value, 1048576 when absent
    pub max_items: Option<usize>,
}

impl SessionConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| SdfError::invalid_data("session config", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SdfError::Other(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Check ids and limits without building the tables.
    pub fn validate(&self) -> Result<()> {
        for (section, table) in self.tables() {
            build_table(section, table)?;
        }
        if self.max_depth == Some(0) {
            return Err(SdfError::invalid_data(
                "session config",
                "max_depth must be positive",
            ));
        }
        if self.max_items == Some(0) {
            return Err(SdfError::invalid_data(
                "session config",
                "max_items must be positive",
            ));
        }
        Ok(())
    }

    /// Codec options holding this session's tables.
    pub fn to_options(&self) -> Result<Options> {
        let mut options = Options::new()
            .with_max_depth(self.max_depth.unwrap_or(DEFAULT_MAX_DEPTH))
            .with_max_items(self.max_items.unwrap_or(DEFAULT_MAX_ITEMS));
        if !self.atom_cache.is_empty() {
            options = options.with_atom_cache(build_table("atom_cache", &self.atom_cache)?);
        }
        if !self.reg_cache.is_empty() {
            options = options.with_reg_cache(build_table("reg_cache", &self.reg_cache)?);
        }
        if !self.err_cache.is_empty() {
            options = options.with_err_cache(build_table("err_cache", &self.err_cache)?);
        }
        if !self.atom_mapping.is_empty() {
            let mapping: AtomMapping = self.atom_mapping.clone().into_iter().collect();
            options = options.with_atom_mapping(mapping);
        }
        Ok(options)
    }

    fn tables(&self) -> [(&'static str, &BTreeMap<String, String>); 3] {
        [
            ("atom_cache", &self.atom_cache),
            ("reg_cache", &self.reg_cache),
            ("err_cache", &self.err_cache),
        ]
    }
}

fn build_table(section: &str, entries: &BTreeMap<String, String>) -> Result<CacheTable> {
    let mut table = CacheTable::new();
    for (id, value) in entries {
        let id: u16 = id.trim().parse().map_err(|_| {
            SdfError::invalid_data(
                "session config",
                format!("[{section}] key '{id}' is not a 16-bit cache id"),
            )
        })?;
        if table.value_of(id).is_some() {
            return Err(SdfError::invalid_data(
                "session config",
                format!("[{section}] id {id} is listed more than once"),
            ));
        }
        if table.id_of(value).is_some() {
            return Err(SdfError::invalid_data(
                "session config",
                format!("[{section}] value '{value}' has more than one id"),
            ));
        }
        table.insert(id, value.as_str());
    }
    Ok(table)
}
