// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Atoms and the framework identity types.
//!
//! Wire layouts (after the tag, big-endian):
//! - `Pid`: node atom, id `u64`, creation `i64`
//! - `ProcessId` / `Event`: node atom, name atom
//! - `Ref` / `Alias`: node atom, creation `i64`, three `u64` id words

use std::fmt;

use serde::{Deserialize, Serialize};

/// Interned identifier-like string, distinct from a general string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Atom(String);

impl Atom {
    pub fn new(s: impl Into<String>) -> Self {
        Atom(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Atom {
    fn from(s: &str) -> Self {
        Atom(s.to_string())
    }
}

impl From<String> for Atom {
    fn from(s: String) -> Self {
        Atom(s)
    }
}

impl AsRef<str> for Atom {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.0)
    }
}

/// Process identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pid {
    pub node: Atom,
    pub id: u64,
    pub creation: i64,
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}.{}.{}>", self.node.as_str(), self.creation, self.id)
    }
}

/// Registered process name on a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProcessId {
    pub name: Atom,
    pub node: Atom,
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}.{}>", self.node.as_str(), self.name.as_str())
    }
}

/// Named event on a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Event {
    pub name: Atom,
    pub node: Atom,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Event#<{}:{}>", self.node.as_str(), self.name.as_str())
    }
}

/// Unique reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ref {
    pub node: Atom,
    pub creation: i64,
    pub id: [u64; 3],
}

impl fmt::Display for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ref#<{}.{}.{}.{}.{}>",
            self.node.as_str(),
            self.creation,
            self.id[0],
            self.id[1],
            self.id[2]
        )
    }
}

/// Process alias. Same layout as [`Ref`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Alias {
    pub node: Atom,
    pub creation: i64,
    pub id: [u64; 3],
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Alias#<{}.{}.{}.{}.{}>",
            self.node.as_str(),
            self.creation,
            self.id[0],
            self.id[1],
            self.id[2]
        )
    }
}
