// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Framework types and errors known to every node.
//!
//! [`register_all`] runs once when the global registry is first used.

pub mod errors;
pub mod handshake;
pub mod types;

pub use errors::*;
pub use handshake::SessionTables;
pub use types::{gen_name, handshake_name, GEN_PATH, HANDSHAKE_PATH};

use tracing::{debug, error};

use crate::core::registry::TypeRegistry;
use crate::core::{Result, SdfError};

/// Register the framework types and error messages.
///
/// Names already taken are skipped. Any other failure is logged and leaves the entry out.
pub fn register_all(registry: &TypeRegistry) {
    let mut registered = 0;
    for (name, shape) in types::gen_types().into_iter().chain(types::handshake_types()) {
        match tolerate_taken(registry.register_type(name.as_str(), shape)) {
            Ok(()) => registered += 1,
            Err(err) => error!(name = %name, error = %err, "framework type registration failed"),
        }
    }

    for message in FRAMEWORK_ERRORS {
        if let Err(err) = tolerate_taken(registry.register_error(message)) {
            error!(message, error = %err, "framework error registration failed");
        }
    }
    debug!(types = registered, errors = FRAMEWORK_ERRORS.len(), "framework registered");
}

fn tolerate_taken(result: Result<()>) -> Result<()> {
    match result {
        Err(SdfError::NameTaken { .. }) => Ok(()),
        other => other,
    }
}
