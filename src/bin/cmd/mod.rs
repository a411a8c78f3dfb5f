// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CLI subcommands.

mod decode;
mod registry;

pub use decode::DecodeCmd;
pub use registry::{ErrorsCmd, ShowCmd, TypesCmd};
