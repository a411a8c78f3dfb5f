// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Registry commands - list and show registered types and errors.

use clap::Args;
use serde::Serialize;

use crate::common::Result;
use sdfcodec::{global_registry, Shape};

/// List registered type names.
#[derive(Args, Clone, Debug)]
pub struct TypesCmd {
    /// Filter names by substring (case-insensitive)
    #[arg(short, long)]
    filter: Option<String>,

    /// Output as JSON
    #[arg(short, long)]
    json: bool,
}

/// List registered error messages.
#[derive(Args, Clone, Debug)]
pub struct ErrorsCmd {
    /// Output as JSON
    #[arg(short, long)]
    json: bool,
}

/// Show the shape of a registered type.
#[derive(Args, Clone, Debug)]
pub struct ShowCmd {
    /// Registered name, or a unique name suffix such as `gen/Version`
    #[arg(value_name = "NAME")]
    name: String,
}

#[derive(Serialize)]
struct TypeEntry {
    name: String,
    kind: &'static str,
}

impl TypesCmd {
    pub fn run(self) -> Result<()> {
        let registry = global_registry();
        let pattern = self.filter.map(|f| f.to_lowercase());

        let mut entries = Vec::new();
        for name in registry.names()? {
            if let Some(ref pattern) = pattern {
                if !name.to_lowercase().contains(pattern) {
                    continue;
                }
            }
            if let Some(registered) = registry.lookup(&name)? {
                entries.push(TypeEntry {
                    kind: registered.shape().kind(),
                    name,
                });
            }
        }

        if self.json {
            println!("{}", serde_json::to_string_pretty(&entries)?);
            return Ok(());
        }

        for entry in &entries {
            println!("{:<8} {}", entry.kind, entry.name);
        }
        println!();
        println!("{} types", entries.len());
        Ok(())
    }
}

impl ErrorsCmd {
    pub fn run(self) -> Result<()> {
        let messages = global_registry().error_messages()?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&messages)?);
            return Ok(());
        }

        for message in &messages {
            println!("{message}");
        }
        Ok(())
    }
}

impl ShowCmd {
    pub fn run(self) -> Result<()> {
        let registry = global_registry();
        let name = resolve_name(&registry.names()?, &self.name)?;
        let registered = registry
            .lookup(&name)?
            .ok_or_else(|| anyhow::anyhow!("Type not registered: {name}"))?;

        println!("=== {name} ===");
        match registered.shape() {
            Shape::Scalar(kind) => println!("Scalar: {kind}"),
            Shape::Slice(elem) => println!("Slice: []{elem}"),
            Shape::Array(len, elem) => println!("Array: [{len}]{elem}"),
            Shape::Map(key, value) => println!("Map: map[{key}]{value}"),
            Shape::Struct(fields) => {
                println!("Struct ({} fields):", fields.len());
                for field in fields {
                    println!("  {}: {}", field.name, field.desc);
                }
            }
            Shape::Custom(custom) => println!("Custom: {}", custom.rust_type()),
        }
        Ok(())
    }
}

/// Exact name, or the only registered name ending with `/<query>`.
fn resolve_name(names: &[String], query: &str) -> Result<String> {
    if names.iter().any(|n| n == query) {
        return Ok(query.to_string());
    }
    let suffix = format!("/{}", query.trim_start_matches('/'));
    let matches: Vec<&String> = names.iter().filter(|n| n.ends_with(&suffix)).collect();
    match matches.as_slice() {
        [only] => Ok((*only).clone()),
        [] => Err(anyhow::anyhow!("Type not registered: {query}")),
        _ => Err(anyhow::anyhow!(
            "Ambiguous type name '{query}' matches {} types",
            matches.len()
        )),
    }
}
