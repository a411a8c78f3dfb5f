// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Framework types shared by every node.
//!
//! Listed in dependency order: a type only refers to types above it.

use crate::core::registry::{canonical_name, Field, Shape};
use crate::core::{ScalarKind, TypeDesc};

/// Module path of the framework's generic types.
pub const GEN_PATH: &str = "github.com/sllt/sparrow/gen";

/// Module path of the handshake messages.
pub const HANDSHAKE_PATH: &str = "github.com/sllt/sparrow/net/handshake";

/// Registered name of a framework type.
pub fn gen_name(type_name: &str) -> String {
    canonical_name(GEN_PATH, type_name)
}

/// Registered name of a handshake message.
pub fn handshake_name(type_name: &str) -> String {
    canonical_name(HANDSHAKE_PATH, type_name)
}

fn named(type_name: &str) -> TypeDesc {
    TypeDesc::registered(gen_name(type_name))
}

/// Generic framework types with their shapes.
pub fn gen_types() -> Vec<(String, Shape)> {
    use ScalarKind::*;

    let scalars = [
        ("Env", String),
        ("LogLevel", Int),
        ("ProcessState", Int32),
        ("MetaState", Int32),
        ("NetworkMode", Int),
        ("MessagePriority", Int),
        ("CompressionType", String),
        ("CompressionLevel", Int),
        ("ApplicationMode", Int),
        ("ApplicationState", Int32),
    ];

    let mut types: Vec<(std::string::String, Shape)> = scalars
        .into_iter()
        .map(|(name, kind)| (gen_name(name), Shape::Scalar(kind)))
        .collect();

    types.push((
        gen_name("Version"),
        Shape::structure([("Name", String), ("Release", String), ("License", String)]),
    ));
    types.push((
        gen_name("ApplicationDepends"),
        Shape::Struct(vec![
            Field::new("Applications", TypeDesc::slice(Atom)),
            Field::new("Network", Bool),
        ]),
    ));
    types.push((
        gen_name("Compression"),
        Shape::Struct(vec![
            Field::new("Enable", Bool),
            Field::new("Type", named("CompressionType")),
            Field::new("Level", named("CompressionLevel")),
            Field::new("Threshold", Int),
        ]),
    ));
    types.push((
        gen_name("NetworkFlags"),
        Shape::structure([
            ("Enable", Bool),
            ("EnableRemoteSpawn", Bool),
            ("EnableRemoteApplicationStart", Bool),
            ("EnableFragmentation", Bool),
            ("EnableProxyTransit", Bool),
            ("EnableProxyAccept", Bool),
            ("EnableImportantDelivery", Bool),
        ]),
    ));
    types.push((
        gen_name("NetworkProxyFlags"),
        Shape::structure([
            ("Enable", Bool),
            ("EnableRemoteSpawn", Bool),
            ("EnableRemoteApplicationStart", Bool),
            ("EnableEncryption", Bool),
            ("EnableImportantDelivery", Bool),
        ]),
    ));
    types.push((
        gen_name("MessageEvent"),
        Shape::structure([
            ("Event", TypeDesc::from(Event)),
            ("Timestamp", TypeDesc::from(Int64)),
            ("Message", TypeDesc::Any),
        ]),
    ));
    types.push((
        gen_name("MessageEventStart"),
        Shape::structure([("Name", Event)]),
    ));
    types.push((
        gen_name("MessageEventStop"),
        Shape::structure([("Name", Event)]),
    ));
    types
}

/// Handshake messages exchanged while a connection is established.
pub fn handshake_types() -> Vec<(String, Shape)> {
    use ScalarKind::*;

    vec![
        (
            handshake_name("MessageHello"),
            Shape::structure([("Salt", String), ("Digest", String), ("DigestCert", String)]),
        ),
        (
            handshake_name("MessageJoin"),
            Shape::structure([
                ("Node", Atom),
                ("ConnectionID", String),
                ("Salt", String),
                ("Digest", String),
            ]),
        ),
        (
            handshake_name("MessageIntroduce"),
            Shape::structure([
                ("Node", TypeDesc::from(Atom)),
                ("Version", named("Version")),
                ("Flags", named("NetworkFlags")),
                ("Creation", TypeDesc::from(Int64)),
                ("MaxMessageSize", TypeDesc::from(Int)),
                ("AtomCache", TypeDesc::map(Uint16, Atom)),
                ("RegCache", TypeDesc::map(Uint16, String)),
                ("ErrCache", TypeDesc::map(Uint16, Error)),
                ("Digest", TypeDesc::from(String)),
            ]),
        ),
        (
            handshake_name("MessageAccept"),
            Shape::structure([
                ("ID", TypeDesc::from(String)),
                ("PoolSize", TypeDesc::from(Int)),
                ("PoolDSN", TypeDesc::slice(String)),
                ("Digest", TypeDesc::from(String)),
                ("DigestCert", TypeDesc::from(String)),
            ]),
        ),
    ]
}
