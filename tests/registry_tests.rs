// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Registry integration tests.
//!
//! Tests cover:
//! - The global registry and its framework entries
//! - Registering application types next to framework types
//! - Concurrent registration and encoding

mod common;

use std::sync::Arc;
use std::thread;

use common::*;
use sdfcodec::core::registry::Shape;
use sdfcodec::framework::{self, gen_name, handshake_name};
use sdfcodec::{
    global_registry, sdf_name, Options, ScalarKind, SdfCodec, SdfError, TypeDesc, TypeRegistry,
    Value,
};

// ============================================================================
// Global Registry
// ============================================================================

#[test]
fn test_global_registry_has_framework_types() {
    let registry = global_registry();
    for name in [
        gen_name("LogLevel"),
        gen_name("Version"),
        gen_name("Compression"),
        gen_name("MessageEvent"),
        handshake_name("MessageHello"),
        handshake_name("MessageJoin"),
        handshake_name("MessageIntroduce"),
        handshake_name("MessageAccept"),
    ] {
        assert!(registry.contains(&name).unwrap(), "{name} missing");
    }
}

#[test]
fn test_global_registry_has_framework_errors() {
    let messages = global_registry().error_messages().unwrap();
    for message in framework::FRAMEWORK_ERRORS {
        assert!(messages.iter().any(|m| m.as_str() == *message), "{message} missing");
    }
}

#[test]
fn test_global_registry_is_shared() {
    assert!(std::ptr::eq(global_registry(), global_registry()));
}

#[test]
fn test_framework_struct_round_trip() {
    let codec = SdfCodec::new(Options::default());
    let message = Value::registered(
        gen_name("MessageEvent"),
        Value::Struct(vec![
            Value::Event(event()),
            Value::Int64(1_700_000_000),
            Value::any_slice(vec![Value::string("payload")]),
        ]),
    );
    let bytes = codec.encode(&message).unwrap();
    assert_eq!(codec.decode(&bytes).unwrap(), (message, bytes.len()));
}

#[test]
fn test_framework_scalar_alias() {
    let codec = SdfCodec::new(Options::default());
    let level = Value::registered(gen_name("LogLevel"), Value::Int(3));
    let bytes = codec.encode(&level).unwrap();
    assert_eq!(bytes[0], 131);
    assert_eq!(&bytes[bytes.len() - 8..], &[0, 0, 0, 0, 0, 0, 0, 3]);

    let wrong = Value::registered(gen_name("LogLevel"), Value::string("debug"));
    assert!(matches!(
        codec.encode(&wrong),
        Err(SdfError::UnsupportedType { .. })
    ));
}

// ============================================================================
// Application Types
// ============================================================================

#[test]
fn test_application_types_next_to_framework() {
    let name = sdf_name!(Marker);
    assert!(name.starts_with("#registry_tests/"));
    assert!(name.ends_with("/Marker"));

    let registry = global_registry();
    registry
        .register_type(
            name.as_str(),
            Shape::structure([
                ("Version", TypeDesc::registered(gen_name("Version"))),
                ("Level", TypeDesc::registered(gen_name("LogLevel"))),
            ]),
        )
        .unwrap();
    // Same shape again is accepted.
    registry
        .register_type(
            name.as_str(),
            Shape::structure([
                ("Version", TypeDesc::registered(gen_name("Version"))),
                ("Level", TypeDesc::registered(gen_name("LogLevel"))),
            ]),
        )
        .unwrap();

    let value = Value::registered(
        name.as_str(),
        Value::Struct(vec![
            Value::registered(
                gen_name("Version"),
                Value::Struct(vec![
                    Value::string("app"),
                    Value::string("0.1"),
                    Value::string("MulanPSL-2.0"),
                ]),
            ),
            Value::registered(gen_name("LogLevel"), Value::Int(1)),
        ]),
    );
    let bytes = sdfcodec::encode(&value, &Options::default()).unwrap();
    let (decoded, used) = sdfcodec::decode(&bytes, &Options::default()).unwrap();
    assert_eq!(decoded, value);
    assert_eq!(used, bytes.len());
}

#[test]
fn test_conflicting_shape_is_rejected() {
    let registry = TypeRegistry::new();
    registry
        .register_type("#app/Id", Shape::Scalar(ScalarKind::Uint64))
        .unwrap();
    let err = registry
        .register_type("#app/Id", Shape::Scalar(ScalarKind::String))
        .unwrap_err();
    assert!(matches!(err, SdfError::NameTaken { .. }));
    assert_eq!(
        registry.lookup("#app/Id").unwrap().unwrap().shape(),
        &Shape::Scalar(ScalarKind::Uint64)
    );
}

#[test]
fn test_reference_to_unknown_type_is_rejected() {
    let registry = TypeRegistry::new();
    let err = registry
        .register_type(
            "#app/Holder",
            Shape::structure([("Inner", TypeDesc::registered("#app/Missing"))]),
        )
        .unwrap_err();
    assert!(matches!(err, SdfError::UnknownType { .. }));
    assert!(!registry.contains("#app/Holder").unwrap());
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_concurrent_registration_and_encoding() {
    let registry = Arc::new(app_registry());
    let mut handles = Vec::new();

    for worker in 0..8 {
        let registry = Arc::clone(&registry);
        handles.push(thread::spawn(move || {
            let name = format!("#app/worker/T{}", worker % 4);
            registry
                .register_type(name.as_str(), Shape::Scalar(ScalarKind::Int32))
                .unwrap();

            let options = Options::default();
            for i in 0..100 {
                let value = Value::registered(name.as_str(), Value::Int32(i));
                assert_eq!(round_trip(&registry, &options, &value), value);
                assert_eq!(round_trip(&registry, &options, &point(i, -i)), point(i, -i));
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }
    let names = registry.names().unwrap();
    assert_eq!(
        names.iter().filter(|n| n.starts_with("#app/worker/")).count(),
        4
    );
}
