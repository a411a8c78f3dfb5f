// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Round-trip integration tests.
//!
//! Tests cover:
//! - Values decode to what was encoded under consistent session tables
//! - Cached forms are shorter and decode to the same value
//! - Nil and empty containers stay distinct
//! - Registered types, hooks and nested composites
//! - Streams of consecutive values

mod common;

use common::*;
use sdfcodec::core::time::utc_date;
use sdfcodec::framework::SessionTables;
use sdfcodec::{
    AtomMapping, CacheTable, CustomValue, DescriptorCache, Options, ScalarKind, SdfCodec,
    SessionConfig, Timestamp, TypeDesc, TypeRegistry, Value,
};

// ============================================================================
// Scalars And Identity Types
// ============================================================================

#[test]
fn test_scalars_round_trip() {
    let registry = TypeRegistry::new();
    let options = Options::default();
    let values = vec![
        Value::Bool(false),
        Value::atom("node@host"),
        Value::string(""),
        Value::string("héllo"),
        Value::Binary(vec![0, 255]),
        Value::Float32(-0.5),
        Value::Float64(1e300),
        Value::Int8(i8::MIN),
        Value::Int16(i16::MAX),
        Value::Int32(-1),
        Value::Int64(i64::MIN),
        Value::Int(42),
        Value::Uint8(200),
        Value::Uint16(65535),
        Value::Uint32(7),
        Value::Uint64(u64::MAX),
        Value::Uint(0),
        Value::error("boom"),
        Value::Nil,
    ];
    for value in values {
        assert_eq!(round_trip(&registry, &options, &value), value);
    }
}

#[test]
fn test_identity_and_time_round_trip() {
    let registry = TypeRegistry::new();
    let options = Options::default();
    let offset = chrono::FixedOffset::east_opt(3 * 3600).unwrap();
    let local = chrono::DateTime::parse_from_rfc3339("2024-05-06T07:08:09.123456789+03:00")
        .unwrap()
        .with_timezone(&offset);

    for value in [
        Value::Pid(pid()),
        Value::ProcessId(process_id()),
        Value::Event(event()),
        Value::Ref(reference()),
        Value::Alias(alias()),
        Value::Time(utc_date(1399, 1, 26).unwrap()),
        Value::Time(Timestamp::from(local)),
    ] {
        assert_eq!(round_trip(&registry, &options, &value), value);
    }
}

// ============================================================================
// Cache Transparency
// ============================================================================

#[test]
fn test_cached_forms_are_shorter() {
    let registry = app_registry();
    let plain = Options::default();
    let cached = Options::new()
        .with_atom_cache([(1u16, NODE)].into_iter().collect::<CacheTable>())
        .with_reg_cache([(2u16, POINT)].into_iter().collect::<CacheTable>())
        .with_err_cache([(3u16, "connection lost")].into_iter().collect::<CacheTable>());

    for value in [
        Value::atom(NODE),
        point(3, 4),
        Value::error("connection lost"),
        Value::Pid(pid()),
    ] {
        let long = encode_with(&registry, &plain, &value).unwrap();
        let short = encode_with(&registry, &cached, &value).unwrap();
        assert!(short.len() < long.len(), "{value} was not shortened");
        assert_eq!(encode_with(&registry, &cached, &value).unwrap(), short);
        assert_eq!(decode_with(&registry, &plain, &long).unwrap().0, value);
        assert_eq!(decode_with(&registry, &cached, &short).unwrap().0, value);
    }
}

#[test]
fn test_atom_mapping_round_trip() {
    let registry = TypeRegistry::new();
    let outgoing = Options::new()
        .with_atom_mapping([("local@host", "wire@host")].into_iter().collect::<AtomMapping>());
    let incoming = Options::new()
        .with_atom_mapping([("wire@host", "local@host")].into_iter().collect::<AtomMapping>());

    let bytes = encode_with(&registry, &outgoing, &Value::atom("local@host")).unwrap();
    assert_eq!(decode_plain(&bytes).unwrap().0, Value::atom("wire@host"));
    assert_eq!(
        decode_with(&registry, &incoming, &bytes).unwrap().0,
        Value::atom("local@host")
    );
}

#[test]
fn test_descriptor_cache_is_transparent() {
    let registry = TypeRegistry::new();
    let cache = std::sync::Arc::new(DescriptorCache::new());
    let options = Options::default().with_cache(cache.clone());
    let value = Value::map(
        ScalarKind::Atom,
        TypeDesc::slice(ScalarKind::Int16),
        vec![(
            Value::atom("a"),
            Value::slice(ScalarKind::Int16, vec![Value::Int16(1)]),
        )],
    );

    let first = encode_with(&registry, &options, &value).unwrap();
    let second = encode_with(&registry, &options, &value).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, encode_plain(&value));
    assert_eq!(decode_with(&registry, &options, &first).unwrap().0, value);
    assert_eq!(decode_with(&registry, &options, &first).unwrap().0, value);

    let (encoded, decoded) = cache.sizes();
    assert_eq!((encoded, decoded), (1, 1));
}

// ============================================================================
// Nil Propagation
// ============================================================================

#[test]
fn test_nil_and_empty_stay_distinct() {
    let registry = app_registry();
    let options = Options::default();
    for value in [
        Value::nil_slice(ScalarKind::String),
        Value::slice(ScalarKind::String, vec![]),
        Value::nil_map(ScalarKind::Int, ScalarKind::Bool),
        Value::map(ScalarKind::Int, ScalarKind::Bool, vec![]),
        Value::registered(FLAGS, Value::nil_slice(ScalarKind::Bool)),
        flags(&[]),
    ] {
        assert_eq!(round_trip(&registry, &options, &value), value);
    }
}

#[test]
fn test_nil_errors_in_struct_and_slice() {
    let registry = app_registry();
    let options = Options::default();
    let value = Value::slice(
        ScalarKind::Error,
        vec![Value::error("x"), Value::Nil, Value::error("")],
    );
    assert_eq!(round_trip(&registry, &options, &value), value);
}

#[test]
fn test_nil_byte_slice_becomes_empty_binary() {
    let registry = TypeRegistry::new();
    let decoded = round_trip(
        &registry,
        &Options::default(),
        &Value::nil_slice(ScalarKind::Uint8),
    );
    assert_eq!(decoded, Value::Binary(vec![]));
}

#[test]
fn test_byte_slice_round_trips_equal() {
    let registry = TypeRegistry::new();
    let options = Options::default();
    let value = Value::slice(ScalarKind::Uint8, vec![4u8.into(), 5u8.into(), 6u8.into()]);
    assert_eq!(round_trip(&registry, &options, &value), value);

    let nested = Value::slice(
        TypeDesc::slice(ScalarKind::Uint8),
        vec![Value::slice(ScalarKind::Uint8, vec![7u8.into()])],
    );
    assert_eq!(round_trip(&registry, &options, &nested), nested);
}

// ============================================================================
// Polymorphism And Nesting
// ============================================================================

#[test]
#[allow(clippy::approx_constant)]
fn test_any_slice_preserves_runtime_types() {
    let registry = app_registry();
    let value = Value::any_slice(vec![
        Value::Bool(true),
        Value::string("x"),
        Value::Nil,
        Value::Float32(3.14),
        point(1, 2),
        Value::slice(ScalarKind::Uint16, vec![Value::Uint16(9)]),
        Value::Pid(pid()),
    ]);
    assert_eq!(round_trip(&registry, &Options::default(), &value), value);
}

#[test]
fn test_nested_composites() {
    let registry = app_registry();
    let inner = TypeDesc::array(2, TypeDesc::map(ScalarKind::String, TypeDesc::Any));
    let entry = |k: &str, v: Value| (Value::string(k), v);
    let value = Value::slice(
        inner,
        vec![Value::array(
            TypeDesc::map(ScalarKind::String, TypeDesc::Any),
            vec![
                Value::map(
                    ScalarKind::String,
                    TypeDesc::Any,
                    vec![entry("a", Value::Int(1)), entry("b", Value::Nil)],
                ),
                Value::nil_map(ScalarKind::String, TypeDesc::Any),
            ],
        )],
    );
    assert_eq!(round_trip(&registry, &Options::default(), &value), value);
}

#[test]
fn test_map_entries_keep_order() {
    let registry = TypeRegistry::new();
    let value = Value::map(
        ScalarKind::Uint16,
        ScalarKind::Atom,
        vec![
            (Value::Uint16(9), Value::atom("z")),
            (Value::Uint16(1), Value::atom("a")),
            (Value::Uint16(5), Value::atom("m")),
        ],
    );
    let decoded = round_trip(&registry, &Options::default(), &value);
    assert_eq!(decoded.get(&Value::Uint16(1)), Some(&Value::atom("a")));
    assert_eq!(decoded, value);
}

// ============================================================================
// Registered Types
// ============================================================================

#[test]
fn test_registered_shapes_round_trip() {
    let registry = app_registry();
    let options = Options::default();
    let values = vec![
        point(-5, 5),
        flags(&[true, false, true]),
        Value::registered(
            SCORES,
            Value::map(
                ScalarKind::String,
                ScalarKind::Int8,
                vec![
                    (Value::string("x"), Value::Int8(1)),
                    (Value::string("y"), Value::Int8(-1)),
                ],
            ),
        ),
        Value::registered(
            TRIPLE,
            Value::array(
                ScalarKind::Uint16,
                vec![Value::Uint16(1), Value::Uint16(2), Value::Uint16(3)],
            ),
        ),
        Value::registered(LEVEL, Value::Int(-3)),
    ];
    for value in values {
        assert_eq!(round_trip(&registry, &options, &value), value);
    }
}

#[test]
fn test_registered_struct_with_nested_types() {
    let registry = app_registry();
    let value = Value::registered(
        ENVELOPE,
        Value::Struct(vec![
            Value::Pid(pid()),
            point(7, 8),
            flags(&[false]),
            Value::slice(ScalarKind::Atom, vec![Value::atom("t1"), Value::atom("t2")]),
            Value::registered(TOKEN, Value::Custom(CustomValue::new(Token("inner".into())))),
            Value::error("late"),
        ]),
    );
    assert_eq!(round_trip(&registry, &Options::default(), &value), value);
}

#[test]
fn test_custom_hook_round_trip() {
    let registry = app_registry();
    let value = Value::registered(TOKEN, Value::Custom(CustomValue::new(Token("hello".into()))));
    let decoded = round_trip(&registry, &Options::default(), &value);
    assert_eq!(decoded, value);

    let Value::Registered { body, .. } = decoded else {
        panic!("expected registered value");
    };
    let Value::Custom(custom) = *body else {
        panic!("expected custom body");
    };
    assert_eq!(custom.downcast_ref::<Token>(), Some(&Token("hello".into())));
}

#[test]
fn test_slice_of_registered_structs() {
    let registry = app_registry();
    let value = Value::slice(
        TypeDesc::registered(POINT),
        vec![point(1, 1), point(2, 2)],
    );
    let bytes = encode_with(&registry, &Options::default(), &value).unwrap();
    assert_eq!(&bytes[..4], &[130, 0, 4 + POINT.len() as u8, 157]);
    assert_eq!(decode_with(&registry, &Options::default(), &bytes).unwrap().0, value);
}

#[test]
fn test_bare_registered_bodies_decode_wrapped() {
    let registry = app_registry();
    let bare = Value::slice(
        TypeDesc::registered(POINT),
        vec![Value::Struct(vec![Value::Int32(3), Value::Int32(4)])],
    );
    let wrapped = Value::slice(TypeDesc::registered(POINT), vec![point(3, 4)]);
    let options = Options::default();

    let bytes = encode_with(&registry, &options, &bare).unwrap();
    assert_eq!(bytes, encode_with(&registry, &options, &wrapped).unwrap());
    assert_eq!(decode_with(&registry, &options, &bytes).unwrap().0, wrapped);
}

// ============================================================================
// Streams And Sessions
// ============================================================================

#[test]
fn test_decode_all_splits_stream() {
    let registry = TypeRegistry::new();
    let codec = SdfCodec::with_registry(&registry, Options::default());
    let mut stream = Vec::new();
    codec.encode_into(&Value::Bool(true), &mut stream).unwrap();
    codec.encode_into(&Value::string("two"), &mut stream).unwrap();
    codec.encode_into(&Value::Nil, &mut stream).unwrap();

    let values = codec.decode_all(&stream).unwrap();
    assert_eq!(
        values,
        vec![
            (Value::Bool(true), 2),
            (Value::string("two"), 6),
            (Value::Nil, 1),
        ]
    );
}

#[test]
fn test_session_config_round_trip() {
    let config = SessionConfig::from_toml_str(
        r#"
[atom_cache]
1 = "abc@def"

[err_cache]
2 = "lost"
"#,
    )
    .unwrap();
    let options = config.to_options().unwrap();
    let value = Value::slice(
        ScalarKind::Pid,
        vec![Value::Pid(pid()), Value::Pid(pid())],
    );
    let registry = TypeRegistry::new();
    let bytes = encode_with(&registry, &options, &value).unwrap();
    assert_eq!(bytes.len(), 10 + 2 * (2 + 16));
    assert_eq!(round_trip(&registry, &options, &value), value);
    assert_eq!(
        encode_with(&registry, &options, &Value::error("lost")).unwrap(),
        vec![156, 0, 2]
    );
}

#[test]
fn test_handshake_tables_drive_session() {
    let announced = SessionTables {
        atom_cache: [(10u16, NODE)].into_iter().collect(),
        reg_cache: CacheTable::new(),
        err_cache: [(11u16, "gone")].into_iter().collect(),
    };
    let [atoms, regs, errs] = announced.to_fields();
    let introduce = Value::registered(
        sdfcodec::framework::handshake_name("MessageIntroduce"),
        Value::Struct(vec![
            Value::atom(NODE),
            Value::registered(
                sdfcodec::framework::gen_name("Version"),
                Value::Struct(vec![
                    Value::string("node"),
                    Value::string("1.0"),
                    Value::string("MIT"),
                ]),
            ),
            Value::registered(
                sdfcodec::framework::gen_name("NetworkFlags"),
                Value::Struct(vec![Value::Bool(true); 7]),
            ),
            Value::Int64(1),
            Value::Int(0),
            atoms,
            regs,
            errs,
            Value::string("digest"),
        ]),
    );

    let codec = SdfCodec::new(Options::default());
    let bytes = codec.encode(&introduce).unwrap();
    let (decoded, _) = codec.decode(&bytes).unwrap();
    let tables = SessionTables::from_introduce(&decoded).unwrap();
    assert_eq!(tables, announced);

    let session = SdfCodec::new(tables.into_options(Options::default()));
    assert_eq!(session.encode(&Value::atom(NODE)).unwrap(), vec![140, 0, 10]);
    assert_eq!(session.encode(&Value::error("gone")).unwrap(), vec![156, 0, 11]);
}
