/// Property-Based Roundtrip Tests for the MessagePack codec
///
/// Uses the `proptest` crate to generate random value trees and JSON
/// documents and verify that `decode(encode(x))` denotes the same values as
/// `x` for every generated input.
///
/// Strategies generate:
/// - Integers across every width class, plus the i64/u64 extremes
/// - Finite floats, integral floats and signed zero
/// - Strings including empty, unicode and lengths around the fixstr/str8 edges
/// - Arrays and maps around the 15/16 element edge, nested up to 4 levels
///
/// Decoding widens numbers (`int*` to i64, `uint*` to u64, integral floats to
/// integers), so trees are compared with `Value::numeric_eq`.
use msgpack_core::{decode, decode_value, encode, encode_value, Map, Value};
use proptest::prelude::*;

// ============================================================================
// Strategies for generating values
// ============================================================================

fn arb_key() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z_][a-zA-Z0-9_]{0,15}",
        Just(String::new()),
        Just("caf\u{00e9}".to_string()),
        "\\PC{0,8}",
    ]
}

fn arb_string() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 ]{0,30}",
        Just(String::new()),
        Just("\u{4f60}\u{597d}".to_string()),
        Just("line1\nline2".to_string()),
        // Either side of the fixstr/str8 edge.
        (30usize..34).prop_map(|n| "x".repeat(n)),
        "\\PC{0,40}",
    ]
}

fn arb_integer() -> impl Strategy<Value = Value> {
    prop_oneof![
        (-32i64..128).prop_map(Value::Integer),
        (-40_000i64..70_000).prop_map(Value::Integer),
        any::<i64>().prop_map(Value::Integer),
        Just(Value::Integer(i64::MIN)),
        Just(Value::Integer(i64::MAX)),
        any::<u64>().prop_map(Value::UnsignedInteger),
        Just(Value::UnsignedInteger(u64::MAX)),
    ]
}

fn arb_float() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<f64>()
            .prop_filter("finite", |f| f.is_finite())
            .prop_map(Value::Float),
        (-1_000_000i64..1_000_000).prop_map(|n| Value::Float(n as f64)),
        (-10_000i32..10_000).prop_map(|n| Value::Float(n as f64 / 8.0)),
        Just(Value::Float(-0.0)),
    ]
}

fn arb_primitive() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        arb_integer(),
        arb_float(),
        arb_string().prop_map(Value::String),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    arb_primitive().prop_recursive(4, 256, 20, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..20).prop_map(Value::Array),
            prop::collection::btree_map(arb_key(), inner, 0..20)
                .prop_map(|m: Map| Value::Map(m)),
        ]
    })
}

/// JSON documents made only of values JSON can carry.
fn arb_json() -> impl Strategy<Value = serde_json::Value> {
    let leaf = prop_oneof![
        Just(serde_json::Value::Null),
        any::<bool>().prop_map(serde_json::Value::Bool),
        any::<i64>().prop_map(serde_json::Value::from),
        any::<u64>().prop_map(serde_json::Value::from),
        (-10_000i32..10_000).prop_map(|n| serde_json::Value::from(n as f64 / 4.0)),
        arb_string().prop_map(serde_json::Value::String),
    ];
    leaf.prop_recursive(4, 128, 10, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..10).prop_map(serde_json::Value::Array),
            prop::collection::btree_map(arb_key(), inner, 0..10)
                .prop_map(|m| serde_json::Value::Object(m.into_iter().collect())),
        ]
    })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Core roundtrip property: decode(encode(v)) denotes v.
    #[test]
    fn roundtrip_preserves_value(value in arb_value()) {
        let bytes = encode_value(&value).unwrap();
        let decoded = decode_value(&bytes).unwrap();
        prop_assert!(
            decoded.numeric_eq(&value),
            "Roundtrip failed!\n  in:    {:?}\n  bytes: {:02x?}\n  out:   {:?}",
            value,
            bytes,
            decoded
        );
    }

    /// Re-encoding a decoded tree reproduces the original bytes.
    #[test]
    fn reencoding_is_stable(value in arb_value()) {
        let bytes = encode_value(&value).unwrap();
        let reencoded = encode_value(&decode_value(&bytes).unwrap()).unwrap();
        prop_assert_eq!(bytes, reencoded);
    }

    /// JSON text in, JSON text out, same values.
    #[test]
    fn json_roundtrip(json in arb_json()) {
        let text = serde_json::to_string(&json).unwrap();
        let decoded = decode(&encode(&text).unwrap()).unwrap();
        let back: serde_json::Value = serde_json::from_str(&decoded).unwrap();
        prop_assert!(
            Value::from_json(&back).numeric_eq(&Value::from_json(&json)),
            "JSON in: {}\nJSON out: {}",
            text,
            decoded
        );
    }

    /// Every proper prefix of a valid message is rejected.
    #[test]
    fn truncation_is_detected(value in arb_value()) {
        let bytes = encode_value(&value).unwrap();
        let cut = bytes.len() / 2;
        prop_assert!(decode_value(&bytes[..cut]).is_err());
        prop_assert!(decode_value(&bytes[..bytes.len() - 1]).is_err());
    }

    /// Appending a byte to a valid message is rejected by default.
    #[test]
    fn trailing_byte_is_detected(value in arb_value(), extra in any::<u8>()) {
        let mut bytes = encode_value(&value).unwrap();
        bytes.push(extra);
        prop_assert!(decode_value(&bytes).is_err());
    }

    /// The decoder returns an error or a value for arbitrary input; it never panics.
    #[test]
    fn decode_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = decode_value(&bytes);
        let _ = decode(&bytes);
    }
}
