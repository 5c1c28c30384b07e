/// MessagePack wire compliance tests.
///
/// Covers the length-class boundaries where the encoder must switch tag
/// families, prefix-truncation of complete messages, and decoding of buffers
/// produced by a third-party MessagePack implementation.
use msgpack_core::{decode, decode_value, encode, encode_value, MsgPackError, Value};

fn hex_bytes(text: &str) -> Vec<u8> {
    let clean: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    hex::decode(clean).expect("test vector must be valid hex")
}

fn tag_of(value: &Value) -> u8 {
    encode_value(value).unwrap()[0]
}

fn string_of_len(len: usize) -> Value {
    Value::String("a".repeat(len))
}

// ============================================================================
// 1. Integer boundaries
// ============================================================================

mod integers {
    use super::*;

    #[test]
    fn fixint_to_uint8_at_128() {
        assert_eq!(tag_of(&Value::Integer(127)), 0x7f);
        assert_eq!(tag_of(&Value::Integer(128)), 0xcc);
    }

    #[test]
    fn negative_fixint_to_int8_at_minus_33() {
        assert_eq!(tag_of(&Value::Integer(-32)), 0xe0);
        assert_eq!(tag_of(&Value::Integer(-33)), 0xd0);
    }

    #[test]
    fn signed_positive_width_steps() {
        assert_eq!(tag_of(&Value::Integer(255)), 0xcc);
        assert_eq!(tag_of(&Value::Integer(256)), 0xd1);
        assert_eq!(tag_of(&Value::Integer(32767)), 0xd1);
        assert_eq!(tag_of(&Value::Integer(32768)), 0xd2);
        assert_eq!(tag_of(&Value::Integer(2147483647)), 0xd2);
        assert_eq!(tag_of(&Value::Integer(2147483648)), 0xd3);
    }

    #[test]
    fn signed_negative_width_steps() {
        assert_eq!(tag_of(&Value::Integer(-128)), 0xd0);
        assert_eq!(tag_of(&Value::Integer(-129)), 0xd1);
        assert_eq!(tag_of(&Value::Integer(-32768)), 0xd1);
        assert_eq!(tag_of(&Value::Integer(-32769)), 0xd2);
        assert_eq!(tag_of(&Value::Integer(-2147483648)), 0xd2);
        assert_eq!(tag_of(&Value::Integer(-2147483649)), 0xd3);
    }

    #[test]
    fn unsigned_width_steps() {
        assert_eq!(tag_of(&Value::UnsignedInteger(127)), 0x7f);
        assert_eq!(tag_of(&Value::UnsignedInteger(128)), 0xcc);
        assert_eq!(tag_of(&Value::UnsignedInteger(0xff)), 0xcc);
        assert_eq!(tag_of(&Value::UnsignedInteger(0x100)), 0xcd);
        assert_eq!(tag_of(&Value::UnsignedInteger(0xffff)), 0xcd);
        assert_eq!(tag_of(&Value::UnsignedInteger(0x1_0000)), 0xce);
        assert_eq!(tag_of(&Value::UnsignedInteger(0xffff_ffff)), 0xce);
        assert_eq!(tag_of(&Value::UnsignedInteger(0x1_0000_0000)), 0xcf);
    }

    #[test]
    fn every_boundary_value_roundtrips() {
        let values = [
            0i64,
            127,
            128,
            255,
            256,
            32767,
            32768,
            65535,
            65536,
            2147483647,
            2147483648,
            i64::MAX,
            -1,
            -32,
            -33,
            -128,
            -129,
            -32768,
            -32769,
            -2147483648,
            -2147483649,
            i64::MIN,
        ];
        for n in values {
            let bytes = encode_value(&Value::Integer(n)).unwrap();
            let back = decode_value(&bytes).unwrap();
            assert!(
                back.numeric_eq(&Value::Integer(n)),
                "{n} decoded as {back:?}"
            );
        }
    }
}

// ============================================================================
// 2. String, array and map boundaries
// ============================================================================

mod lengths {
    use super::*;

    #[test]
    fn fixstr_to_str8_at_32_bytes() {
        assert_eq!(tag_of(&string_of_len(31)), 0xbf);
        assert_eq!(tag_of(&string_of_len(32)), 0xd9);
    }

    #[test]
    fn str8_to_str16_at_256_bytes() {
        assert_eq!(tag_of(&string_of_len(255)), 0xd9);
        assert_eq!(tag_of(&string_of_len(256)), 0xda);
    }

    #[test]
    fn str16_to_str32_at_65536_bytes() {
        assert_eq!(tag_of(&string_of_len(65535)), 0xda);
        assert_eq!(tag_of(&string_of_len(65536)), 0xdb);
    }

    #[test]
    fn long_strings_roundtrip() {
        for len in [31, 32, 255, 256, 65535, 65536] {
            let value = string_of_len(len);
            let back = decode_value(&encode_value(&value).unwrap()).unwrap();
            assert_eq!(back, value, "string of {len} bytes");
        }
    }

    #[test]
    fn fixarray_to_array16_at_16_elements() {
        assert_eq!(tag_of(&Value::Array(vec![Value::Null; 15])), 0x9f);
        assert_eq!(tag_of(&Value::Array(vec![Value::Null; 16])), 0xdc);
    }

    #[test]
    fn array16_to_array32_at_65536_elements() {
        assert_eq!(tag_of(&Value::Array(vec![Value::Null; 65535])), 0xdc);
        assert_eq!(tag_of(&Value::Array(vec![Value::Null; 65536])), 0xdd);
    }

    #[test]
    fn fixmap_to_map16_at_16_entries() {
        let map_of = |n: usize| {
            Value::Map(
                (0..n)
                    .map(|i| (format!("k{i}"), Value::Integer(i as i64)))
                    .collect(),
            )
        };
        assert_eq!(tag_of(&map_of(15)), 0x8f);
        assert_eq!(tag_of(&map_of(16)), 0xde);
    }
}

// ============================================================================
// 3. Truncation
// ============================================================================

mod truncation {
    use super::*;

    const DOCUMENTS: &[&str] = &[
        r#"{"name":"Howard","age":26,"isDeveloper":true,"skills":["Go","JavaScript"],"profile":{"github":"howardshen","level":5}}"#,
        r#"[1,-1,128,-129,65536,3.5,null,false,"x"]"#,
        r#""a string long enough to need the str8 family, well past 31 bytes""#,
        r#"{"nested":[[[{"deep":[1,2,3]}]]]}"#,
        "-9223372036854775808",
        "18446744073709551615",
        "0.1",
    ];

    #[test]
    fn every_proper_prefix_fails() {
        for json in DOCUMENTS {
            let bytes = encode(json).unwrap();
            for cut in 0..bytes.len() {
                let result = decode(&bytes[..cut]);
                assert!(
                    result.is_err(),
                    "prefix of length {cut} of {json} decoded as {:?}",
                    result
                );
            }
            assert!(decode(&bytes).is_ok(), "full message of {json} must decode");
        }
    }

    #[test]
    fn prefixes_report_truncation() {
        for json in DOCUMENTS {
            let bytes = encode(json).unwrap();
            for cut in 1..bytes.len() {
                let err = decode_value(&bytes[..cut]).unwrap_err();
                assert!(
                    matches!(err, MsgPackError::UnexpectedEof { .. }),
                    "prefix {cut} of {json}: {err}"
                );
            }
        }
    }

    #[test]
    fn dropping_last_five_bytes_fails() {
        let bytes = encode(DOCUMENTS[0]).unwrap();
        assert!(decode(&bytes[..bytes.len() - 5]).is_err());
    }
}

// ============================================================================
// 4. Cross-implementation vectors
// ============================================================================

mod cross_implementation {
    use super::*;

    /// `{"deviceId":"C1234567","model":"AXIS-Q3515-LV","fps":30,
    /// "resolution":"1920x1080","enabled":true}` as produced by a JavaScript
    /// encoder that keeps keys in document order.
    const CAMERA_HEX: &str = "
        85 a8 64 65 76 69 63 65 49 64 a8 43 31 32 33 34 35 36 37 a5 6d 6f 64
        65 6c ad 41 58 49 53 2d 51 33 35 31 35 2d 4c 56 a3 66 70 73 1e a9 72
        65 73 6f 6c 75 74 69 6f 6e a9 31 39 32 30 78 31 30 38 30 a7 65 6e 61
        62 6c 65 64 c3";

    #[test]
    fn decode_camera_vector() {
        let json = decode(&hex_bytes(CAMERA_HEX)).unwrap();
        let decoded: serde_json::Value = serde_json::from_str(&json).unwrap();
        let expected = serde_json::json!({
            "deviceId": "C1234567",
            "model": "AXIS-Q3515-LV",
            "fps": 30,
            "resolution": "1920x1080",
            "enabled": true
        });
        assert_eq!(decoded, expected);
    }

    #[test]
    fn reencoding_camera_vector_sorts_keys() {
        let bytes = hex_bytes(CAMERA_HEX);
        let value = decode_value(&bytes).unwrap();
        let reencoded = encode_value(&value).unwrap();
        // Same size, different key order: deviceId, enabled, fps, model, resolution.
        assert_eq!(reencoded.len(), bytes.len());
        assert_eq!(reencoded[..2], [0x85, 0xa8]);
        assert_eq!(&reencoded[2..10], b"deviceId");
        assert!(decode_value(&reencoded).unwrap().numeric_eq(&value));
    }

    #[test]
    fn decode_float32_and_uint16_from_foreign_encoder() {
        // {"t": 1.5f32, "n": uint16 300}, written by an encoder that prefers
        // float32 and never uses fixint for small unsigned values.
        let bytes = hex_bytes("82 a1 74 ca 3f c0 00 00 a1 6e cd 01 2c");
        let json = decode(&bytes).unwrap();
        let decoded: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, serde_json::json!({"t": 1.5, "n": 300}));
    }
}
