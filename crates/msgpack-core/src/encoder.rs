//! MessagePack encoder — converts a value tree (or JSON text) into MessagePack bytes.
//!
//! Every value is written as a one-byte tag followed by its payload, always
//! picking the narrowest representation that holds it:
//!
//! - **fixint**: `0..=127` and `-32..=-1` live entirely in the tag byte
//! - **Integers**: smallest of the 1/2/4/8-byte `uint*`/`int*` families
//! - **Floats**: integral values in `i64` range take the integer path, the rest
//!   are written as `float64`
//! - **Strings**: fixstr, str8, str16 or str32 by UTF-8 byte length
//! - **Arrays / maps**: fix, 16-bit or 32-bit length header, then the children;
//!   map keys go out in lexicographic order
//!
//! # Example
//! ```
//! use msgpack_core::encode;
//! let bytes = encode(r#"{"a":1,"b":[true,null]}"#).unwrap();
//! assert_eq!(bytes, [0x82, 0xa1, b'a', 0x01, 0xa1, b'b', 0x92, 0xc3, 0xc0]);
//! ```

use tracing::{debug, trace};

use crate::config::CodecConfig;
use crate::error::{MsgPackError, Result};
use crate::marker::*;
use crate::types::{float_as_exact_i64, Value};

/// Encode a JSON string into MessagePack bytes using the default configuration.
///
/// Returns an error if the input is not valid JSON (including empty input).
pub fn encode(json: &str) -> Result<Vec<u8>> {
    encode_with(json, &CodecConfig::default())
}

/// Encode a JSON string into MessagePack bytes.
///
/// Nesting is bounded by `config.max_depth` alone; serde_json's own 128-level
/// parser limit is lifted once the text has passed the depth scan.
pub fn encode_with(json: &str, config: &CodecConfig) -> Result<Vec<u8>> {
    let parsed = parse_json(json, config.max_depth)?;
    encode_value_with(&Value::from_json(&parsed), config)
}

/// Parse JSON text, rejecting nesting past `max_depth` before the recursive
/// parser runs.
fn parse_json(json: &str, max_depth: usize) -> Result<serde_json::Value> {
    check_text_depth(json, max_depth)?;
    let mut de = serde_json::Deserializer::from_str(json);
    de.disable_recursion_limit();
    let parsed = serde::Deserialize::deserialize(&mut de)?;
    de.end()?;
    Ok(parsed)
}

/// Count `[`/`{` nesting outside string literals. Malformed text is left for
/// the parser to report.
fn check_text_depth(json: &str, max_depth: usize) -> Result<()> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for b in json.bytes() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'[' | b'{' => {
                check_depth(depth, max_depth)?;
                depth += 1;
            }
            b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

/// Encode a value tree into MessagePack bytes using the default configuration.
pub fn encode_value(value: &Value) -> Result<Vec<u8>> {
    encode_value_with(value, &CodecConfig::default())
}

/// Encode a value tree into MessagePack bytes.
///
/// Fails when containers nest deeper than `config.max_depth` or when a
/// length does not fit the 32-bit length fields.
pub fn encode_value_with(value: &Value, config: &CodecConfig) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    write_value(value, 0, config.max_depth, &mut out)?;
    debug!(bytes = out.len(), root = value.kind(), "encoded MessagePack value");
    Ok(out)
}

/// Dispatch on the value kind and append its encoding to `out`.
fn write_value(value: &Value, depth: usize, max_depth: usize, out: &mut Vec<u8>) -> Result<()> {
    match value {
        Value::Null => out.push(NIL),
        Value::Bool(b) => out.push(if *b { TRUE } else { FALSE }),
        Value::Integer(n) => write_signed(*n, out),
        Value::UnsignedInteger(n) => write_unsigned(*n, out),
        Value::Float(f) => write_float(*f, out),
        Value::String(s) => write_str(s, out)?,
        Value::Array(arr) => {
            check_depth(depth, max_depth)?;
            write_container_header(arr.len(), FIXARRAY, ARRAY_16, ARRAY_32, "array", out)?;
            for item in arr {
                write_value(item, depth + 1, max_depth, out)?;
            }
        }
        Value::Map(map) => {
            check_depth(depth, max_depth)?;
            write_container_header(map.len(), FIXMAP, MAP_16, MAP_32, "map", out)?;
            // BTreeMap iteration is already lexicographic by key bytes.
            for (key, val) in map {
                write_str(key, out)?;
                write_value(val, depth + 1, max_depth, out)?;
            }
        }
    }
    Ok(())
}

fn check_depth(depth: usize, max_depth: usize) -> Result<()> {
    if depth >= max_depth {
        return Err(MsgPackError::DepthLimitExceeded { limit: max_depth });
    }
    Ok(())
}

/// Write a float, taking the integer path when the value is integral and in
/// `i64` range so `26.0` costs one byte instead of nine.
fn write_float(f: f64, out: &mut Vec<u8>) {
    match float_as_exact_i64(f) {
        Some(n) => write_signed(n, out),
        None => {
            out.push(FLOAT_64);
            out.extend_from_slice(&f.to_bits().to_be_bytes());
        }
    }
}

/// Write a signed integer.
///
/// Negative values use signed range tests. Positive values above the fixint
/// range use `uint8` up to 255, then the signed 16/32/64-bit families.
fn write_signed(n: i64, out: &mut Vec<u8>) {
    if n >= 0 {
        if n <= POSITIVE_FIXINT_MAX as i64 {
            out.push(n as u8);
        } else if n <= u8::MAX as i64 {
            out.push(UINT_8);
            out.push(n as u8);
        } else if n <= i16::MAX as i64 {
            out.push(INT_16);
            out.extend_from_slice(&(n as i16).to_be_bytes());
        } else if n <= i32::MAX as i64 {
            out.push(INT_32);
            out.extend_from_slice(&(n as i32).to_be_bytes());
        } else {
            out.push(INT_64);
            out.extend_from_slice(&n.to_be_bytes());
        }
    } else if n >= NEGATIVE_FIXINT_MIN {
        // Two's complement of -32..=-1 is 0xe0..=0xff: the tag is the value.
        out.push(n as i8 as u8);
    } else if n >= i8::MIN as i64 {
        out.push(INT_8);
        out.push(n as i8 as u8);
    } else if n >= i16::MIN as i64 {
        out.push(INT_16);
        out.extend_from_slice(&(n as i16).to_be_bytes());
    } else if n >= i32::MIN as i64 {
        out.push(INT_32);
        out.extend_from_slice(&(n as i32).to_be_bytes());
    } else {
        out.push(INT_64);
        out.extend_from_slice(&n.to_be_bytes());
    }
}

fn write_unsigned(n: u64, out: &mut Vec<u8>) {
    if n <= POSITIVE_FIXINT_MAX as u64 {
        out.push(n as u8);
    } else if n <= u8::MAX as u64 {
        out.push(UINT_8);
        out.push(n as u8);
    } else if n <= u16::MAX as u64 {
        out.push(UINT_16);
        out.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= u32::MAX as u64 {
        out.push(UINT_32);
        out.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        out.push(UINT_64);
        out.extend_from_slice(&n.to_be_bytes());
    }
}

/// Write a string header sized by UTF-8 byte length, then the bytes.
fn write_str(s: &str, out: &mut Vec<u8>) -> Result<()> {
    let len = s.len();
    if len <= FIXSTR_MAX_LEN {
        out.push(FIXSTR | len as u8);
    } else if len <= u8::MAX as usize {
        out.push(STR_8);
        out.push(len as u8);
    } else if len <= u16::MAX as usize {
        out.push(STR_16);
        out.extend_from_slice(&(len as u16).to_be_bytes());
    } else {
        let len32 = u32::try_from(len)
            .map_err(|_| MsgPackError::LengthOverflow { kind: "string", len })?;
        out.push(STR_32);
        out.extend_from_slice(&len32.to_be_bytes());
    }
    out.extend_from_slice(s.as_bytes());
    Ok(())
}

/// Write an array or map header. Both families share the same three tiers:
/// up to 15 entries in the tag, then 16-bit and 32-bit length fields.
fn write_container_header(
    len: usize,
    fix: u8,
    tag16: u8,
    tag32: u8,
    kind: &'static str,
    out: &mut Vec<u8>,
) -> Result<()> {
    trace!(kind, len, "container header");
    if len <= FIXCONTAINER_MAX_LEN {
        out.push(fix | len as u8);
    } else if len <= u16::MAX as usize {
        out.push(tag16);
        out.extend_from_slice(&(len as u16).to_be_bytes());
    } else {
        let len32 = u32::try_from(len).map_err(|_| MsgPackError::LengthOverflow { kind, len })?;
        out.push(tag32);
        out.extend_from_slice(&len32.to_be_bytes());
    }
    Ok(())
}
