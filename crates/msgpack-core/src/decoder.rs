//! MessagePack decoder — converts MessagePack bytes back into a value tree or JSON.
//!
//! The decoder is a recursive reader over a byte cursor. Each value starts with
//! a tag byte; fix families carry their value or length in the tag's low bits,
//! every other family is followed by a big-endian field of the declared width.
//!
//! # Key design decisions
//!
//! - **Bounds-checked reads**: every fixed-width field and payload goes through
//!   `Reader::take`, which reports the offset and the missing byte count
//!   instead of slicing out of bounds.
//! - **Widening**: all integer widths become `i64` (`int*`, fixints) or `u64`
//!   (`uint*`); `float32` becomes `f64`.
//! - **String keys only**: a map key's tag is checked before any payload is
//!   read, so a non-string key fails without decoding it.
//! - **Allocation cap**: a declared container length only preallocates as
//!   many slots as there are bytes left, since every element takes at least one.

use std::collections::btree_map::Entry;

use tracing::{debug, trace};

use crate::config::CodecConfig;
use crate::error::{MsgPackError, Result};
use crate::marker::*;
use crate::types::{Map, Value};

/// Decode MessagePack bytes into compact JSON using the default configuration.
///
/// Fails on empty, truncated or malformed input, and on decoded floats that
/// JSON cannot express (NaN, infinities).
pub fn decode(bytes: &[u8]) -> Result<String> {
    decode_with(bytes, &CodecConfig::default())
}

/// Decode MessagePack bytes into compact JSON.
///
/// The output is minified. Use `serde_json::to_string_pretty` on
/// [`Value::to_json`] if human-readable JSON is needed.
pub fn decode_with(bytes: &[u8], config: &CodecConfig) -> Result<String> {
    let value = decode_value_with(bytes, config)?;
    Ok(serde_json::to_string(&value.to_json()?)?)
}

/// Decode MessagePack bytes into a value tree using the default configuration.
pub fn decode_value(bytes: &[u8]) -> Result<Value> {
    decode_value_with(bytes, &CodecConfig::default())
}

/// Decode MessagePack bytes into a value tree.
pub fn decode_value_with(bytes: &[u8], config: &CodecConfig) -> Result<Value> {
    if bytes.is_empty() {
        return Err(MsgPackError::EmptyInput);
    }
    let mut reader = Reader::new(bytes, config.max_depth);
    let value = reader.read_value(0)?;

    let trailing = reader.remaining();
    if trailing > 0 {
        if !config.allow_trailing_bytes {
            return Err(MsgPackError::TrailingBytes { count: trailing });
        }
        debug!(count = trailing, "ignoring trailing bytes");
    }
    debug!(bytes = bytes.len(), root = value.kind(), "decoded MessagePack value");
    Ok(value)
}

/// Cursor over the input buffer.
struct Reader<'a> {
    input: &'a [u8],
    pos: usize,
    max_depth: usize,
}

impl<'a> Reader<'a> {
    fn new(input: &'a [u8], max_depth: usize) -> Self {
        Self {
            input,
            pos: 0,
            max_depth,
        }
    }

    fn remaining(&self) -> usize {
        self.input.len() - self.pos
    }

    /// Consume exactly `n` bytes or fail without moving the cursor.
    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let available = self.remaining();
        if available < n {
            return Err(MsgPackError::UnexpectedEof {
                offset: self.pos,
                needed: n,
                available,
            });
        }
        let input = self.input;
        let bytes = &input[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    fn read_fixed<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.take(N)?);
        Ok(buf)
    }

    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(self.read_fixed()?))
    }

    fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.read_fixed()?))
    }

    fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_be_bytes(self.read_fixed()?))
    }

    /// Read one complete value starting at the cursor.
    fn read_value(&mut self, depth: usize) -> Result<Value> {
        let offset = self.pos;
        let tag = self.read_u8()?;

        if let Some(len) = self.str_len(tag)? {
            return self.read_str(len).map(Value::String);
        }

        match tag {
            0x00..=POSITIVE_FIXINT_MAX => Ok(Value::Integer(tag as i64)),
            NEGATIVE_FIXINT..=0xff => Ok(Value::Integer(tag as i8 as i64)),
            FIXMAP..=FIXMAP_MAX => self.read_map((tag - FIXMAP) as usize, depth),
            FIXARRAY..=FIXARRAY_MAX => self.read_array((tag - FIXARRAY) as usize, depth),

            NIL => Ok(Value::Null),
            FALSE => Ok(Value::Bool(false)),
            TRUE => Ok(Value::Bool(true)),

            FLOAT_32 => Ok(Value::Float(f32::from_bits(self.read_u32()?) as f64)),
            FLOAT_64 => Ok(Value::Float(f64::from_bits(self.read_u64()?))),

            UINT_8 => Ok(Value::UnsignedInteger(self.read_u8()? as u64)),
            UINT_16 => Ok(Value::UnsignedInteger(self.read_u16()? as u64)),
            UINT_32 => Ok(Value::UnsignedInteger(self.read_u32()? as u64)),
            UINT_64 => Ok(Value::UnsignedInteger(self.read_u64()?)),

            INT_8 => Ok(Value::Integer(self.read_u8()? as i8 as i64)),
            INT_16 => Ok(Value::Integer(i16::from_be_bytes(self.read_fixed()?) as i64)),
            INT_32 => Ok(Value::Integer(i32::from_be_bytes(self.read_fixed()?) as i64)),
            INT_64 => Ok(Value::Integer(i64::from_be_bytes(self.read_fixed()?))),

            ARRAY_16 => {
                let len = self.read_u16()? as usize;
                self.read_array(len, depth)
            }
            ARRAY_32 => {
                let len = self.read_u32()? as usize;
                self.read_array(len, depth)
            }
            MAP_16 => {
                let len = self.read_u16()? as usize;
                self.read_map(len, depth)
            }
            MAP_32 => {
                let len = self.read_u32()? as usize;
                self.read_map(len, depth)
            }

            _ => Err(MsgPackError::UnknownTag { byte: tag, offset }),
        }
    }

    /// For string tags, read the declared byte length; `None` for any other tag.
    fn str_len(&mut self, tag: u8) -> Result<Option<usize>> {
        let len = match tag {
            FIXSTR..=FIXSTR_MAX => (tag - FIXSTR) as usize,
            STR_8 => self.read_u8()? as usize,
            STR_16 => self.read_u16()? as usize,
            STR_32 => self.read_u32()? as usize,
            _ => return Ok(None),
        };
        Ok(Some(len))
    }

    fn read_str(&mut self, len: usize) -> Result<String> {
        let offset = self.pos;
        let bytes = self.take(len)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|source| MsgPackError::InvalidUtf8 { offset, source })
    }

    fn enter(&self, depth: usize) -> Result<()> {
        if depth >= self.max_depth {
            return Err(MsgPackError::DepthLimitExceeded {
                limit: self.max_depth,
            });
        }
        Ok(())
    }

    fn read_array(&mut self, len: usize, depth: usize) -> Result<Value> {
        self.enter(depth)?;
        trace!(len, offset = self.pos, "array");
        let mut items = Vec::with_capacity(len.min(self.remaining()));
        for _ in 0..len {
            items.push(self.read_value(depth + 1)?);
        }
        Ok(Value::Array(items))
    }

    fn read_map(&mut self, len: usize, depth: usize) -> Result<Value> {
        self.enter(depth)?;
        trace!(len, offset = self.pos, "map");
        let mut map = Map::new();
        for _ in 0..len {
            let key = self.read_key()?;
            let value = self.read_value(depth + 1)?;
            match map.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(value);
                }
                Entry::Occupied(slot) => {
                    return Err(MsgPackError::DuplicateKey {
                        key: slot.key().clone(),
                    });
                }
            }
        }
        Ok(Value::Map(map))
    }

    /// Read a map key, rejecting any non-string tag before touching its payload.
    fn read_key(&mut self) -> Result<String> {
        let offset = self.pos;
        let tag = self.read_u8()?;
        if let Some(len) = self.str_len(tag)? {
            return self.read_str(len);
        }
        match tag_kind(tag) {
            Some(found) => Err(MsgPackError::NonStringKey { offset, found }),
            None => Err(MsgPackError::UnknownTag { byte: tag, offset }),
        }
    }
}

/// Name of the value family a non-string tag introduces, `None` for tags this
/// codec does not understand.
fn tag_kind(tag: u8) -> Option<&'static str> {
    Some(match tag {
        0x00..=POSITIVE_FIXINT_MAX | NEGATIVE_FIXINT..=0xff => "int",
        INT_8..=INT_64 => "int",
        UINT_8..=UINT_64 => "uint",
        FIXMAP..=FIXMAP_MAX | MAP_16 | MAP_32 => "map",
        FIXARRAY..=FIXARRAY_MAX | ARRAY_16 | ARRAY_32 => "array",
        NIL => "nil",
        FALSE | TRUE => "bool",
        FLOAT_32 | FLOAT_64 => "float",
        _ => return None,
    })
}
