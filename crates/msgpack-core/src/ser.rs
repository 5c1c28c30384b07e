//! Serde serializer producing a [`Value`] tree from any `Serialize` type.
//!
//! This is the typed entry point into the encoder: Rust values are first
//! turned into a `Value`, then written with [`crate::encode_value`]. Kinds
//! without a counterpart in the value model are rejected rather than coerced:
//!
//! - byte slices (`serialize_bytes`), since `bin` families are not produced
//! - map keys that are not strings or chars
//! - `i128`/`u128` values outside the 64-bit ranges
//!
//! Enum variants use the externally tagged layout: a unit variant becomes its
//! name, any other variant a one-entry map from name to payload. A key
//! written twice into one map fails with `DuplicateKey`.
//!
//! # Example
//! ```
//! use msgpack_core::{to_value, Value};
//!
//! #[derive(serde::Serialize)]
//! struct Camera { id: &'static str, fps: u8 }
//!
//! let value = to_value(&Camera { id: "C1", fps: 30 }).unwrap();
//! let Value::Map(map) = value else { panic!("expected a map") };
//! assert_eq!(map["fps"], Value::UnsignedInteger(30));
//! ```

use std::collections::btree_map::Entry;

use serde::ser::{self, Impossible, Serialize};

use crate::config::CodecConfig;
use crate::encoder::encode_value_with;
use crate::error::{MsgPackError, Result};
use crate::types::{Map, Value};

/// Convert a `Serialize` type into a [`Value`].
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value.serialize(Serializer)
}

/// Serialize a `Serialize` type straight to MessagePack bytes.
pub fn to_vec<T>(value: &T) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    to_vec_with(value, &CodecConfig::default())
}

/// Serialize a `Serialize` type to MessagePack bytes with an explicit configuration.
pub fn to_vec_with<T>(value: &T, config: &CodecConfig) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    encode_value_with(&to_value(value)?, config)
}

/// Serializer whose output is a [`Value`].
pub struct Serializer;

impl ser::Serializer for Serializer {
    type Ok = Value;
    type Error = MsgPackError;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeStructVariant;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::Integer(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Value> {
        if let Ok(n) = i64::try_from(v) {
            Ok(Value::Integer(n))
        } else if let Ok(n) = u64::try_from(v) {
            Ok(Value::UnsignedInteger(n))
        } else {
            Err(MsgPackError::Unsupported {
                kind: "i128 outside the 64-bit range",
            })
        }
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        Ok(Value::UnsignedInteger(v))
    }

    fn serialize_u128(self, v: u128) -> Result<Value> {
        u64::try_from(v)
            .map(Value::UnsignedInteger)
            .map_err(|_| MsgPackError::Unsupported {
                kind: "u128 outside the 64-bit range",
            })
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::Float(v as f64))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_owned()))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<Value> {
        Err(MsgPackError::Unsupported { kind: "bytes" })
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::String(variant.to_owned()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        let mut map = Map::new();
        map.insert(variant.to_owned(), to_value(value)?);
        Ok(Value::Map(map))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec {
            vec: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeTupleVariant> {
        Ok(SerializeTupleVariant {
            name: variant.to_owned(),
            vec: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap {
            map: Map::new(),
            next_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeMap> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<SerializeStructVariant> {
        Ok(SerializeStructVariant {
            name: variant.to_owned(),
            map: Map::new(),
        })
    }
}

pub struct SerializeVec {
    vec: Vec<Value>,
}

pub struct SerializeTupleVariant {
    name: String,
    vec: Vec<Value>,
}

pub struct SerializeMap {
    map: Map,
    next_key: Option<String>,
}

pub struct SerializeStructVariant {
    name: String,
    map: Map,
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = MsgPackError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Array(self.vec))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = MsgPackError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = MsgPackError;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = Value;
    type Error = MsgPackError;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        let mut map = Map::new();
        map.insert(self.name, Value::Array(self.vec));
        Ok(Value::Map(map))
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = MsgPackError;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.next_key = Some(key.serialize(MapKeySerializer)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self.next_key.take().ok_or_else(|| {
            MsgPackError::Custom("map value serialized before its key".to_string())
        })?;
        insert_unique(&mut self.map, key, to_value(value)?)
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Map(self.map))
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Value;
    type Error = MsgPackError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        insert_unique(&mut self.map, key.to_owned(), to_value(value)?)
    }

    fn end(self) -> Result<Value> {
        ser::SerializeMap::end(self)
    }
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = Value;
    type Error = MsgPackError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        insert_unique(&mut self.map, key.to_owned(), to_value(value)?)
    }

    fn end(self) -> Result<Value> {
        let mut outer = Map::new();
        outer.insert(self.name, Value::Map(self.map));
        Ok(Value::Map(outer))
    }
}

/// Keys must be unique, as on the decode side.
fn insert_unique(map: &mut Map, key: String, value: Value) -> Result<()> {
    match map.entry(key) {
        Entry::Vacant(slot) => {
            slot.insert(value);
            Ok(())
        }
        Entry::Occupied(slot) => Err(MsgPackError::DuplicateKey {
            key: slot.key().clone(),
        }),
    }
}

/// Accepts only string-like map keys.
struct MapKeySerializer;

fn non_string_key() -> MsgPackError {
    MsgPackError::Unsupported {
        kind: "non-string map key",
    }
}

impl ser::Serializer for MapKeySerializer {
    type Ok = String;
    type Error = MsgPackError;

    type SerializeSeq = Impossible<String, MsgPackError>;
    type SerializeTuple = Impossible<String, MsgPackError>;
    type SerializeTupleStruct = Impossible<String, MsgPackError>;
    type SerializeTupleVariant = Impossible<String, MsgPackError>;
    type SerializeMap = Impossible<String, MsgPackError>;
    type SerializeStruct = Impossible<String, MsgPackError>;
    type SerializeStructVariant = Impossible<String, MsgPackError>;

    fn serialize_str(self, v: &str) -> Result<String> {
        Ok(v.to_owned())
    }

    fn serialize_char(self, v: char) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<String> {
        Ok(variant.to_owned())
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_bool(self, _v: bool) -> Result<String> {
        Err(non_string_key())
    }

    fn serialize_i8(self, _v: i8) -> Result<String> {
        Err(non_string_key())
    }

    fn serialize_i16(self, _v: i16) -> Result<String> {
        Err(non_string_key())
    }

    fn serialize_i32(self, _v: i32) -> Result<String> {
        Err(non_string_key())
    }

    fn serialize_i64(self, _v: i64) -> Result<String> {
        Err(non_string_key())
    }

    fn serialize_u8(self, _v: u8) -> Result<String> {
        Err(non_string_key())
    }

    fn serialize_u16(self, _v: u16) -> Result<String> {
        Err(non_string_key())
    }

    fn serialize_u32(self, _v: u32) -> Result<String> {
        Err(non_string_key())
    }

    fn serialize_u64(self, _v: u64) -> Result<String> {
        Err(non_string_key())
    }

    fn serialize_f32(self, _v: f32) -> Result<String> {
        Err(non_string_key())
    }

    fn serialize_f64(self, _v: f64) -> Result<String> {
        Err(non_string_key())
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<String> {
        Err(non_string_key())
    }

    fn serialize_none(self) -> Result<String> {
        Err(non_string_key())
    }

    fn serialize_some<T>(self, _value: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        Err(non_string_key())
    }

    fn serialize_unit(self) -> Result<String> {
        Err(non_string_key())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<String> {
        Err(non_string_key())
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        Err(non_string_key())
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(non_string_key())
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(non_string_key())
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(non_string_key())
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(non_string_key())
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(non_string_key())
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(non_string_key())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(non_string_key())
    }
}
