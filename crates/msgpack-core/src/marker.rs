//! MessagePack tag bytes understood by this codec.
//!
//! Tag families that pack a length or value into the low bits are given as
//! their first and last byte.

pub const POSITIVE_FIXINT_MAX: u8 = 0x7f;

/// Largest length packed into a fixarray or fixmap tag.
pub const FIXCONTAINER_MAX_LEN: usize = 0x0f;

pub const FIXMAP: u8 = 0x80; /* 1000xxxx */
pub const FIXMAP_MAX: u8 = 0x8f;

pub const FIXARRAY: u8 = 0x90; /* 1001xxxx */
pub const FIXARRAY_MAX: u8 = 0x9f;

pub const FIXSTR: u8 = 0xa0; /* 101xxxxx */
pub const FIXSTR_MAX: u8 = 0xbf;
pub const FIXSTR_MAX_LEN: usize = 0x1f;

pub const NIL: u8 = 0xc0;
pub const FALSE: u8 = 0xc2;
pub const TRUE: u8 = 0xc3;

pub const FLOAT_32: u8 = 0xca;
pub const FLOAT_64: u8 = 0xcb;

pub const UINT_8: u8 = 0xcc;
pub const UINT_16: u8 = 0xcd;
pub const UINT_32: u8 = 0xce;
pub const UINT_64: u8 = 0xcf;

pub const INT_8: u8 = 0xd0;
pub const INT_16: u8 = 0xd1;
pub const INT_32: u8 = 0xd2;
pub const INT_64: u8 = 0xd3;

pub const STR_8: u8 = 0xd9;
pub const STR_16: u8 = 0xda;
pub const STR_32: u8 = 0xdb;

pub const ARRAY_16: u8 = 0xdc;
pub const ARRAY_32: u8 = 0xdd;

pub const MAP_16: u8 = 0xde;
pub const MAP_32: u8 = 0xdf;

pub const NEGATIVE_FIXINT: u8 = 0xe0; /* 111xxxxx */
pub const NEGATIVE_FIXINT_MIN: i64 = -32;
