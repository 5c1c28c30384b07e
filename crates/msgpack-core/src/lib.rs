//! # msgpack-core
//!
//! Pure-Rust codec between JSON and the **MessagePack** binary format.
//!
//! JSON has a single number type; MessagePack has signed, unsigned and
//! floating-point families in several widths. The codec fixes the mapping:
//! every number is classified when the value tree is built, integral floats
//! are written with the integer families, and every tag is the narrowest one
//! that holds the value. Map keys are written in lexicographic order so the
//! same document always produces the same bytes.
//!
//! ## Quick start
//!
//! ```rust
//! use msgpack_core::{encode, decode};
//!
//! // JSON → MessagePack
//! let json = r#"{"fps":30,"name":"cam"}"#;
//! let bytes = encode(json).unwrap();
//! assert_eq!(bytes, [0x82, 0xa3, b'f', b'p', b's', 0x1e, 0xa4, b'n', b'a', b'm', b'e', 0xa3, b'c', b'a', b'm']);
//!
//! // MessagePack → JSON (roundtrip)
//! let back = decode(&bytes).unwrap();
//! assert_eq!(back, json);
//! ```
//!
//! ## Modules
//!
//! - [`encoder`] — value tree / JSON string → MessagePack bytes
//! - [`decoder`] — MessagePack bytes → value tree / JSON string
//! - [`ser`] — any `serde::Serialize` type → value tree
//! - [`types`] — the `Value` tree shared by both directions
//! - [`config`] — depth limit and trailing-byte policy
//! - [`marker`] — wire tag constants
//! - [`error`] — error types for parse/encode/decode failures

pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod marker;
pub mod ser;
pub mod types;

pub use config::{CodecConfig, DEFAULT_MAX_DEPTH};
pub use decoder::{decode, decode_value, decode_value_with, decode_with};
pub use encoder::{encode, encode_value, encode_value_with, encode_with};
pub use error::{MsgPackError, Result};
pub use ser::{to_value, to_vec, to_vec_with};
pub use types::{Map, Value};
