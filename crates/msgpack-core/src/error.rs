//! Error types for MessagePack encoding and decoding operations.

use std::fmt;

use thiserror::Error;

/// Errors that can occur during MessagePack encoding or decoding.
#[derive(Error, Debug)]
pub enum MsgPackError {
    /// The input string was not valid JSON (encoding path).
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A Rust value handed to the serializer has no counterpart in the value model.
    #[error("unsupported value kind: {kind}")]
    Unsupported { kind: &'static str },

    /// A string, array or map is too long for the widest length field.
    #[error("{kind} length {len} exceeds the 32-bit length field")]
    LengthOverflow { kind: &'static str, len: usize },

    /// The decoder was handed a zero-length buffer.
    #[error("empty input")]
    EmptyInput,

    /// A fixed-width field or declared payload runs past the end of the buffer.
    #[error("unexpected end of input at offset {offset}: need {needed} bytes, {available} available")]
    UnexpectedEof {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// The leading byte of a value is not a tag this codec understands.
    #[error("unsupported type tag 0x{byte:02x} at offset {offset}")]
    UnknownTag { byte: u8, offset: usize },

    /// A map key decoded to something other than a string.
    #[error("non-string map key at offset {offset}: found {found}")]
    NonStringKey { offset: usize, found: &'static str },

    /// The same key appears twice in one wire map.
    #[error("duplicate map key {key:?}")]
    DuplicateKey { key: String },

    /// A string payload is not valid UTF-8.
    #[error("invalid UTF-8 in string at offset {offset}")]
    InvalidUtf8 {
        offset: usize,
        #[source]
        source: std::str::Utf8Error,
    },

    /// Bytes remain after the top-level value.
    #[error("{count} trailing bytes after the top-level value")]
    TrailingBytes { count: usize },

    /// Containers nest deeper than the configured limit.
    #[error("nesting depth exceeds the limit of {limit}")]
    DepthLimitExceeded { limit: usize },

    /// A decoded NaN or infinity has no JSON representation.
    #[error("non-finite float {0} cannot be written as JSON")]
    NonFiniteFloat(f64),

    /// Raised by a `Serialize` implementation through `serde::ser::Error::custom`.
    #[error("{0}")]
    Custom(String),
}

impl serde::ser::Error for MsgPackError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        MsgPackError::Custom(msg.to_string())
    }
}

/// Convenience alias used throughout msgpack-core.
pub type Result<T> = std::result::Result<T, MsgPackError>;
