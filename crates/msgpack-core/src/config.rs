//! Codec configuration shared by the encoder and the decoder.

use serde::{Deserialize, Serialize};

/// Default container nesting limit for both directions.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Knobs that bound or relax the codec.
///
/// Deserializable from JSON with every field optional, so a config file only
/// needs to name what it overrides:
///
/// ```
/// use msgpack_core::CodecConfig;
/// let config: CodecConfig = serde_json::from_str(r#"{"max_depth": 8}"#).unwrap();
/// assert_eq!(config.max_depth, 8);
/// assert!(!config.allow_trailing_bytes);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodecConfig {
    /// Maximum number of nested arrays/maps. A container sitting at depth
    /// `max_depth` (the root being depth 0) is rejected.
    pub max_depth: usize,
    /// Accept bytes after the top-level value instead of failing the decode.
    pub allow_trailing_bytes: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            allow_trailing_bytes: false,
        }
    }
}

impl CodecConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_allow_trailing_bytes(mut self, allow: bool) -> Self {
        self.allow_trailing_bytes = allow;
        self
    }
}
