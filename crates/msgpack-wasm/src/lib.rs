//! WASM bindings for msgpack-core.
//!
//! Exposes `encode` and `decode` as `#[wasm_bindgen]` functions that can be
//! called from JavaScript/TypeScript. `encode` returns a `Uint8Array`;
//! `decode` takes one and returns compact JSON text.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p msgpack-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir pkg/ \
//!   target/wasm32-unknown-unknown/release/msgpack_wasm.wasm
//! ```

use wasm_bindgen::prelude::*;

/// Encode a JSON string into MessagePack bytes.
///
/// Returns the bytes, or throws a JS error if the input is not valid JSON.
#[wasm_bindgen]
pub fn encode(json: &str) -> std::result::Result<Vec<u8>, JsValue> {
    msgpack_core::encode(json).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Decode MessagePack bytes back into compact JSON.
///
/// Throws a JS error on truncated or malformed input, trailing bytes, or a
/// decoded NaN/infinity.
#[wasm_bindgen]
pub fn decode(bytes: &[u8]) -> std::result::Result<String, JsValue> {
    msgpack_core::decode(bytes).map_err(|e| JsValue::from_str(&e.to_string()))
}
