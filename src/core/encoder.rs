//! Base64 transport encoding for import strings

use crate::error::{TwraError, TwraResult};
use base64::{engine::general_purpose::STANDARD, Engine};

/// Standard, padded, unwrapped base64 of the UTF-8 bytes
pub fn encode(text: &str) -> String {
    STANDARD.encode(text.as_bytes())
}

/// Inverse of [`encode`]. Surrounding whitespace is ignored.
pub fn decode(encoded: &str) -> TwraResult<String> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| TwraError::Decode(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| TwraError::Decode(e.to_string()))
}
