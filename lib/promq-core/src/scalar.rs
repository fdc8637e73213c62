//! Canonical scalar strings for query parameters.

use serde::Serialize;

use crate::CodecError;

/// Render a value as the bare text used in a URL query parameter.
///
/// The value goes through the JSON encoder first. Quoted text literals
/// (strings, timestamps, durations, unit enum variants) are decoded back with
/// the JSON decoder so escape sequences are undone exactly once; numbers and
/// booleans are returned as written.
///
/// # Errors
///
/// - [`CodecError::Encode`] if the value fails to serialize
/// - [`CodecError::ShapeMismatch`] if it encodes to `null` (including
///   non-finite floats), an array or an object
///
/// # Example
///
/// ```
/// use promq_core::to_scalar_string;
///
/// assert_eq!(to_scalar_string("up{job=\"api\"}").expect("scalar"), "up{job=\"api\"}");
/// assert_eq!(to_scalar_string(&42).expect("scalar"), "42");
/// assert_eq!(to_scalar_string(&true).expect("scalar"), "true");
/// ```
pub fn to_scalar_string<T: Serialize + ?Sized>(value: &T) -> Result<String, CodecError> {
    let text = serde_json::to_string(value).map_err(CodecError::Encode)?;

    match text.as_bytes().first() {
        Some(b'"') => serde_json::from_str(&text).map_err(CodecError::Encode),
        Some(b'[') => Err(not_scalar("array")),
        Some(b'{') => Err(not_scalar("object")),
        _ if text == "null" => Err(not_scalar("null")),
        _ => Ok(text),
    }
}

const fn not_scalar(found: &'static str) -> CodecError {
    CodecError::ShapeMismatch {
        expected: "scalar",
        found,
    }
}
