//! Procedural macros for the promq Prometheus client.
//!
//! This crate provides:
//! - `#[derive(TupleArray)]` - Encode a struct as a positional JSON array
//!
//! # Example
//!
//! ```ignore
//! use promq::TupleArray;
//!
//! #[derive(TupleArray)]
//! struct Sample {
//!     timestamp: f64,
//!     value: String,
//! }
//!
//! // [1700000000.5, "3.14"] <-> Sample { timestamp: 1700000000.5, value: "3.14".into() }
//! ```

mod tuple_derive;

use proc_macro::TokenStream;

/// Derive `TupleShape`, `Serialize` and `Deserialize` for a struct encoded as
/// a JSON array.
///
/// Fields map to array elements in declaration order; field names never
/// appear on the wire. Each element is encoded and decoded with the field
/// type's own serde implementation, so a field may itself be a derived tuple
/// or a `promq::TupleArray` wrapper.
///
/// Supports structs with named or positional fields, 1 to 7 of them, and no
/// generic parameters.
///
/// Decoding is strict: the array must have exactly as many elements as the
/// struct has fields.
///
/// # Example
///
/// ```ignore
/// use promq::TupleArray;
///
/// #[derive(Debug, TupleArray)]
/// struct Bucket(u8, String, String, String);
///
/// let bucket: Bucket = serde_json::from_str(r#"[0, "0.5", "1", "12"]"#)?;
/// ```
#[proc_macro_derive(TupleArray)]
pub fn derive_tuple_array(input: TokenStream) -> TokenStream {
    tuple_derive::expand_tuple_derive(input.into())
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
