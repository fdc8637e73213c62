//! Tuple array codec.
//!
//! Prometheus encodes samples as positional JSON arrays with heterogeneous
//! elements, e.g. `[1609459200.000, "1.234"]`: a numeric timestamp followed by
//! a *quoted* value. This module maps such arrays onto Rust tuples (and onto
//! structs deriving `TupleArray`) without a hand-written converter per shape.
//!
//! - [`TupleShape`] - the declared arity and field types of a shape
//! - [`encode`] / [`decode`] - conversion to and from [`serde_json::Value`]
//! - [`serialize`] / [`deserialize`] - usable with `#[serde(with = "promq_core::tuple")]`
//! - [`TupleArray`] - wrapper type for use inside `Option`, `Vec`, maps, ...
//!
//! Decoding is strict: the array must hold exactly [`TupleShape::ARITY`]
//! elements, each decoded positionally into its field type.
//!
//! # Example
//!
//! ```
//! use promq_core::tuple;
//! use serde_json::json;
//!
//! let pair: (f64, String) = tuple::decode(json!([1700000000.5, "3.14"])).expect("decode");
//! assert_eq!(pair, (1700000000.5, "3.14".to_string()));
//!
//! let value = tuple::encode(&pair).expect("encode");
//! assert_eq!(value, json!([1700000000.5, "3.14"]));
//! ```

use std::any::type_name;

use serde::de::{DeserializeOwned, Deserializer};
use serde::ser::{SerializeTuple, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::CodecError;

/// Largest arity supported by the tuple implementations and the derive.
pub const MAX_ARITY: usize = 7;

/// A fixed-arity, positionally typed shape.
///
/// Implemented for tuples of 1 to [`MAX_ARITY`] elements and generated by
/// `#[derive(TupleArray)]` for structs.
pub trait TupleShape: Sized {
    /// Number of fields, identical on the wire and in memory.
    const ARITY: usize;

    /// Serialize every field, in order, as one tuple element.
    fn serialize_fields<S: SerializeTuple>(&self, tuple: &mut S) -> Result<(), S::Error>;

    /// Build the value by reading exactly [`Self::ARITY`] fields from `fields`.
    fn decode_fields(fields: &mut FieldReader) -> Result<Self, CodecError>;
}

/// Positional reader over the elements of a JSON array.
///
/// Handed to [`TupleShape::decode_fields`]; each call to [`FieldReader::field`]
/// consumes the next element.
#[derive(Debug)]
pub struct FieldReader {
    elements: std::vec::IntoIter<Value>,
    expected: usize,
    next_index: usize,
}

impl FieldReader {
    fn new(elements: Vec<Value>, expected: usize) -> Self {
        Self {
            elements: elements.into_iter(),
            expected,
            next_index: 0,
        }
    }

    /// Decode the next element into `F`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::ArityMismatch`] when the array is exhausted and
    /// [`CodecError::FieldDecode`] when the element does not decode into `F`.
    pub fn field<F: DeserializeOwned>(&mut self) -> Result<F, CodecError> {
        let index = self.next_index;
        let element = self.elements.next().ok_or(CodecError::ArityMismatch {
            expected: self.expected,
            actual: index,
        })?;
        self.next_index += 1;

        serde_json::from_value(element).map_err(|source| CodecError::FieldDecode {
            index,
            field_type: type_name::<F>(),
            source,
        })
    }

    fn finish(self) -> Result<(), CodecError> {
        if self.elements.as_slice().is_empty() {
            Ok(())
        } else {
            Err(CodecError::TrailingElements {
                expected: self.expected,
            })
        }
    }
}

/// Encode a tuple shape as a JSON array.
///
/// # Errors
///
/// Returns [`CodecError::Encode`] if a field fails to serialize.
pub fn encode<T: TupleShape>(tuple: &T) -> Result<Value, CodecError> {
    serde_json::to_value(Fields(tuple)).map_err(CodecError::Encode)
}

/// Decode a JSON array into a tuple shape.
///
/// # Errors
///
/// - [`CodecError::ShapeMismatch`] if `value` is not an array
/// - [`CodecError::ArityMismatch`] if the array is shorter than the arity
/// - [`CodecError::FieldDecode`] if an element does not match its field type
/// - [`CodecError::TrailingElements`] if the array is longer than the arity
pub fn decode<T: TupleShape>(value: Value) -> Result<T, CodecError> {
    let elements = match value {
        Value::Array(elements) => elements,
        other => return Err(CodecError::shape_mismatch("array", &other)),
    };

    if elements.len() < T::ARITY {
        return Err(CodecError::ArityMismatch {
            expected: T::ARITY,
            actual: elements.len(),
        });
    }

    let mut fields = FieldReader::new(elements, T::ARITY);
    let tuple = T::decode_fields(&mut fields)?;
    fields.finish()?;

    Ok(tuple)
}

/// Serialize a tuple shape as a sequence of [`TupleShape::ARITY`] elements.
///
/// # Errors
///
/// Propagates the serializer's error for any field.
pub fn serialize<T, S>(tuple: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: TupleShape,
    S: Serializer,
{
    let mut seq = serializer.serialize_tuple(T::ARITY)?;
    tuple.serialize_fields(&mut seq)?;
    seq.end()
}

/// Deserialize a tuple shape from an array.
///
/// The input is buffered as a [`Value`] and decoded with [`decode`]; codec
/// errors are reported through the deserializer's custom error.
///
/// # Errors
///
/// Returns the deserializer's error if the input is not valid JSON-like data
/// or if [`decode`] rejects it.
pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: TupleShape,
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    decode(value).map_err(serde::de::Error::custom)
}

struct Fields<'a, T>(&'a T);

impl<T: TupleShape> Serialize for Fields<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize(self.0, serializer)
    }
}

// ============================================================================
// Wrapper
// ============================================================================

/// Wrapper giving any [`TupleShape`] an array-shaped serde representation.
///
/// Use it where `#[serde(with = ...)]` does not reach, e.g. `Vec<TupleArray<(f64, String)>>`.
///
/// # Example
///
/// ```
/// use promq_core::TupleArray;
///
/// let values: Vec<TupleArray<(f64, String)>> =
///     serde_json::from_str(r#"[[1.5, "1"], [3.0, "2"]]"#).expect("decode");
/// assert_eq!(values[1].0, (3.0, "2".to_string()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TupleArray<T>(pub T);

impl<T> TupleArray<T> {
    /// Unwrap the inner value.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> From<T> for TupleArray<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

impl<T: TupleShape> Serialize for TupleArray<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize(&self.0, serializer)
    }
}

impl<'de, T: TupleShape> Deserialize<'de> for TupleArray<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize(deserializer).map(Self)
    }
}

// ============================================================================
// Tuple implementations
// ============================================================================

macro_rules! impl_tuple_shape {
    ($arity:literal => $($index:tt : $field:ident),+) => {
        impl<$($field),+> TupleShape for ($($field,)+)
        where
            $($field: Serialize + DeserializeOwned,)+
        {
            const ARITY: usize = $arity;

            fn serialize_fields<S: SerializeTuple>(&self, tuple: &mut S) -> Result<(), S::Error> {
                $(tuple.serialize_element(&self.$index)?;)+
                Ok(())
            }

            fn decode_fields(fields: &mut FieldReader) -> Result<Self, CodecError> {
                Ok(($(fields.field::<$field>()?,)+))
            }
        }
    };
}

impl_tuple_shape!(1 => 0: A);
impl_tuple_shape!(2 => 0: A, 1: B);
impl_tuple_shape!(3 => 0: A, 1: B, 2: C);
impl_tuple_shape!(4 => 0: A, 1: B, 2: C, 3: D);
impl_tuple_shape!(5 => 0: A, 1: B, 2: C, 3: D, 4: E);
impl_tuple_shape!(6 => 0: A, 1: B, 2: C, 3: D, 4: E, 5: F);
impl_tuple_shape!(7 => 0: A, 1: B, 2: C, 3: D, 4: E, 5: F, 6: G);
