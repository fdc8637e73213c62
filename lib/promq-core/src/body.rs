//! Media types and JSON decoding of response bodies.

use derive_more::Display;
use serde::de::DeserializeOwned;

/// Media types exchanged with the Prometheus API.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// Every API response.
    #[display("application/json")]
    Json,
    /// Body of `POST` requests.
    #[display("application/x-www-form-urlencoded")]
    FormUrlEncoded,
}

impl ContentType {
    /// MIME type, suitable for a header value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::FormUrlEncoded => "application/x-www-form-urlencoded",
        }
    }
}

/// Decode a JSON body, naming the failing location on error.
///
/// The path in the error follows field and index access from the root, e.g.
/// `data.result[0].value`, which makes a single bad sample easy to find in a
/// large response.
///
/// # Errors
///
/// Returns [`crate::Error::JsonDeserialization`] for malformed JSON or a
/// document that does not fit `T`.
///
/// # Example
///
/// ```
/// use promq_core::from_json;
/// use serde::Deserialize;
///
/// #[derive(Debug, PartialEq, Deserialize)]
/// struct Target { job: String }
///
/// let target: Target = from_json(br#"{"job":"node"}"#).expect("deserialize");
/// assert_eq!(target, Target { job: "node".to_string() });
/// ```
pub fn from_json<T: DeserializeOwned>(bytes: &[u8]) -> crate::Result<T> {
    let de = &mut serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(de).map_err(|err| {
        let path = err.path().to_string();
        crate::Error::json_deserialization(path, err.into_inner().to_string())
    })
}
