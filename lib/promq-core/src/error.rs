//! Error types for promq.

use derive_more::{Display, Error, From};
use serde_json::Value;

// ============================================================================
// Codec Error
// ============================================================================

/// Failure of the structured-value codec.
///
/// Raised when a JSON document does not have the shape a tuple type declares,
/// or when a value cannot be rendered as a scalar query parameter.
#[derive(Debug, Display, Error)]
pub enum CodecError {
    /// The array has fewer elements than the tuple arity.
    #[display("unexpected number of tuple values: expected {expected}, actual {actual}")]
    ArityMismatch {
        /// Declared arity.
        expected: usize,
        /// Number of array elements found.
        actual: usize,
    },

    /// The array has more elements than the tuple arity.
    #[display("found more than the expected number of tuple values: expected {expected}")]
    TrailingElements {
        /// Declared arity.
        expected: usize,
    },

    /// The document node has the wrong kind.
    #[display("expected {expected}, found {found}")]
    ShapeMismatch {
        /// Kind of node required (`array`, `scalar`).
        expected: &'static str,
        /// Kind of node found.
        found: &'static str,
    },

    /// A single tuple element failed to decode into its field type.
    #[display("tuple element {index} is not a valid `{field_type}`: {source}")]
    FieldDecode {
        /// Position of the element in the array.
        index: usize,
        /// Rust type the element was decoded into.
        field_type: &'static str,
        /// Underlying decoder error.
        source: serde_json::Error,
    },

    /// A value failed to serialize.
    #[display("encoding error: {_0}")]
    Encode(serde_json::Error),
}

impl CodecError {
    /// Create a shape mismatch error describing the node that was found.
    #[must_use]
    pub fn shape_mismatch(expected: &'static str, found: &Value) -> Self {
        Self::ShapeMismatch {
            expected,
            found: value_kind(found),
        }
    }
}

/// Name of a JSON node kind, for diagnostics.
#[must_use]
pub const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Everything that can go wrong between building a query and decoding its
/// result.
///
/// Errors fall in three groups: the server answered with a failure
/// ([`Error::Http`], [`Error::Api`]), the exchange itself broke
/// ([`Error::Connection`], [`Error::Tls`], [`Error::Timeout`]), or the local
/// side could not build the request or read the answer.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// Non-2xx status whose body is not a Prometheus error envelope, as
    /// returned by proxies and load balancers.
    #[display("HTTP error {status}: {message}")]
    #[from(skip)]
    Http {
        /// Status code.
        status: u16,
        /// Reason phrase.
        message: String,
        /// Raw body, kept for diagnostics.
        #[error(not(source))]
        body: Option<bytes::Bytes>,
    },

    /// Failure reported by Prometheus itself.
    #[display("Prometheus API error {status} ({error_type}): {error}")]
    #[from(skip)]
    Api {
        /// Status code.
        status: u16,
        /// `errorType` field, such as `bad_data` or `timeout`.
        error_type: String,
        /// `error` field.
        error: String,
    },

    /// Could not reach the server.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS handshake or certificate failure.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// The exchange did not finish within the configured budget.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// The request could not be built, e.g. a header value with a newline.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// A request body failed to serialize.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// A response body did not match the expected type.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// Location of the mismatch, like `data.result[0].value`.
        path: String,
        /// Decoder message.
        message: String,
    },

    /// Tuple array or scalar rendering failure.
    #[display("codec error: {_0}")]
    #[from]
    Codec(CodecError),

    /// Base URL or endpoint could not be parsed.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),
}

/// Shorthand for results carrying [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

// Constructors
impl Error {
    /// HTTP failure without a body.
    #[must_use]
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        Self::Http {
            status,
            message,
            body: None,
        }
    }

    /// HTTP failure keeping the raw response body.
    #[must_use]
    pub fn http_with_body(status: u16, message: impl Into<String>, body: bytes::Bytes) -> Self {
        Self::Http {
            status,
            message: message.into(),
            body: Some(body),
        }
    }

    /// Failure decoded from a Prometheus error envelope.
    #[must_use]
    pub fn api(status: u16, error_type: impl Into<String>, error: impl Into<String>) -> Self {
        let (error_type, error) = (error_type.into(), error.into());
        Self::Api {
            status,
            error_type,
            error,
        }
    }

    /// Unreachable server.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// TLS failure.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Request that cannot be sent as built.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Decoding failure at `path`.
    #[must_use]
    pub fn json_deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        let (path, message) = (path.into(), message.into());
        Self::JsonDeserialization { path, message }
    }
}

// Inspection
impl Error {
    /// The exchange ran out of time.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// The server could not be reached. TLS failures are not included.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Status code of a server-side failure.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        let (Self::Http { status, .. } | Self::Api { status, .. }) = self else {
            return None;
        };
        Some(*status)
    }

    /// Failure with a 4xx status, usually a malformed query.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status_code()
            .is_some_and(|status| status.is_client_error())
    }

    /// Failure with a 5xx status.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code()
            .is_some_and(|status| status.is_server_error())
    }

    /// Body kept by [`Error::Http`].
    #[must_use]
    pub fn body(&self) -> Option<&bytes::Bytes> {
        let Self::Http { body, .. } = self else {
            return None;
        };
        body.as_ref()
    }

    /// Underlying codec failure.
    #[must_use]
    pub const fn codec(&self) -> Option<&CodecError> {
        if let Self::Codec(err) = self {
            Some(err)
        } else {
            None
        }
    }

    fn status_code(&self) -> Option<http::StatusCode> {
        self.status()
            .and_then(|status| http::StatusCode::from_u16(status).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::http(404, "Not Found");
        assert_eq!(err.to_string(), "HTTP error 404: Not Found");

        let err = Error::Timeout;
        assert_eq!(err.to_string(), "request timeout");

        let err = Error::connection("failed to connect");
        assert_eq!(err.to_string(), "connection error: failed to connect");

        let err = Error::api(400, "bad_data", "invalid parameter \"query\"");
        assert_eq!(
            err.to_string(),
            "Prometheus API error 400 (bad_data): invalid parameter \"query\""
        );

        let err = Error::json_deserialization("data.result", "invalid type: null");
        assert_eq!(
            err.to_string(),
            "JSON deserialization error at 'data.result': invalid type: null"
        );
    }

    #[test]
    fn codec_error_display() {
        let err = CodecError::ArityMismatch {
            expected: 2,
            actual: 1,
        };
        assert_eq!(
            err.to_string(),
            "unexpected number of tuple values: expected 2, actual 1"
        );

        let err = CodecError::TrailingElements { expected: 2 };
        assert_eq!(
            err.to_string(),
            "found more than the expected number of tuple values: expected 2"
        );

        let err = CodecError::shape_mismatch("array", &serde_json::json!({"a": 1}));
        assert_eq!(err.to_string(), "expected array, found object");
    }

    #[test]
    fn codec_error_converts() {
        let err: Error = CodecError::TrailingElements { expected: 3 }.into();
        assert!(matches!(
            err.codec(),
            Some(CodecError::TrailingElements { expected: 3 })
        ));
        assert!(err.to_string().starts_with("codec error: "));
    }

    #[test]
    fn error_status() {
        let err = Error::http(404, "Not Found");
        assert_eq!(err.status(), Some(404));
        assert!(err.is_client_error());
        assert!(!err.is_server_error());

        let err = Error::api(503, "unavailable", "too many queries");
        assert_eq!(err.status(), Some(503));
        assert!(!err.is_client_error());
        assert!(err.is_server_error());

        let err = Error::Timeout;
        assert_eq!(err.status(), None);
        assert!(!err.is_client_error());
        assert!(!err.is_server_error());
    }

    #[test]
    fn error_is_timeout() {
        assert!(Error::Timeout.is_timeout());
        assert!(!Error::http(404, "Not Found").is_timeout());
    }

    #[test]
    fn error_is_connection() {
        assert!(Error::connection("failed").is_connection());
        assert!(!Error::Timeout.is_connection());
    }

    #[test]
    fn error_body() {
        let err = Error::http(502, "Bad Gateway");
        assert!(err.body().is_none());

        let body = bytes::Bytes::from("upstream down");
        let err = Error::http_with_body(502, "Bad Gateway", body.clone());
        assert_eq!(err.body(), Some(&body));

        assert!(Error::Timeout.body().is_none());
    }

    #[test]
    fn value_kinds() {
        assert_eq!(value_kind(&serde_json::json!(null)), "null");
        assert_eq!(value_kind(&serde_json::json!(true)), "boolean");
        assert_eq!(value_kind(&serde_json::json!(1.5)), "number");
        assert_eq!(value_kind(&serde_json::json!("x")), "string");
        assert_eq!(value_kind(&serde_json::json!([1])), "array");
        assert_eq!(value_kind(&serde_json::json!({})), "object");
    }
}
