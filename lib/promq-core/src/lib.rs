//! Core types and traits for promq, a typed Prometheus HTTP API client.
//!
//! This crate provides the foundational types used by promq:
//! - [`tuple`] - Positional JSON array codec ([`TupleShape`], [`TupleArray`])
//! - [`to_scalar_string`] - Canonical scalar text for query parameters
//! - [`QueryParams`] and [`ParamValue`] - Ordered multi-valued parameters
//! - [`PromDuration`] - Prometheus duration syntax (`1h30m`)
//! - [`Method`] - HTTP method enum
//! - [`Request`] and [`RequestBuilder`] - HTTP request types
//! - [`Response`] - HTTP response type
//! - [`Error`], [`CodecError`] and [`Result`] - Error handling
//! - [`HttpClient`] - Core client trait for HTTP execution
//! - [`StatusCode`] - HTTP status codes (re-exported from `http` crate)
//! - [`header`] - HTTP header names (re-exported from `http` crate)

mod body;
mod client;
mod duration;
mod error;
mod method;
mod params;
pub mod prelude;
mod request;
mod response;
mod scalar;
pub mod tuple;

pub use body::{ContentType, from_json};
pub use client::HttpClient;
pub use duration::{ParseDurationError, PromDuration};
pub use error::{CodecError, Error, Result, value_kind};
pub use method::Method;
pub use params::{ParamValue, QueryParams};
pub use request::{Request, RequestBuilder};
pub use response::Response;
pub use scalar::to_scalar_string;
pub use tuple::{FieldReader, MAX_ARITY, TupleArray, TupleShape};

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};
