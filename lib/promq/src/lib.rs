//! Typed client for the Prometheus HTTP API.
//!
//! Prometheus encodes samples as positional JSON arrays (`[1435781451.781, "1"]`).
//! promq decodes them into named structs with `#[derive(TupleArray)]`, and
//! wraps the query and metadata endpoints behind [`PrometheusClient`].
//!
//! # Example
//!
//! ```no_run
//! use chrono::Utc;
//! use promq::prelude::*;
//!
//! # async fn run() -> promq::Result<()> {
//! let prometheus = PrometheusClient::from_url("http://localhost:9090")?;
//!
//! let response = prometheus.query("up", Utc::now(), None).await?;
//! if let Some(QueryResult::Vector(series)) = response.data.map(QueryData::into_result) {
//!     for s in series {
//!         println!("{} {:?}", s.metric["job"], s.value.and_then(|v| v.value_f64()));
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Positional arrays of your own:
//!
//! ```
//! use promq::TupleArray;
//!
//! #[derive(Debug, PartialEq, TupleArray)]
//! struct Point {
//!     x: i64,
//!     label: String,
//! }
//!
//! let point: Point = serde_json::from_str(r#"[3, "a"]"#).expect("decode");
//! assert_eq!(point, Point { x: 3, label: "a".into() });
//! assert_eq!(serde_json::to_string(&point).expect("encode"), r#"[3,"a"]"#);
//! ```
//!
//! See the [tutorial][_tutorial] for a complete guide.

// Generated code names `::promq`, which must also resolve inside this crate.
extern crate self as promq;

pub mod _tutorial;
mod client;
mod config;
mod connector;
pub mod middleware;
pub mod model;
pub mod prelude;
mod prometheus;
mod query;

// Re-export client types
pub use client::{HyperClient, HyperClientBuilder, ServiceFuture};
pub use config::{ClientConfig, ClientConfigBuilder, DEFAULT_USER_AGENT};
pub use prometheus::{LabelsResponse, PrometheusClient, QueryResponse, SeriesResponse};
pub use query::{QueryRangeRequest, QueryRequest, TimeRange};

pub use model::{
    HistogramBucket, HistogramSample, InstantSeries, Labels, NativeHistogram, QueryData,
    QueryResult, RangeSeries, ResponseEnvelope, ResponseStatus, Sample,
};

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use promq_core::{
    CodecError, ContentType, Error, FieldReader, HttpClient, MAX_ARITY, Method, ParamValue,
    ParseDurationError, PromDuration, QueryParams, Request, RequestBuilder, Response, Result,
    TupleArray, TupleShape, from_json, to_scalar_string, value_kind,
};

// Re-export http types for status codes and headers
pub use promq_core::{StatusCode, header};

// Re-export crates for macro-generated code
pub use promq_core::tuple;
pub use serde;

// Re-export macros
pub use promq_macro::TupleArray;
