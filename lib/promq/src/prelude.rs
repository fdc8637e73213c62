//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types, functions, and macros
//! for easy glob importing:
//!
//! ```
//! use promq::prelude::*;
//!
//! #[derive(Debug, TupleArray)]
//! struct Bucket {
//!     le: String,
//!     count: u64,
//! }
//! ```

pub use crate::{
    ClientConfig, CodecError, ContentType, Error, HttpClient, HyperClient, InstantSeries, Labels,
    Method, ParamValue, PromDuration, PrometheusClient, QueryData, QueryParams, QueryResult, QueryRangeRequest,
    QueryRequest, RangeSeries, Request, RequestBuilder, Response, ResponseEnvelope, Result,
    Sample, StatusCode, TimeRange, TupleArray, TupleShape, from_json, header,
};
pub use serde::{Deserialize, Serialize};
