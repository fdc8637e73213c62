//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions
//! for easy glob importing:
//!
//! ```
//! use promq_core::prelude::*;
//!
//! let params = QueryParams::new().with("query", "up");
//! assert_eq!(params.to_query_string().expect("render"), "query=up");
//! ```

pub use crate::{
    CodecError, ContentType, Error, HttpClient, Method, ParamValue, PromDuration, QueryParams,
    Request, RequestBuilder, Response, Result, TupleArray, TupleShape, from_json,
    to_scalar_string,
};
