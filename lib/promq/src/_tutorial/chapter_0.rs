//! # Chapter 0: Tuple Arrays
//!
//! Prometheus sends samples as `[timestamp, "value"]` rather than as objects.
//! promq maps such arrays onto named structs.
//!
//! ## What You'll Learn
//!
//! - Derive the codec with `#[derive(TupleArray)]`
//! - Wrap plain Rust tuples with [`TupleArray<T>`][crate::tuple::TupleArray]
//! - Read the errors the codec produces
//!
//! ## Prerequisites
//!
//! Add to `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! promq = "0.1"
//! serde_json = "1"
//! tokio = { version = "1", features = ["full"] }
//! ```
//!
//! ## Your First Tuple
//!
//! Fields map to array positions in declaration order:
//!
//! ```
//! use promq::TupleArray;
//!
//! #[derive(Debug, PartialEq, TupleArray)]
//! struct Bucket {
//!     upper_bound: String,
//!     count: u64,
//! }
//!
//! let bucket: Bucket = serde_json::from_str(r#"["0.5", 129389]"#).expect("decode");
//! assert_eq!(bucket.count, 129_389);
//! assert_eq!(serde_json::to_string(&bucket).expect("encode"), r#"["0.5",129389]"#);
//! ```
//!
//! Tuple structs work too, as do nested tuples and `Vec`s of them:
//!
//! ```
//! use promq::TupleArray;
//!
//! #[derive(Debug, PartialEq, TupleArray)]
//! struct Pair(f64, String);
//!
//! let pairs: Vec<Pair> = serde_json::from_str(r#"[[1.5, "a"], [2, "b"]]"#).expect("decode");
//! assert_eq!(pairs[1], Pair(2.0, "b".into()));
//! ```
//!
//! Up to seven fields are supported.
//!
//! ## Without a Derive
//!
//! Plain tuples go through the [`TupleArray`][crate::tuple::TupleArray] wrapper:
//!
//! ```
//! use promq::tuple::TupleArray;
//!
//! let TupleArray((id, name)): TupleArray<(u32, String)> =
//!     serde_json::from_str(r#"[7, "seven"]"#).expect("decode");
//! assert_eq!((id, name.as_str()), (7, "seven"));
//! ```
//!
//! ## Decoding Errors
//!
//! Arrays that do not match the shape are rejected with a positional message:
//!
//! ```
//! use promq::TupleArray;
//!
//! #[derive(Debug, TupleArray)]
//! struct Sample(f64, String);
//!
//! let err = serde_json::from_str::<Sample>("[1.0]").unwrap_err();
//! assert!(err.to_string().contains("expected 2, actual 1"));
//!
//! let err = serde_json::from_str::<Sample>(r#"[1.0, "x", "y"]"#).unwrap_err();
//! assert!(err.to_string().contains("more than the expected number"));
//! ```
//!
//! ## Next Steps
//!
//! - [Chapter 1: Querying][super::chapter_1] - Call the Prometheus API
