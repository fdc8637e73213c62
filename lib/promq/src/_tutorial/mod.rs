//! # Tutorial: Querying Prometheus with promq
//!
//! Learn to decode Prometheus responses and call its HTTP API step by step.
//!
//! ## Chapters
//!
//! 1. [Tuple Arrays][chapter_0] - Positional JSON arrays as structs
//! 2. [Querying][chapter_1] - Instant, range and metadata endpoints
//! 3. [Errors & Middleware][chapter_2] - Error variants, logging, Tower layers
//!
//! Ready? Start with [Chapter 0: Tuple Arrays][chapter_0].

pub mod chapter_0;
pub mod chapter_1;
pub mod chapter_2;
