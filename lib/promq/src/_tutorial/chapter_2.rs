//! # Chapter 2: Errors & Middleware
//!
//! ## Error Variants
//!
//! Non-2xx responses carrying a Prometheus error envelope become
//! [`Error::Api`][crate::Error::Api]. Anything else, such as a proxy's HTML
//! page, becomes [`Error::Http`][crate::Error::Http] with the raw body:
//!
//! ```no_run
//! # use promq::prelude::*;
//! # async fn run(prometheus: PrometheusClient) {
//! match prometheus.query("up{", chrono::Utc::now(), None).await {
//!     Ok(response) => println!("{:?}", response.data),
//!     Err(Error::Api { error_type, error, .. }) => eprintln!("{error_type}: {error}"),
//!     Err(err) if err.is_timeout() => eprintln!("timed out"),
//!     Err(err) => eprintln!("{err}"),
//! }
//! # }
//! ```
//!
//! Decoding failures report the JSON path, e.g.
//! `data.result[0].value: unexpected number of tuple values: expected 2, actual 1`.
//!
//! ## Logging
//!
//! Requests are logged with `tracing` under a `prometheus_request` span:
//!
//! ```
//! use promq::HyperClient;
//!
//! let client = HyperClient::builder().with_logging().build();
//! let verbose = HyperClient::builder().with_debug_logging().build();
//! # drop((client, verbose));
//! ```
//!
//! ## Tower Layers
//!
//! Any layer whose service speaks `Request<Bytes>` / `Response<Bytes>` can be
//! added. Layers wrap in the order added, so the last one sees the request first:
//!
//! ```text
//! Request → Last layer → ... → First layer → HTTP
//! ```
//!
//! See [`middleware`][crate::middleware] and the
//! [Tower documentation](https://docs.rs/tower) for writing your own.
