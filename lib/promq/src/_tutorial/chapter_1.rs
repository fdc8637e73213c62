//! # Chapter 1: Querying
//!
//! Call the Prometheus HTTP API with [`PrometheusClient`][crate::PrometheusClient].
//!
//! ## Creating a Client
//!
//! ```no_run
//! use promq::{HyperClient, PrometheusClient};
//! use std::time::Duration;
//!
//! # fn run() -> promq::Result<()> {
//! // Defaults: 30s timeout, rustls with webpki roots
//! let prometheus = PrometheusClient::from_url("http://localhost:9090")?;
//!
//! // Custom transport, behind a path prefix
//! let client = HyperClient::builder()
//!     .timeout(Duration::from_secs(5))
//!     .user_agent("dashboards/2.1")
//!     .build();
//! let prometheus = PrometheusClient::new(client, "https://metrics.example.com/prometheus")?;
//! # drop(prometheus);
//! # Ok(())
//! # }
//! ```
//!
//! ## Instant Queries
//!
//! ```no_run
//! # use promq::prelude::*;
//! # async fn run(prometheus: PrometheusClient) -> promq::Result<()> {
//! use chrono::Utc;
//! use std::time::Duration;
//!
//! let response = prometheus
//!     .query("rate(http_requests_total[5m])", Utc::now(), Some(Duration::from_secs(10)))
//!     .await?;
//!
//! for series in response.data.as_ref().and_then(QueryData::as_vector).unwrap_or_default() {
//!     // native histogram series have no float `value`
//!     let value = series.value.as_ref().and_then(Sample::value_f64);
//!     println!("{:?} {value:?}", series.metric);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Range Queries
//!
//! ```no_run
//! # use promq::prelude::*;
//! # async fn run(prometheus: PrometheusClient) -> promq::Result<()> {
//! use chrono::{Duration as Span, Utc};
//! use std::time::Duration;
//!
//! let end = Utc::now();
//! let request = QueryRangeRequest::new("up", end - Span::hours(1), end, Duration::from_secs(60));
//!
//! // POST sends the parameters as a form body, for long expressions
//! let response = prometheus.query_range_post(&request).await?;
//! if let Some(QueryResult::Matrix(series)) = response.data.map(QueryData::into_result) {
//!     println!("{} series", series.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Metadata
//!
//! Selectors are sent as repeated `match[]` parameters. A [`TimeRange`][crate::TimeRange]
//! adds `start` and `end`:
//!
//! ```no_run
//! # use promq::prelude::*;
//! # async fn run(prometheus: PrometheusClient) -> promq::Result<()> {
//! let names = prometheus.labels::<&str>(&[], None).await?;
//! let jobs = prometheus.label_values("job", &["up"], None).await?;
//! let series = prometheus.series(&[r#"up{job="node"}"#], None).await?;
//! # drop((names, jobs, series));
//! # Ok(())
//! # }
//! ```
//!
//! Every call returns the full [`ResponseEnvelope`][crate::ResponseEnvelope], so
//! `warnings` stay visible.
//!
//! ## Next Steps
//!
//! - [Chapter 2: Errors & Middleware][super::chapter_2]
