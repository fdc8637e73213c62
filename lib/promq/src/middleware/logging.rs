//! `tracing` instrumentation for API calls.
//!
//! Each call runs inside a `prometheus_request` span carrying the method and
//! endpoint path. `PromQL` expressions can be long, so the query string is
//! only logged in [`LogLevel::Debug`].

use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use bytes::Bytes;
use tower::{Layer, Service};
use tracing::{Instrument, debug, info, info_span, warn};

use crate::{Error, Request, Response, Result, ServiceFuture};

/// How much detail the middleware records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Endpoint, status and latency at `INFO`.
    #[default]
    Info,
    /// Also the query string, headers and body sizes, at `DEBUG`.
    Debug,
}

/// Layer producing [`Logging`] services.
///
/// ```
/// use promq::HyperClient;
/// use promq::middleware::LoggingLayer;
///
/// let client = HyperClient::builder()
///     .layer(LoggingLayer::debug())
///     .build();
/// # drop(client);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingLayer {
    level: LogLevel,
}

impl LoggingLayer {
    /// Log at [`LogLevel::Info`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Log at [`LogLevel::Debug`].
    #[must_use]
    pub const fn debug() -> Self {
        Self {
            level: LogLevel::Debug,
        }
    }

    /// Configured level.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = Logging<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Logging {
            inner,
            level: self.level,
        }
    }
}

/// Service logging each exchange around an inner service.
///
/// Error statuses are logged as warnings but still returned as responses.
#[derive(Debug, Clone)]
pub struct Logging<S> {
    inner: S,
    level: LogLevel,
}

impl<S> Logging<S> {
    /// Wrap `inner`, logging at [`LogLevel::Info`].
    pub fn new(inner: S) -> Self {
        LoggingLayer::new().layer(inner)
    }
}

impl<S> Service<Request<Bytes>> for Logging<S>
where
    S: Service<Request<Bytes>, Response = Response<Bytes>, Error = Error> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response<Bytes>;
    type Error = Error;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Bytes>) -> Self::Future {
        let span = info_span!(
            "prometheus_request",
            method = %request.method(),
            endpoint = request.url().path(),
        );
        let level = self.level;
        log_request(level, &request);

        // Take the service that was driven ready, leave a fresh clone behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(
            async move {
                let started = Instant::now();
                let result = inner.call(request).await;
                log_outcome(level, &result, started.elapsed());
                result
            }
            .instrument(span),
        )
    }
}

fn log_request(level: LogLevel, request: &Request<Bytes>) {
    if level == LogLevel::Debug {
        debug!(
            query = request.url().query().unwrap_or_default(),
            headers = ?request.headers(),
            body_bytes = request.body().map_or(0, Bytes::len),
            "sending request"
        );
    } else {
        info!("sending request");
    }
}

fn log_outcome(level: LogLevel, result: &Result<Response<Bytes>>, elapsed: Duration) {
    let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
    match result {
        Ok(response) if !response.is_success() => {
            warn!(status = response.status(), elapsed_ms, "server returned an error status");
        }
        Ok(response) if level == LogLevel::Debug => {
            let body_bytes = response.body().len();
            debug!(status = response.status(), elapsed_ms, body_bytes, "request completed");
        }
        Ok(response) => info!(status = response.status(), elapsed_ms, "request completed"),
        Err(err) => warn!(error = %err, elapsed_ms, "request failed"),
    }
}
