//! Request parameters for the Prometheus query and metadata endpoints.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::{PromDuration, QueryParams};

/// Instant query at a single evaluation time.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use promq::QueryRequest;
/// use std::time::Duration;
///
/// let time = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single().expect("valid");
/// let request = QueryRequest::new("sum(rate(http_requests_total[5m]))", time)
///     .timeout(Duration::from_secs(30));
///
/// assert_eq!(
///     request.to_params().to_query_string().expect("render"),
///     "query=sum%28rate%28http_requests_total%5B5m%5D%29%29&time=2024-05-01T12%3A00%3A00Z&timeout=30s"
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    /// `PromQL` expression.
    pub query: String,
    /// Evaluation time.
    pub time: DateTime<Utc>,
    /// Server-side evaluation timeout.
    pub timeout: Option<Duration>,
}

impl QueryRequest {
    /// Create an instant query without a timeout.
    #[must_use]
    pub fn new(query: impl Into<String>, time: DateTime<Utc>) -> Self {
        Self {
            query: query.into(),
            time,
            timeout: None,
        }
    }

    /// Set the server-side evaluation timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Parameters as sent on the wire: `query`, `time`, then `timeout`.
    #[must_use]
    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new()
            .with("query", &self.query)
            .with("time", self.time);
        add_timeout(&mut params, self.timeout);
        params
    }
}

/// Range query evaluated at every `step` between `start` and `end`.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRangeRequest {
    /// `PromQL` expression.
    pub query: String,
    /// Start of the range, inclusive.
    pub start: DateTime<Utc>,
    /// End of the range, inclusive.
    pub end: DateTime<Utc>,
    /// Resolution step, sent as fractional seconds.
    pub step: Duration,
    /// Server-side evaluation timeout.
    pub timeout: Option<Duration>,
}

impl QueryRangeRequest {
    /// Create a range query without a timeout.
    #[must_use]
    pub fn new(
        query: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        step: Duration,
    ) -> Self {
        Self {
            query: query.into(),
            start,
            end,
            step,
            timeout: None,
        }
    }

    /// Set the server-side evaluation timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Parameters as sent on the wire: `query`, `start`, `end`, `step`, then `timeout`.
    #[must_use]
    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new()
            .with("query", &self.query)
            .with("start", self.start)
            .with("end", self.end)
            .with("step", self.step.as_secs_f64());
        add_timeout(&mut params, self.timeout);
        params
    }
}

/// Add `timeout` unless it rounds down to zero milliseconds, which
/// Prometheus would take as an already expired deadline.
fn add_timeout(params: &mut QueryParams, timeout: Option<Duration>) {
    if let Some(timeout) = timeout.filter(|timeout| timeout.as_millis() > 0) {
        params.add("timeout", PromDuration::from(timeout));
    }
}

/// Time window for the metadata endpoints.
///
/// `start` and `end` are always sent together or not at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    /// Start of the window.
    pub start: DateTime<Utc>,
    /// End of the window.
    pub end: DateTime<Utc>,
}

impl TimeRange {
    /// Create a window.
    #[must_use]
    pub const fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }
}

/// Parameters shared by `labels`, `label/{name}/values` and `series`:
/// one `match[]` per selector, then `start` and `end` when a range is given.
pub(crate) fn metadata_params<S: AsRef<str>>(
    selectors: &[S],
    range: Option<TimeRange>,
) -> QueryParams {
    let mut params: QueryParams = selectors
        .iter()
        .map(|selector| ("match[]", selector.as_ref()))
        .collect();
    if let Some(TimeRange { start, end }) = range {
        params.add("start", start);
        params.add("end", end);
    }
    params
}
