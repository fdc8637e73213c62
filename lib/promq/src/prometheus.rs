//! Typed client for the Prometheus HTTP API.
//!
//! [`PrometheusClient`] wraps any [`HttpClient`] with a base URL and exposes
//! the query and metadata endpoints under `api/v1/`. Each endpoint has a GET
//! flavour (parameters in the URL) and a POST flavour (the same parameters as
//! a form body, for expressions too long for a URL).

use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::de::{DeserializeOwned, IgnoredAny};
use tracing::debug;
use url::Url;

use crate::model::{Labels, QueryData, ResponseEnvelope};
use crate::query::{QueryRangeRequest, QueryRequest, TimeRange, metadata_params};
use crate::{
    Error, HttpClient, HyperClient, Method, QueryParams, Request, Response, Result, from_json,
};

/// Characters escaped in a label name used as a path segment.
const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'\\')
    .add(b'%');

const QUERY: &str = "api/v1/query";
const QUERY_RANGE: &str = "api/v1/query_range";
const LABELS: &str = "api/v1/labels";
const SERIES: &str = "api/v1/series";

/// Envelope of an expression query.
pub type QueryResponse = ResponseEnvelope<QueryData>;

/// Envelope of the `labels` and `label/{name}/values` endpoints.
pub type LabelsResponse = ResponseEnvelope<Vec<String>>;

/// Envelope of the `series` endpoint.
pub type SeriesResponse = ResponseEnvelope<Vec<Labels>>;

/// Prometheus HTTP API client.
///
/// Successful responses are returned as their [`ResponseEnvelope`], warnings
/// included. Non-2xx responses become [`Error::Api`] when the body is a
/// Prometheus error envelope, and [`Error::Http`] otherwise.
///
/// # Example
///
/// ```no_run
/// use chrono::Utc;
/// use promq::PrometheusClient;
///
/// # async fn run() -> promq::Result<()> {
/// let prometheus = PrometheusClient::from_url("http://localhost:9090")?;
///
/// let response = prometheus.query("up", Utc::now(), None).await?;
/// for series in response.data.as_ref().and_then(|data| data.as_vector()).unwrap_or_default() {
///     println!("{:?} = {:?}", series.metric, series.value);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PrometheusClient<C = HyperClient> {
    client: C,
    base_url: Url,
}

impl<C: Clone> Clone for PrometheusClient<C> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
        }
    }
}

impl PrometheusClient<HyperClient> {
    /// Create a client with a default [`HyperClient`].
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed or cannot be a base.
    pub fn from_url(base_url: impl AsRef<str>) -> Result<Self> {
        Self::new(HyperClient::new(), base_url)
    }
}

impl<C> PrometheusClient<C> {
    /// Create a client for the server at `base_url`.
    ///
    /// A path prefix is kept, so `http://host/prometheus` queries
    /// `http://host/prometheus/api/v1/query`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed or cannot be a base.
    pub fn new(client: C, base_url: impl AsRef<str>) -> Result<Self> {
        let base_url = Url::parse(base_url.as_ref())?;
        if base_url.cannot_be_a_base() {
            return Err(Error::invalid_request(format!(
                "not a base URL: {base_url}"
            )));
        }
        Ok(Self::with_url(client, base_url))
    }

    /// Create a client with a pre-parsed URL.
    #[must_use]
    pub fn with_url(client: C, mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        base_url.set_query(None);
        base_url.set_fragment(None);
        Self { client, base_url }
    }

    /// Base URL, always ending with `/`.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Get a reference to the inner HTTP client.
    #[must_use]
    pub fn inner(&self) -> &C {
        &self.client
    }

    /// Consume the wrapper and return the inner HTTP client.
    #[must_use]
    pub fn into_inner(self) -> C {
        self.client
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    fn label_values_endpoint(&self, label: &str) -> Result<Url> {
        // URL parsing resolves these as dot segments, even percent-encoded.
        if matches!(label, "" | "." | "..") {
            return Err(Error::invalid_request(format!("invalid label name: {label:?}")));
        }
        let label = utf8_percent_encode(label, PATH_SEGMENT_ENCODE_SET);
        self.endpoint(&format!("api/v1/label/{label}/values"))
    }
}

impl<C: HttpClient> PrometheusClient<C> {
    // ========================================================================
    // Expression queries
    // ========================================================================

    /// Evaluate an instant query at `time` (`GET api/v1/query`).
    pub async fn query(
        &self,
        query: &str,
        time: DateTime<Utc>,
        timeout: Option<Duration>,
    ) -> Result<QueryResponse> {
        let mut request = QueryRequest::new(query, time);
        request.timeout = timeout;
        self.get(QUERY, self.endpoint(QUERY)?, &request.to_params())
            .await
    }

    /// Evaluate an instant query with a form body (`POST api/v1/query`).
    pub async fn query_post(&self, request: &QueryRequest) -> Result<QueryResponse> {
        self.post(QUERY, self.endpoint(QUERY)?, &request.to_params())
            .await
    }

    /// Evaluate a range query (`GET api/v1/query_range`).
    pub async fn query_range(
        &self,
        query: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        step: Duration,
        timeout: Option<Duration>,
    ) -> Result<QueryResponse> {
        let mut request = QueryRangeRequest::new(query, start, end, step);
        request.timeout = timeout;
        self.get(QUERY_RANGE, self.endpoint(QUERY_RANGE)?, &request.to_params())
            .await
    }

    /// Evaluate a range query with a form body (`POST api/v1/query_range`).
    pub async fn query_range_post(&self, request: &QueryRangeRequest) -> Result<QueryResponse> {
        self.post(QUERY_RANGE, self.endpoint(QUERY_RANGE)?, &request.to_params())
            .await
    }

    // ========================================================================
    // Metadata
    // ========================================================================

    /// List label names (`GET api/v1/labels`).
    ///
    /// `selectors` are sent as repeated `match[]` parameters.
    pub async fn labels<S: AsRef<str>>(
        &self,
        selectors: &[S],
        range: Option<TimeRange>,
    ) -> Result<LabelsResponse> {
        self.get(LABELS, self.endpoint(LABELS)?, &metadata_params(selectors, range))
            .await
    }

    /// List label names with a form body (`POST api/v1/labels`).
    pub async fn labels_post<S: AsRef<str>>(
        &self,
        selectors: &[S],
        range: Option<TimeRange>,
    ) -> Result<LabelsResponse> {
        self.post(LABELS, self.endpoint(LABELS)?, &metadata_params(selectors, range))
            .await
    }

    /// List the values of `label` (`GET api/v1/label/{label}/values`).
    pub async fn label_values<S: AsRef<str>>(
        &self,
        label: &str,
        selectors: &[S],
        range: Option<TimeRange>,
    ) -> Result<LabelsResponse> {
        let url = self.label_values_endpoint(label)?;
        self.get("api/v1/label/values", url, &metadata_params(selectors, range))
            .await
    }

    /// List the values of `label` with a form body (`POST api/v1/label/{label}/values`).
    pub async fn label_values_post<S: AsRef<str>>(
        &self,
        label: &str,
        selectors: &[S],
        range: Option<TimeRange>,
    ) -> Result<LabelsResponse> {
        let url = self.label_values_endpoint(label)?;
        self.post("api/v1/label/values", url, &metadata_params(selectors, range))
            .await
    }

    /// Find series matching `selectors` (`GET api/v1/series`).
    pub async fn series<S: AsRef<str>>(
        &self,
        selectors: &[S],
        range: Option<TimeRange>,
    ) -> Result<SeriesResponse> {
        self.get(SERIES, self.endpoint(SERIES)?, &metadata_params(selectors, range))
            .await
    }

    /// Find series with a form body (`POST api/v1/series`).
    pub async fn series_post<S: AsRef<str>>(
        &self,
        selectors: &[S],
        range: Option<TimeRange>,
    ) -> Result<SeriesResponse> {
        self.post(SERIES, self.endpoint(SERIES)?, &metadata_params(selectors, range))
            .await
    }

    // ========================================================================
    // Transport
    // ========================================================================

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        url: Url,
        params: &QueryParams,
    ) -> Result<ResponseEnvelope<T>> {
        debug!(endpoint, method = %Method::Get, params = params.len(), "calling Prometheus API");
        let request = Request::builder(Method::Get, url)
            .query_params(params)?
            .build();
        self.send(request).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        url: Url,
        params: &QueryParams,
    ) -> Result<ResponseEnvelope<T>> {
        debug!(endpoint, method = %Method::Post, params = params.len(), "calling Prometheus API");
        let request = Request::builder(Method::Post, url).form(params)?.build();
        self.send(request).await
    }

    async fn send<T: DeserializeOwned>(&self, request: Request<Bytes>) -> Result<ResponseEnvelope<T>> {
        let response = self.client.execute(request).await?;
        handle_response(response)
    }
}

/// Decode a response envelope, mapping non-2xx statuses to errors.
fn handle_response<T: DeserializeOwned>(response: Response<Bytes>) -> Result<ResponseEnvelope<T>> {
    if response.is_success() {
        return response.json();
    }

    let status = response.status();
    if response.content_type().is_some()
        && let Ok(envelope) = from_json::<ResponseEnvelope<IgnoredAny>>(response.body())
    {
        return Err(Error::api(
            status,
            envelope.error_type.unwrap_or_default(),
            envelope.error.unwrap_or_default(),
        ));
    }

    let reason = response.reason();
    Err(Error::http_with_body(status, reason, response.into_body()))
}
