//! HTTP transport for the Prometheus client, built on hyper-util.
//!
//! [`HyperClient`] is a stack of tower services: the hyper transport at the
//! bottom, then every layer added through [`HyperClientBuilder::layer`]. The
//! stack is type-erased into a `Clone + Send + Sync` boxed service, so a
//! client can be shared across tasks without locking.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use bytes::Bytes;
use http::{HeaderName, HeaderValue};
use http_body_util::{BodyExt, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};
use tower::util::BoxCloneSyncService;
use tower::{Layer, ServiceExt};
use tower_service::Service;

use crate::{
    ContentType, Error, Request, Response, Result, config::ClientConfig,
    connector::https_connector, header, middleware::LoggingLayer,
};

/// Type-erased middleware stack.
pub type BoxedService = BoxCloneSyncService<Request<Bytes>, Response<Bytes>, Error>;

/// Future returned by the [`HyperClient`] tower service.
pub type ServiceFuture = Pin<Box<dyn Future<Output = Result<Response<Bytes>>> + Send + 'static>>;

type LayerFn = Box<dyn FnOnce(BoxedService) -> BoxedService + Send>;

// ============================================================================
// Transport
// ============================================================================

/// Bottom of the stack: one HTTP exchange over the pooled hyper client.
#[derive(Clone)]
struct Transport {
    client: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
    timeout: Duration,
    user_agent: Arc<str>,
}

impl Transport {
    fn new(config: &ClientConfig) -> Self {
        let client = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_idle_per_host)
            .build(https_connector(config.connect_timeout));

        Self {
            client,
            timeout: config.timeout,
            user_agent: Arc::from(config.user_agent.as_str()),
        }
    }

    /// Convert a promq request into a hyper request.
    ///
    /// `User-Agent` and `Accept: application/json` are added unless the
    /// request already sets them, in any letter case.
    fn to_hyper(request: Request<Bytes>, user_agent: &str) -> Result<http::Request<Full<Bytes>>> {
        let (method, url, headers, body) = request.into_parts();

        let mut hyper_request = http::Request::new(body.map_or_else(Full::default, Full::new));
        *hyper_request.method_mut() = method.into();
        *hyper_request.uri_mut() = url.as_str().parse().map_err(invalid_request)?;

        let target = hyper_request.headers_mut();
        for (name, value) in &headers {
            target.append(
                HeaderName::try_from(name.as_str()).map_err(invalid_request)?,
                HeaderValue::try_from(value.as_str()).map_err(invalid_request)?,
            );
        }
        if !target.contains_key(header::USER_AGENT) {
            target.insert(
                header::USER_AGENT,
                HeaderValue::try_from(user_agent).map_err(invalid_request)?,
            );
        }
        target
            .entry(header::ACCEPT)
            .or_insert(HeaderValue::from_static(ContentType::Json.as_str()));

        Ok(hyper_request)
    }

    /// Send the request and read the whole body.
    async fn exchange(&self, request: http::Request<Full<Bytes>>) -> Result<Response<Bytes>> {
        let response = self.client.request(request).await.map_err(|err| classify(&err))?;
        let (parts, body) = response.into_parts();

        let headers = parts
            .headers
            .iter()
            .filter_map(|(name, value)| {
                let value = value.to_str().ok()?;
                Some((name.as_str().to_owned(), value.to_owned()))
            })
            .collect();

        let body = body
            .collect()
            .await
            .map_err(|err| Error::connection(err.to_string()))?
            .to_bytes();

        Ok(Response::new(parts.status.as_u16(), headers, body))
    }

    async fn execute(self, request: Request<Bytes>) -> Result<Response<Bytes>> {
        let request = Self::to_hyper(request, &self.user_agent)?;
        tokio::time::timeout(self.timeout, self.exchange(request))
            .await
            .map_err(|_| Error::Timeout)?
    }
}

impl Service<Request<Bytes>> for Transport {
    type Response = Response<Bytes>;
    type Error = Error;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<Bytes>) -> Self::Future {
        Box::pin(self.clone().execute(request))
    }
}

fn invalid_request(err: impl std::fmt::Display) -> Error {
    Error::invalid_request(err.to_string())
}

/// Map a hyper client error to [`Error::Tls`] when rustls appears anywhere
/// in its source chain, and to [`Error::Connection`] otherwise.
fn classify(err: &hyper_util::client::legacy::Error) -> Error {
    let message = match err.source() {
        Some(source) => format!("{err}: {source}"),
        None => err.to_string(),
    };

    let mut current: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(cause) = current {
        let from_rustls = cause.is::<rustls::Error>()
            || cause
                .downcast_ref::<std::io::Error>()
                .and_then(std::io::Error::get_ref)
                .is_some_and(|inner| inner.is::<rustls::Error>());
        if from_rustls {
            return Error::tls(message);
        }
        current = cause.source();
    }

    Error::connection(message)
}

// ============================================================================
// Public Client
// ============================================================================

/// HTTP client using hyper-util with connection pooling, TLS, and middleware support.
///
/// Cloning is cheap and shares the connection pool.
///
/// # Example
///
/// ```
/// use promq::HyperClient;
/// use std::time::Duration;
///
/// // Defaults: 30s timeout, no middleware
/// let client = HyperClient::new();
///
/// // Longer timeout for heavy range queries, and logging
/// let client = HyperClient::builder()
///     .timeout(Duration::from_secs(120))
///     .with_logging()
///     .build();
/// # drop(client);
/// ```
#[derive(Clone)]
pub struct HyperClient {
    service: BoxedService,
    config: ClientConfig,
}

impl std::fmt::Debug for HyperClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HyperClient {
    /// Create a client with the default configuration and no middleware.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client with a custom configuration and no middleware.
    #[must_use]
    pub fn with_config(config: ClientConfig) -> Self {
        Self::builder().config(config).build()
    }

    /// Create a new client builder.
    #[must_use]
    pub fn builder() -> HyperClientBuilder {
        HyperClientBuilder::default()
    }

    /// Get the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl Default for HyperClient {
    fn default() -> Self {
        Self::new()
    }
}

impl promq_core::HttpClient for HyperClient {
    async fn execute(&self, request: Request<Bytes>) -> Result<Response<Bytes>> {
        self.service.clone().oneshot(request).await
    }
}

impl Service<Request<Bytes>> for HyperClient {
    type Response = Response<Bytes>;
    type Error = Error;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.service.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Bytes>) -> Self::Future {
        self.service.call(request)
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`HyperClient`].
///
/// # Example
///
/// ```
/// use promq::HyperClient;
/// use promq::middleware::LoggingLayer;
/// use std::time::Duration;
///
/// let client = HyperClient::builder()
///     .timeout(Duration::from_secs(60))
///     .user_agent("capacity-report/1.0")
///     .layer(LoggingLayer::debug())
///     .build();
/// # drop(client);
/// ```
#[derive(Default)]
pub struct HyperClientBuilder {
    config: ClientConfig,
    layers: Vec<LayerFn>,
}

impl std::fmt::Debug for HyperClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperClientBuilder")
            .field("config", &self.config)
            .field("layers", &self.layers.len())
            .finish()
    }
}

impl HyperClientBuilder {
    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the timeout for a whole exchange, response body included.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the TCP connect timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set the `User-Agent` header.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Set the maximum idle connections per host.
    #[must_use]
    pub const fn pool_idle_per_host(mut self, count: usize) -> Self {
        self.config.pool_idle_per_host = count;
        self
    }

    /// Set the idle connection timeout.
    #[must_use]
    pub const fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.config.pool_idle_timeout = timeout;
        self
    }

    /// Add a Tower layer to the client.
    ///
    /// Each layer wraps the ones added before it, so the last layer added is
    /// the first to see a request.
    #[must_use]
    pub fn layer<L>(mut self, layer: L) -> Self
    where
        L: Layer<BoxedService> + Send + 'static,
        L::Service: Service<Request<Bytes>, Response = Response<Bytes>, Error = Error>
            + Clone
            + Send
            + Sync
            + 'static,
        <L::Service as Service<Request<Bytes>>>::Future: Send + 'static,
    {
        self.layers
            .push(Box::new(move |service| BoxCloneSyncService::new(layer.layer(service))));
        self
    }

    /// Add info-level request logging.
    #[must_use]
    pub fn with_logging(self) -> Self {
        self.layer(LoggingLayer::new())
    }

    /// Add debug-level logging (query string, headers and body sizes).
    #[must_use]
    pub fn with_debug_logging(self) -> Self {
        self.layer(LoggingLayer::debug())
    }

    /// Build the client with all configured middleware.
    #[must_use]
    pub fn build(self) -> HyperClient {
        let transport = BoxCloneSyncService::new(Transport::new(&self.config));
        let service = self
            .layers
            .into_iter()
            .fold(transport, |service, layer| layer(service));

        HyperClient {
            service,
            config: self.config,
        }
    }
}
