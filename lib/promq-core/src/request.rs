//! Outgoing requests.
//!
//! A [`Request`] is transport-neutral: a method, an absolute URL, headers as
//! plain strings, and an optional body. Parameters are attached with
//! [`RequestBuilder::query_params`] for `GET` or [`RequestBuilder::form`] for
//! `POST`.
//!
//! ```
//! use promq_core::{Method, QueryParams, Request};
//! use bytes::Bytes;
//!
//! let url = "http://localhost:9090/api/v1/query".parse().expect("valid URL");
//! let params = QueryParams::new().with("query", "up");
//! let request = Request::<Bytes>::builder(Method::Get, url)
//!     .header("X-Scope-OrgID", "team-a")
//!     .query_params(&params)
//!     .expect("render")
//!     .build();
//!
//! assert_eq!(request.url().query(), Some("query=up"));
//! ```

use std::collections::HashMap;

use bytes::Bytes;
use url::Url;

use crate::{ContentType, Method, QueryParams};

/// Request ready to hand to an [`HttpClient`](crate::HttpClient).
#[derive(Debug, Clone)]
pub struct Request<B = Bytes> {
    method: Method,
    url: Url,
    headers: HashMap<String, String>,
    body: Option<B>,
}

impl<B> Request<B> {
    /// Start a request without headers or body.
    #[must_use]
    pub fn builder(method: Method, url: Url) -> RequestBuilder<B> {
        RequestBuilder::new(method, url)
    }

    /// Request method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Absolute target URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Headers as set by the caller; names keep their original case.
    #[must_use]
    pub const fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Headers, for middleware that adds or rewrites them.
    #[must_use]
    pub const fn headers_mut(&mut self) -> &mut HashMap<String, String> {
        &mut self.headers
    }

    /// Header value by exact name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Body, if any.
    #[must_use]
    pub const fn body(&self) -> Option<&B> {
        self.body.as_ref()
    }

    /// Split into method, URL, headers and body.
    #[must_use]
    pub fn into_parts(self) -> (Method, Url, HashMap<String, String>, Option<B>) {
        let Self {
            method,
            url,
            headers,
            body,
        } = self;
        (method, url, headers, body)
    }
}

/// Builder returned by [`Request::builder`].
#[derive(Debug, Clone)]
pub struct RequestBuilder<B = Bytes>(Request<B>);

impl<B> RequestBuilder<B> {
    /// Start a request without headers or body.
    #[must_use]
    pub fn new(method: Method, url: Url) -> Self {
        Self(Request {
            method,
            url,
            headers: HashMap::new(),
            body: None,
        })
    }

    /// Set a header, replacing any value under the same name.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.headers.insert(name.into(), value.into());
        self
    }

    /// Render `params` as the URL query, replacing any existing one.
    ///
    /// Empty parameters leave no trailing `?`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Codec`] when a value has no scalar form.
    pub fn query_params(mut self, params: &QueryParams) -> crate::Result<Self> {
        let query = params.to_query_string()?;
        let query = Some(query.as_str()).filter(|query| !query.is_empty());
        self.0.url.set_query(query);
        Ok(self)
    }

    /// Set the body.
    #[must_use]
    pub fn body(mut self, body: B) -> Self {
        self.0.body = Some(body);
        self
    }

    /// Finish the request.
    #[must_use]
    pub fn build(self) -> Request<B> {
        self.0
    }
}

impl RequestBuilder<Bytes> {
    /// Render `params` as an urlencoded form body and set `Content-Type`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Codec`] when a value has no scalar form.
    pub fn form(self, params: &QueryParams) -> crate::Result<Self> {
        let form = params.to_query_string()?;
        Ok(self
            .header("Content-Type", ContentType::FormUrlEncoded.as_str())
            .body(form.into()))
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;

    fn endpoint(path: &str) -> Url {
        Url::parse("http://prometheus:9090/api/v1/")
            .and_then(|base| base.join(path))
            .expect("valid URL")
    }

    #[test]
    fn plain_get() {
        let request = Request::<Bytes>::builder(Method::Get, endpoint("labels"))
            .header("X-Scope-OrgID", "team-a")
            .build();

        check!(request.method() == Method::Get);
        check!(request.url().as_str() == "http://prometheus:9090/api/v1/labels");
        check!(request.header("X-Scope-OrgID") == Some("team-a"));
        check!(request.header("x-scope-orgid").is_none());
        check!(request.body().is_none());
    }

    #[test]
    fn repeated_params_in_query() {
        let params = QueryParams::new()
            .with("match[]", "up")
            .with("match[]", r#"process_start_time_seconds{job="prometheus"}"#);

        let request = Request::<Bytes>::builder(Method::Get, endpoint("series"))
            .query_params(&params)
            .expect("render")
            .build();

        check!(
            request.url().query()
                == Some("match%5B%5D=up&match%5B%5D=process_start_time_seconds%7Bjob%3D%22prometheus%22%7D")
        );
    }

    #[test]
    fn query_params_replace_existing_query() {
        let url = Url::parse("http://prometheus:9090/api/v1/query?stale=1").expect("valid URL");

        let request = Request::<Bytes>::builder(Method::Get, url.clone())
            .query_params(&QueryParams::new().with("query", "up"))
            .expect("render")
            .build();
        check!(request.url().query() == Some("query=up"));

        let request = Request::<Bytes>::builder(Method::Get, url)
            .query_params(&QueryParams::new())
            .expect("render")
            .build();
        check!(request.url().as_str() == "http://prometheus:9090/api/v1/query");
    }

    #[test]
    fn form_body() {
        let params = QueryParams::new().with("query", "sum(up) by (job)");

        let request = Request::builder(Method::Post, endpoint("query"))
            .form(&params)
            .expect("render")
            .build();

        check!(request.header("Content-Type") == Some("application/x-www-form-urlencoded"));
        check!(request.url().query().is_none());
        let_assert!(Some(body) = request.body());
        check!(body.as_ref() == b"query=sum%28up%29%20by%20%28job%29");
    }

    #[test]
    fn non_finite_value_is_rejected() {
        let params = QueryParams::new().with("step", f64::INFINITY);

        let result = Request::<Bytes>::builder(Method::Get, endpoint("query_range")).query_params(&params);

        let_assert!(Err(err) = result);
        check!(err.codec().is_some());
    }

    #[test]
    fn split_into_parts() {
        let request = Request::builder(Method::Post, endpoint("query"))
            .header("X-Scope-OrgID", "tenant-1")
            .body(Bytes::from_static(b"query=up"))
            .build();

        let (method, url, headers, body) = request.into_parts();
        check!(method == Method::Post);
        check!(url.path() == "/api/v1/query");
        check!(headers.get("X-Scope-OrgID").map(String::as_str) == Some("tenant-1"));
        check!(body == Some(Bytes::from_static(b"query=up")));
    }
}
