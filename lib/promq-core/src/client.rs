//! Transport abstraction.

use std::future::Future;

use bytes::Bytes;

use crate::{Request, Response, Result};

/// Sends a [`Request`] and reads the whole [`Response`].
///
/// `promq` implements it on top of hyper. Implement it yourself to route
/// calls through another stack, or to answer from canned data in tests.
///
/// Error statuses are successful exchanges: a 4xx or 5xx comes back as
/// `Ok(response)` and the caller decides what it means.
pub trait HttpClient: Send + Sync {
    /// Perform one exchange.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Connection`], [`crate::Error::Tls`] or
    /// [`crate::Error::Timeout`] when no response could be read, and
    /// [`crate::Error::InvalidRequest`] when the request cannot be sent.
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send;
}
