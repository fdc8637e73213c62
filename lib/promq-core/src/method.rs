//! Request methods supported by the Prometheus read endpoints.

use derive_more::Display;

/// How query parameters travel to the server.
///
/// Prometheus accepts both forms on every read endpoint. `POST` avoids URL
/// length limits for long selectors.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    /// Parameters go in the URL query.
    #[default]
    #[display("GET")]
    Get,
    /// Parameters go in an urlencoded form body.
    #[display("POST")]
    Post,
}

impl Method {
    /// Whether parameters are carried in the body rather than the URL.
    #[must_use]
    pub const fn carries_form(self) -> bool {
        matches!(self, Self::Post)
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        if method.carries_form() {
            Self::POST
        } else {
            Self::GET
        }
    }
}
