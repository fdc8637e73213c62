//! Tower layers around the HTTP transport.
//!
//! Middleware sees each API call as a [`Request`](crate::Request) and its
//! [`Response`](crate::Response), after parameters are rendered and before
//! the Prometheus envelope is decoded. Layers added later wrap earlier ones,
//! so they handle the request first.
//!
//! [`LoggingLayer`] ships with the crate. Any other Tower layer over
//! `Request<Bytes>` and `Response<Bytes>` can be added with
//! [`HyperClientBuilder::layer`](crate::HyperClientBuilder::layer), for
//! instance to set a tenant header for Cortex or Mimir:
//!
//! ```
//! use bytes::Bytes;
//! use promq::{HyperClient, Request};
//! use promq::tower::util::MapRequestLayer;
//!
//! let client = HyperClient::builder()
//!     .layer(MapRequestLayer::new(|mut request: Request<Bytes>| {
//!         request.headers_mut().insert("X-Scope-OrgID".into(), "team-a".into());
//!         request
//!     }))
//!     .with_logging()
//!     .build();
//! # drop(client);
//! ```

mod logging;

pub use logging::{LogLevel, Logging, LoggingLayer};

pub use tower::{Layer, ServiceBuilder};
