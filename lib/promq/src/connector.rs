//! TCP and TLS connection setup.

use std::time::Duration;

use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::connect::HttpConnector;
use rustls::RootCertStore;

/// Connector for both `http://` and `https://` servers.
///
/// Most Prometheus servers sit on an internal network without TLS, so plain
/// HTTP stays allowed. TLS trusts the bundled Mozilla roots.
#[must_use]
pub fn https_connector(connect_timeout: Duration) -> HttpsConnector<HttpConnector> {
    let mut tcp = HttpConnector::new();
    tcp.enforce_http(false);
    tcp.set_connect_timeout(Some(connect_timeout));
    tcp.set_nodelay(true);

    let roots = RootCertStore {
        roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
    };
    let tls = rustls::ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();

    HttpsConnectorBuilder::new()
        .with_tls_config(tls)
        .https_or_http()
        .enable_http1()
        .enable_http2()
        .wrap_connector(tcp)
}

#[cfg(test)]
mod tests {
    use tower::ServiceExt;

    use super::*;

    #[tokio::test]
    async fn refuses_closed_port() {
        let connector = https_connector(Duration::from_secs(1));
        let uri: http::Uri = "http://127.0.0.1:1".parse().expect("valid URI");

        assert!(connector.oneshot(uri).await.is_err());
    }
}
