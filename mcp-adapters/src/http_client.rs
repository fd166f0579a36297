use std::sync::Arc;
use std::time::Duration;

use hyper::body::{Bytes, to_bytes};
use hyper::client::HttpConnector;
use hyper::{Body, Client, Request};
use hyper_rustls::HttpsConnector;
use rustls::{ClientConfig, OwnedTrustAnchor, RootCertStore};
use tokio::time::timeout;
use tracing::debug;
use webpki_roots::TLS_SERVER_ROOTS;

use crate::error::{AdapterError, AdapterResult};

pub(crate) type HyperClient = Client<HttpsConnector<HttpConnector>, Body>;

pub(crate) fn build_https_client() -> HyperClient {
    let mut roots = RootCertStore::empty();
    roots.add_trust_anchors(TLS_SERVER_ROOTS.iter().map(|anchor| {
        OwnedTrustAnchor::from_subject_spki_name_constraints(
            anchor.subject,
            anchor.spki,
            anchor.name_constraints,
        )
    }));

    let config = ClientConfig::builder()
        .with_safe_defaults()
        .with_root_certificates(roots)
        .with_no_client_auth();

    let mut http = HttpConnector::new();
    http.enforce_http(false);

    let connector = HttpsConnector::from((http, Arc::new(config)));

    Client::builder().build::<_, Body>(connector)
}

/// Sends `request` and returns the body of a successful response.
pub(crate) async fn fetch(
    client: &HyperClient,
    request: Request<Body>,
    limit: Duration,
    service: &str,
) -> AdapterResult<Bytes> {
    let response = timeout(limit, client.request(request))
        .await
        .map_err(|_| AdapterError::transport(format!("{service} request timed out")))?
        .map_err(|err| AdapterError::transport(format!("{service} request failed: {err}")))?;

    let status = response.status();
    let bytes = to_bytes(response.into_body()).await.map_err(|err| {
        AdapterError::transport(format!("failed to read {service} response: {err}"))
    })?;
    debug!(service, %status, bytes = bytes.len(), "upstream response received");

    if !status.is_success() {
        return Err(AdapterError::response(format!(
            "{service} returned unexpected status code {}",
            status.as_u16()
        )));
    }

    Ok(bytes)
}
