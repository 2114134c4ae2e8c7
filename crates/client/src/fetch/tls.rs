//! TLS connector trusting the platform's certificate store.

use std::sync::Arc;

use go2web_core::Error;
use tokio_rustls::TlsConnector;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};

/// Build a connector whose roots come from the operating system.
///
/// Certificates the platform store returns but rustls cannot parse are skipped
/// with a warning. An empty store is a connection error, since no handshake
/// could ever succeed.
pub fn native_connector() -> Result<TlsConnector, Error> {
    let loaded = rustls_native_certs::load_native_certs();
    for err in &loaded.errors {
        tracing::warn!("failed to load platform certificate: {err}");
    }

    let mut roots = RootCertStore::empty();
    let (added, ignored) = roots.add_parsable_certificates(loaded.certs);
    tracing::debug!(added, ignored, "loaded platform trust roots");

    if roots.is_empty() {
        return Err(Error::Connection("no trusted root certificates available".into()));
    }

    let config = ClientConfig::builder().with_root_certificates(roots).with_no_client_auth();

    Ok(TlsConnector::from(Arc::new(config)))
}
