//! Builders turning relay settings into the ports behind the HTTP state.

use std::sync::Arc;

use tracing::{info, warn};

use backend::domain::ports::{
    CertificateSource, DisabledGatewayPublisher, GatewayPublisher, MissingCertificateSource,
};
use backend::domain::{WebhookIngress, default_dispatcher};
use backend::inbound::http::state::HttpState;
use backend::outbound::certificate::{FixedCertificateSource, PemFileCertificateSource};
use backend::outbound::gateway::HttpGatewayPublisher;
use backend::settings::RelaySettings;

/// Build the publisher used to talk back to the gateway.
///
/// Without a control URL every publish fails with `TransportUnreachable`,
/// which the welcome handler logs and contains.
///
/// # Errors
/// Returns [`std::io::Error`] when the URL is malformed or the HTTP client
/// cannot be built.
pub(crate) fn build_publisher(
    settings: &RelaySettings,
) -> std::io::Result<Arc<dyn GatewayPublisher>> {
    let control_url = settings
        .gateway_control_url()
        .map_err(std::io::Error::other)?;
    match control_url {
        Some(url) => {
            let publisher = HttpGatewayPublisher::new(&url, settings.publish_timeout())
                .map_err(std::io::Error::other)?;
            info!(publish_url = %publisher.publish_url(), "gateway publishing enabled");
            Ok(Arc::new(publisher))
        }
        None => {
            warn!("no gateway control URL configured; publishes will fail");
            Ok(Arc::new(DisabledGatewayPublisher))
        }
    }
}

/// Build the certificate source, preferring a PEM file over a fixed digest.
///
/// # Errors
/// Returns [`std::io::Error`] when a configured hex digest is malformed.
pub(crate) fn build_certificate_source(
    settings: &RelaySettings,
) -> std::io::Result<Arc<dyn CertificateSource>> {
    if let Some(path) = settings.cert_pem_file() {
        info!(path = %path.display(), "serving digest of certificate file");
        return Ok(Arc::new(PemFileCertificateSource::new(path)));
    }
    if let Some(hex) = settings.cert_digest_hex() {
        let source = FixedCertificateSource::from_hex(hex).map_err(std::io::Error::other)?;
        info!("serving configured certificate digest");
        return Ok(Arc::new(source));
    }
    warn!("no certificate configured; cert-info will answer 500");
    Ok(Arc::new(MissingCertificateSource))
}

/// Assemble the HTTP state from settings.
///
/// # Errors
/// Propagates failures from [`build_publisher`] and
/// [`build_certificate_source`].
pub(crate) fn build_http_state(settings: &RelaySettings) -> std::io::Result<HttpState> {
    let publisher = build_publisher(settings)?;
    let dispatcher = default_dispatcher(publisher, settings.welcome_message());
    let ingress = WebhookIngress::new(Arc::new(dispatcher));
    let certificates = build_certificate_source(settings)?;
    Ok(HttpState::new(Arc::new(ingress), certificates))
}
