//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services and ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::WebhookIngress;
use crate::domain::ports::CertificateSource;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Validates and dispatches gateway webhooks.
    pub ingress: Arc<WebhookIngress>,
    /// Source of the gateway leaf certificate digest.
    pub certificates: Arc<dyn CertificateSource>,
}

impl HttpState {
    /// Construct state from the webhook ingress and a certificate source.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use backend::domain::ports::MissingCertificateSource;
    /// use backend::domain::{EventDispatcher, WebhookIngress};
    /// use backend::inbound::http::state::HttpState;
    ///
    /// let ingress = WebhookIngress::new(Arc::new(EventDispatcher::builder().build()));
    /// let state = HttpState::new(Arc::new(ingress), Arc::new(MissingCertificateSource));
    /// let _certificates = state.certificates.clone();
    /// ```
    pub fn new(ingress: Arc<WebhookIngress>, certificates: Arc<dyn CertificateSource>) -> Self {
        Self {
            ingress,
            certificates,
        }
    }
}
