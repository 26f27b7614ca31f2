//! Domain primitives and services.
//!
//! Purpose: model gateway webhook events, their dispatch to handlers, and the
//! certificate digest browsers pin. Nothing here depends on the HTTP
//! framework; inbound and outbound adapters translate at the edges.
//!
//! Public surface:
//! - `CertificateDigest`: SHA-256 of a DER leaf certificate.
//! - `EventKind` / `WebhookEvent`: classified gateway events.
//! - `EventDispatcher`: ordered, failure-isolating handler registry.
//! - `WebhookIngress`: validation and dispatch of one webhook body.
//! - `Error` / `ErrorCode`: transport-agnostic error envelope.

pub mod certificate;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod gateway_handlers;
pub mod ingress;
pub mod ports;
pub mod trace_id;

pub use self::certificate::{CertificateDigest, CertificateError, DIGEST_LEN};
pub use self::dispatcher::{
    DispatchReport, EventDispatcher, EventDispatcherBuilder, EventHandler, HandlerError,
};
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::events::{EventKind, WebhookEvent};
pub use self::gateway_handlers::{
    DEFAULT_WELCOME_MESSAGE, LifecycleLogger, WelcomePublisher, default_dispatcher,
};
pub use self::ingress::{IngressError, IngressOutcome, Received, WebhookIngress, parse_event};
pub use self::trace_id::TraceId;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use backend::domain::{ApiResult, Error};
///
/// fn digest_lookup() -> ApiResult<()> {
///     Err(Error::internal("certificate source offline"))
/// }
/// assert!(digest_lookup().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
