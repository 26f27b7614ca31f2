//! Webhook ingress: validation, classification and dispatch of one delivery.
//!
//! The ingress is transport agnostic. It takes the raw request body and
//! returns an [`IngressOutcome`] that the HTTP adapter renders; dispatch has
//! completed by the time the outcome is returned.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::dispatcher::EventDispatcher;
use super::events::{EventKind, WebhookEvent};

/// Name of the optional payload field, reported on shape violations.
pub const PAYLOAD_FIELD: &str = "payload";

/// Whether the delivery carried a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Received {
    /// Empty body; treated as a heartbeat.
    Empty,
    /// A validated event body.
    Body,
}

impl Received {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Body => "body",
        }
    }
}

/// Structural problems with a webhook body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IngressError {
    /// The body is not valid JSON.
    #[error("webhook body is not valid JSON")]
    InvalidJson,
    /// The JSON does not have the expected shape.
    #[error("webhook body has an invalid shape")]
    InvalidPayload {
        /// Offending field, reported when it is `payload`.
        field: Option<&'static str>,
    },
}

impl IngressError {
    /// Machine-readable error code returned to the gateway.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidJson => "invalid_json",
            Self::InvalidPayload { .. } => "invalid_payload",
        }
    }

    /// Offending field, if identified.
    #[must_use]
    pub const fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidJson => None,
            Self::InvalidPayload { field } => *field,
        }
    }

    const fn shape() -> Self {
        Self::InvalidPayload { field: None }
    }
}

/// Result of handling one delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngressOutcome {
    /// The delivery was accepted (and dispatched when it had a body).
    Accepted {
        /// Whether a body was present.
        received: Received,
        /// Kind dispatched, absent for heartbeats.
        event: Option<EventKind>,
    },
    /// The delivery was structurally broken; nothing was dispatched.
    Rejected(IngressError),
}

/// Boundary turning webhook bodies into dispatched events.
#[derive(Clone)]
pub struct WebhookIngress {
    dispatcher: Arc<EventDispatcher>,
}

impl WebhookIngress {
    /// Build an ingress around a frozen handler registry.
    #[must_use]
    pub fn new(dispatcher: Arc<EventDispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Validate, classify and dispatch one webhook body.
    ///
    /// Handler failures are contained by the dispatcher and never change the
    /// outcome.
    pub async fn handle(&self, body: &[u8]) -> IngressOutcome {
        if body.is_empty() {
            debug!("empty webhook body accepted as heartbeat");
            return IngressOutcome::Accepted {
                received: Received::Empty,
                event: None,
            };
        }

        let event = match parse_event(body) {
            Ok(event) => event,
            Err(err) => {
                warn!(
                    error = %err,
                    code = err.code(),
                    field = err.field(),
                    "webhook rejected"
                );
                return IngressOutcome::Rejected(err);
            }
        };

        let report = self.dispatcher.dispatch(&event).await;
        debug!(
            event = %event.kind(),
            connection_id = event.connection_id(),
            invoked = report.invoked,
            failed = report.failed,
            "webhook dispatched"
        );

        IngressOutcome::Accepted {
            received: Received::Body,
            event: Some(event.kind()),
        }
    }
}

/// Decode and validate a non-empty webhook body.
///
/// # Errors
/// - [`IngressError::InvalidJson`] when the body is not JSON.
/// - [`IngressError::InvalidPayload`] when it is not an object, when `type`,
///   `connection_id` or `transport` is missing or not a string, when
///   `connection_id` is empty, or (with `field = "payload"`) when `payload`
///   is neither a string nor null.
pub fn parse_event(body: &[u8]) -> Result<WebhookEvent, IngressError> {
    let value: Value = serde_json::from_slice(body).map_err(|_| IngressError::InvalidJson)?;
    let Value::Object(raw) = value else {
        return Err(IngressError::shape());
    };

    let event_type = required_string(&raw, "type")?;
    let connection_id = required_string(&raw, "connection_id")?;
    let transport = required_string(&raw, "transport")?;
    if connection_id.is_empty() {
        return Err(IngressError::shape());
    }

    let payload = match raw.get(PAYLOAD_FIELD) {
        None | Some(Value::Null) => None,
        Some(Value::String(payload)) => Some(payload.clone()),
        Some(_) => {
            return Err(IngressError::InvalidPayload {
                field: Some(PAYLOAD_FIELD),
            });
        }
    };

    let kind = EventKind::classify(&event_type);
    Ok(WebhookEvent::new(
        kind,
        event_type,
        connection_id,
        transport,
        payload,
        raw,
    ))
}

fn required_string(raw: &Map<String, Value>, field: &str) -> Result<String, IngressError> {
    raw.get(field)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(IngressError::shape)
}
