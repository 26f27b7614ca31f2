//! Default reactions to gateway lifecycle events.
//!
//! Every kind is logged by [`LifecycleLogger`]. Connections additionally get a
//! welcome message through [`WelcomePublisher`], which proves the return path
//! from this service to the browser works end to end.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use super::dispatcher::{EventDispatcher, EventHandler, HandlerError};
use super::events::{EventKind, WebhookEvent};
use super::ports::GatewayPublisher;

/// Longest payload prefix written to logs, in characters.
pub const PAYLOAD_LOG_LIMIT: usize = 200;

/// Default welcome text published to freshly connected clients.
pub const DEFAULT_WELCOME_MESSAGE: &str = "welcome from backend";

/// Logs every event with its connection context.
#[derive(Debug, Clone, Copy, Default)]
pub struct LifecycleLogger;

#[async_trait]
impl EventHandler for LifecycleLogger {
    fn name(&self) -> &'static str {
        "lifecycle_logger"
    }

    async fn handle(&self, event: &WebhookEvent) -> Result<(), HandlerError> {
        let connection_id = event.connection_id();
        let transport = event.transport();
        match event.kind() {
            EventKind::MessageReceived => {
                let payload = quoted_preview(event.payload().unwrap_or_default());
                info!(connection_id, transport, payload = %payload, "gateway message received");
            }
            EventKind::Error => {
                let payload = event.payload().unwrap_or_default();
                warn!(connection_id, transport, payload, "gateway reported an error");
            }
            EventKind::Unknown => {
                info!(
                    event_type = event.event_type(),
                    transport, "gateway event type not recognised"
                );
            }
            kind @ (EventKind::Connected | EventKind::MessageSent | EventKind::Disconnected) => {
                info!(connection_id, transport, event = %kind, "gateway lifecycle event");
            }
        }
        Ok(())
    }
}

/// Publishes a welcome message to each new connection.
///
/// Publish failures are logged and swallowed: the connection may already be
/// gone by the time the webhook arrives.
pub struct WelcomePublisher {
    publisher: Arc<dyn GatewayPublisher>,
    message: String,
}

impl WelcomePublisher {
    /// Build a publisher handler sending `message`.
    pub fn new(publisher: Arc<dyn GatewayPublisher>, message: impl Into<String>) -> Self {
        Self {
            publisher,
            message: message.into(),
        }
    }
}

#[async_trait]
impl EventHandler for WelcomePublisher {
    fn name(&self) -> &'static str {
        "welcome_publisher"
    }

    async fn handle(&self, event: &WebhookEvent) -> Result<(), HandlerError> {
        match self
            .publisher
            .publish(event.connection_id(), &self.message)
            .await
        {
            Ok(()) => info!(
                connection_id = event.connection_id(),
                transport = event.transport(),
                "welcome message published"
            ),
            Err(err) => warn!(
                connection_id = event.connection_id(),
                transport = event.transport(),
                event = %event.kind(),
                error = %err,
                "publish failed"
            ),
        }
        Ok(())
    }
}

/// Registry wiring the default handlers.
///
/// `Connected` runs the logger first, then the welcome publisher; every
/// other kind only logs.
#[must_use]
pub fn default_dispatcher(
    publisher: Arc<dyn GatewayPublisher>,
    welcome_message: impl Into<String>,
) -> EventDispatcher {
    let logger: Arc<dyn EventHandler> = Arc::new(LifecycleLogger);
    let builder = EventKind::ALL
        .into_iter()
        .fold(EventDispatcher::builder(), |builder, kind| {
            builder.on_shared(kind, Arc::clone(&logger))
        });
    builder
        .on(
            EventKind::Connected,
            WelcomePublisher::new(publisher, welcome_message),
        )
        .build()
}

/// JSON-quote a payload, truncated to [`PAYLOAD_LOG_LIMIT`] characters.
fn quoted_preview(payload: &str) -> String {
    let preview = if payload.chars().count() > PAYLOAD_LOG_LIMIT {
        let mut truncated: String = payload.chars().take(PAYLOAD_LOG_LIMIT).collect();
        truncated.push_str("...");
        truncated
    } else {
        payload.to_owned()
    };
    serde_json::Value::String(preview).to_string()
}
