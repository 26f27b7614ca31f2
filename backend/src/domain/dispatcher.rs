//! In-process registry routing webhook events to handlers.
//!
//! The registry is assembled once at startup with [`EventDispatcherBuilder`]
//! and shared read-only between requests. Handlers for one kind run strictly
//! in registration order on the calling task. A handler that fails or panics
//! is logged and skipped; it never prevents later handlers from running and
//! never reaches the webhook response.

use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::FutureExt;
use tracing::{debug, error, warn};

use super::events::{EventKind, WebhookEvent};

/// Opaque failure raised by an event handler.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
}

impl HandlerError {
    /// Create a handler failure with a diagnostic message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Reaction to one webhook event.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Name used when logging handler failures.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Handle an event.
    ///
    /// # Errors
    /// Any [`HandlerError`] is captured by the dispatcher and logged.
    async fn handle(&self, event: &WebhookEvent) -> Result<(), HandlerError>;
}

/// Outcome of one dispatch, for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Handlers invoked for the event kind.
    pub invoked: usize,
    /// Handlers that returned an error or panicked.
    pub failed: usize,
}

/// Immutable mapping from event kind to ordered handlers.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: HashMap<EventKind, Vec<Arc<dyn EventHandler>>>,
}

/// Builder collecting handler registrations before the registry is frozen.
#[derive(Default)]
pub struct EventDispatcherBuilder {
    handlers: HashMap<EventKind, Vec<Arc<dyn EventHandler>>>,
}

impl EventDispatcherBuilder {
    /// Register `handler` for `kind` after any handlers already registered.
    #[must_use]
    pub fn on(self, kind: EventKind, handler: impl EventHandler + 'static) -> Self {
        self.on_shared(kind, Arc::new(handler))
    }

    /// Register an already shared handler, e.g. one instance serving several
    /// kinds.
    #[must_use]
    pub fn on_shared(mut self, kind: EventKind, handler: Arc<dyn EventHandler>) -> Self {
        self.handlers.entry(kind).or_default().push(handler);
        self
    }

    /// Freeze the registrations.
    #[must_use]
    pub fn build(self) -> EventDispatcher {
        EventDispatcher {
            handlers: self.handlers,
        }
    }
}

impl EventDispatcher {
    /// Start building a registry.
    ///
    /// # Examples
    /// ```
    /// use async_trait::async_trait;
    /// use backend::domain::{EventDispatcher, EventHandler, EventKind, HandlerError, WebhookEvent};
    ///
    /// struct Noop;
    ///
    /// #[async_trait]
    /// impl EventHandler for Noop {
    ///     async fn handle(&self, _event: &WebhookEvent) -> Result<(), HandlerError> {
    ///         Ok(())
    ///     }
    /// }
    ///
    /// let dispatcher = EventDispatcher::builder().on(EventKind::Connected, Noop).build();
    /// assert_eq!(dispatcher.handler_count(EventKind::Connected), 1);
    /// assert_eq!(dispatcher.handler_count(EventKind::Error), 0);
    /// ```
    #[must_use]
    pub fn builder() -> EventDispatcherBuilder {
        EventDispatcherBuilder::default()
    }

    /// Number of handlers registered for `kind`.
    #[must_use]
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len)
    }

    /// Run every handler registered for the event's kind, in order.
    ///
    /// Failures are isolated per handler. A kind with no handlers is a no-op.
    pub async fn dispatch(&self, event: &WebhookEvent) -> DispatchReport {
        let kind = event.kind();
        let Some(handlers) = self.handlers.get(&kind) else {
            debug!(event = %kind, "no handlers registered");
            return DispatchReport::default();
        };

        let mut report = DispatchReport::default();
        for handler in handlers {
            report.invoked += 1;
            match AssertUnwindSafe(handler.handle(event)).catch_unwind().await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    report.failed += 1;
                    warn!(
                        handler = handler.name(),
                        event = %kind,
                        connection_id = event.connection_id(),
                        transport = event.transport(),
                        error = %err,
                        "event handler failed"
                    );
                }
                Err(panic) => {
                    report.failed += 1;
                    error!(
                        handler = handler.name(),
                        event = %kind,
                        connection_id = event.connection_id(),
                        transport = event.transport(),
                        panic = panic_message(panic.as_ref()),
                        "event handler panicked"
                    );
                }
            }
        }
        report
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}
