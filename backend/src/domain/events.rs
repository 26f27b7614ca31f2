//! Gateway lifecycle events delivered over the webhook channel.

use serde_json::{Map, Value};

/// Closed set of lifecycle event kinds understood by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A transport session was accepted by the gateway.
    Connected,
    /// The gateway received a message from a connection.
    MessageReceived,
    /// The gateway delivered a message to a connection.
    MessageSent,
    /// A transport session ended.
    Disconnected,
    /// The gateway reported a connection-level failure.
    Error,
    /// The declared type is not recognised.
    Unknown,
}

impl EventKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Connected,
        Self::MessageReceived,
        Self::MessageSent,
        Self::Disconnected,
        Self::Error,
        Self::Unknown,
    ];

    /// Map a webhook `type` string to an event kind.
    ///
    /// Total: unrecognised strings (including the empty string) yield
    /// [`EventKind::Unknown`]. `MessageSent` and `Error` are never produced
    /// here; the gateway does not emit those types over the webhook.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::EventKind;
    ///
    /// assert_eq!(EventKind::classify("connected"), EventKind::Connected);
    /// assert_eq!(EventKind::classify("stream_opened"), EventKind::Unknown);
    /// ```
    #[must_use]
    pub fn classify(event_type: &str) -> Self {
        match event_type {
            "connected" => Self::Connected,
            "message_received" => Self::MessageReceived,
            "disconnected" => Self::Disconnected,
            _ => Self::Unknown,
        }
    }

    /// Stable event name reported back to the gateway and used in logs.
    #[must_use]
    pub const fn event_name(self) -> &'static str {
        match self {
            Self::Connected => "gateway.onConnected",
            Self::MessageReceived => "gateway.onMessageReceived",
            Self::MessageSent => "gateway.onMessageSent",
            Self::Disconnected => "gateway.onDisconnected",
            Self::Error => "gateway.onError",
            Self::Unknown => "gateway.onUnknown",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.event_name())
    }
}

/// Typed view of one webhook delivery.
///
/// ## Invariants
/// - `kind` is always `EventKind::classify(event_type)` for events built by
///   the ingress.
/// - `connection_id` is non-empty.
/// - `raw` is the complete decoded body, including fields not modelled here.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookEvent {
    kind: EventKind,
    event_type: String,
    connection_id: String,
    transport: String,
    payload: Option<String>,
    raw: Map<String, Value>,
}

impl WebhookEvent {
    /// Assemble an event from validated fields.
    ///
    /// The ingress classifies `event_type` before calling this; internal
    /// callers may pass any kind, which is how `MessageSent` and `Error`
    /// reach their handlers.
    #[must_use]
    pub fn new(
        kind: EventKind,
        event_type: impl Into<String>,
        connection_id: impl Into<String>,
        transport: impl Into<String>,
        payload: Option<String>,
        raw: Map<String, Value>,
    ) -> Self {
        Self {
            kind,
            event_type: event_type.into(),
            connection_id: connection_id.into(),
            transport: transport.into(),
            payload,
            raw,
        }
    }

    /// Lifecycle kind.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// The `type` string as declared by the gateway.
    #[must_use]
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Gateway-assigned connection identity.
    #[must_use]
    pub fn connection_id(&self) -> &str {
        &self.connection_id
    }

    /// Free-form transport label, e.g. `webtransport/dgram`.
    #[must_use]
    pub fn transport(&self) -> &str {
        &self.transport
    }

    /// Optional message payload.
    #[must_use]
    pub fn payload(&self) -> Option<&str> {
        self.payload.as_deref()
    }

    /// Full decoded webhook body.
    #[must_use]
    pub fn raw(&self) -> &Map<String, Value> {
        &self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("connected", EventKind::Connected)]
    #[case("message_received", EventKind::MessageReceived)]
    #[case("disconnected", EventKind::Disconnected)]
    fn classifies_known_types(#[case] event_type: &str, #[case] expected: EventKind) {
        assert_eq!(EventKind::classify(event_type), expected);
    }

    #[rstest]
    #[case("")]
    #[case("message_sent")]
    #[case("error")]
    #[case("Connected")]
    #[case(" connected")]
    #[case("stream_opened")]
    fn unrecognised_types_are_unknown(#[case] event_type: &str) {
        assert_eq!(EventKind::classify(event_type), EventKind::Unknown);
    }

    #[test]
    fn event_names_are_distinct() {
        let mut names: Vec<_> = EventKind::ALL.iter().map(|kind| kind.event_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), EventKind::ALL.len());
    }

    #[test]
    fn display_uses_event_name() {
        assert_eq!(
            EventKind::MessageReceived.to_string(),
            "gateway.onMessageReceived"
        );
    }
}
