//! Driven port for sending messages back to a live gateway connection.
//!
//! Delivery is attempted at most once per call. Retrying, queueing and
//! back-pressure belong to the gateway, not to this service.

use async_trait::async_trait;

/// Errors surfaced while publishing to a connection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PublishError {
    /// The gateway does not know the connection (it may already be closed).
    #[error("connection {connection_id} is unknown to the gateway")]
    ConnectionUnknown {
        /// Connection the message was addressed to.
        connection_id: String,
    },
    /// The gateway control channel could not be reached.
    #[error("gateway control channel unreachable: {message}")]
    TransportUnreachable {
        /// Transport diagnostic.
        message: String,
    },
    /// The gateway answered but refused the message.
    #[error("gateway rejected publish: {message}")]
    TransportRejected {
        /// Gateway diagnostic.
        message: String,
    },
}

impl PublishError {
    /// Convenience constructor for [`PublishError::ConnectionUnknown`].
    pub fn connection_unknown(connection_id: impl Into<String>) -> Self {
        Self::ConnectionUnknown {
            connection_id: connection_id.into(),
        }
    }

    /// Convenience constructor for [`PublishError::TransportUnreachable`].
    pub fn transport_unreachable(message: impl Into<String>) -> Self {
        Self::TransportUnreachable {
            message: message.into(),
        }
    }

    /// Convenience constructor for [`PublishError::TransportRejected`].
    pub fn transport_rejected(message: impl Into<String>) -> Self {
        Self::TransportRejected {
            message: message.into(),
        }
    }
}

/// Port for addressing a message to one connection through the gateway.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GatewayPublisher: Send + Sync {
    /// Send `message` to `connection_id`.
    ///
    /// # Errors
    /// Returns [`PublishError`] when the gateway is unreachable, rejects the
    /// message, or no longer knows the connection. Callers log the failure
    /// and carry on; connections routinely close between an event and the
    /// publish that answers it.
    async fn publish(&self, connection_id: &str, message: &str) -> Result<(), PublishError>;
}

/// Publisher used when no gateway control channel is configured.
///
/// Every call fails with [`PublishError::TransportUnreachable`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGatewayPublisher;

#[async_trait]
impl GatewayPublisher for DisabledGatewayPublisher {
    async fn publish(&self, connection_id: &str, _message: &str) -> Result<(), PublishError> {
        if connection_id.is_empty() {
            return Err(PublishError::connection_unknown(connection_id));
        }
        Err(PublishError::transport_unreachable(
            "no gateway control channel configured",
        ))
    }
}
