//! Gateway control channel adapters.
//!
//! This module provides a thin HTTP implementation of the `GatewayPublisher`
//! port.

mod dto;
mod http_publisher;

pub use http_publisher::{GatewayClientError, HttpGatewayPublisher, PUBLISH_PATH};
