//! Inbound adapters that translate external requests into domain calls while
//! keeping framework details at the edge.
//!
//! The gateway reaches this service only over HTTP, so [`http`] is the sole
//! inbound transport.

pub mod http;
