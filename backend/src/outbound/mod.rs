//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **certificate**: certificate digest sources (PEM file, configured digest)
//! - **gateway**: HTTP client for the gateway's control channel
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod certificate;
pub mod gateway;
