//! HTTP inbound adapter exposing the webhook, certificate and probe
//! endpoints.

pub mod cert_info;
pub mod error;
pub mod gateway_events;
pub mod health;
pub mod ping;
pub mod schemas;
pub mod state;

pub use error::ApiResult;
