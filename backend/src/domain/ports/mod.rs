//! Domain ports for the hexagonal boundary.

mod certificate_source;
mod gateway_publisher;

#[cfg(test)]
pub use certificate_source::MockCertificateSource;
pub use certificate_source::{CertificateSource, MissingCertificateSource};
#[cfg(test)]
pub use gateway_publisher::MockGatewayPublisher;
pub use gateway_publisher::{DisabledGatewayPublisher, GatewayPublisher, PublishError};
