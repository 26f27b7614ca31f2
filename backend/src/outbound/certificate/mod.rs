//! Certificate digest sources.
//!
//! Implementations of the `CertificateSource` port: a PEM file on disk (the
//! gateway's mounted certificate) or a digest supplied through configuration.

mod fixed;
mod pem_file;

pub use fixed::FixedCertificateSource;
pub use pem_file::PemFileCertificateSource;
