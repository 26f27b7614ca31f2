//! Driven port supplying the digest of the gateway's current leaf
//! certificate.

use crate::domain::{CertificateDigest, CertificateError};

/// Source of the pinned certificate digest.
///
/// Implementations may block; digest lookups happen at most once per served
/// page.
#[cfg_attr(test, mockall::automock)]
pub trait CertificateSource: Send + Sync {
    /// Return the digest of the leaf certificate the gateway presents.
    ///
    /// # Errors
    /// Returns [`CertificateError`] when the certificate cannot be read or
    /// digested. Callers serving pages treat this as a server error: without a
    /// digest the browser cannot establish trust.
    fn leaf_digest(&self) -> Result<CertificateDigest, CertificateError>;
}

/// Source used when neither a certificate file nor a digest is configured.
///
/// Every lookup fails with [`CertificateError::Unreadable`], so the info
/// endpoint answers 500 instead of serving a digest the browser would reject.
#[derive(Debug, Clone, Copy, Default)]
pub struct MissingCertificateSource;

impl CertificateSource for MissingCertificateSource {
    fn leaf_digest(&self) -> Result<CertificateDigest, CertificateError> {
        Err(CertificateError::Unreadable {
            path: std::path::PathBuf::new(),
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no certificate source configured",
            ),
        })
    }
}
