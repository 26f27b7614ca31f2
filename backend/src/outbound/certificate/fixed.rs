//! Certificate source returning a digest supplied up front.

use crate::domain::ports::CertificateSource;
use crate::domain::{CertificateDigest, CertificateError};

/// Source for deployments where the gateway's digest is provided through
/// configuration rather than a mounted certificate.
#[derive(Debug, Clone, Copy)]
pub struct FixedCertificateSource {
    digest: CertificateDigest,
}

impl FixedCertificateSource {
    /// Wrap an existing digest.
    #[must_use]
    pub fn new(digest: CertificateDigest) -> Self {
        Self { digest }
    }

    /// Parse a 64-character hex digest.
    ///
    /// # Errors
    /// Propagates [`CertificateError`] from [`CertificateDigest::from_hex`].
    pub fn from_hex(value: &str) -> Result<Self, CertificateError> {
        CertificateDigest::from_hex(value).map(Self::new)
    }
}

impl CertificateSource for FixedCertificateSource {
    fn leaf_digest(&self) -> Result<CertificateDigest, CertificateError> {
        Ok(self.digest)
    }
}
