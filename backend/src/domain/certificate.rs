//! Leaf certificate digests for WebTransport certificate pinning.
//!
//! Browsers accept a self-signed gateway certificate when the client passes
//! `serverCertificateHashes` with the SHA-256 of the certificate's *entire*
//! DER encoding. Hashing the public key or the TBS structure instead yields a
//! digest the browser silently rejects, so this module only ever hashes the
//! full DER of the first (leaf) certificate in a PEM source.

use std::path::{Path, PathBuf};

use rustls::pki_types::CertificateDer;
use rustls::pki_types::pem::PemObject;
use sha2::{Digest, Sha256};

/// Length of a SHA-256 digest in bytes.
pub const DIGEST_LEN: usize = 32;

/// Errors raised while deriving a certificate digest.
#[derive(Debug, thiserror::Error)]
pub enum CertificateError {
    /// The certificate source could not be read.
    #[error("cannot read certificate at {path}: {source}")]
    Unreadable {
        /// Path of the certificate source.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The source does not contain a well-formed X.509 certificate.
    #[error("invalid X.509 certificate: {reason}")]
    Unparseable {
        /// Parser diagnostic.
        reason: String,
    },
    /// The fingerprint could not be produced.
    #[error("failed to compute certificate fingerprint: {reason}")]
    FingerprintFailed {
        /// Diagnostic describing the failure.
        reason: String,
    },
    /// The digest does not have the SHA-256 length.
    #[error("unexpected SHA-256 fingerprint length: {length}")]
    UnexpectedLength {
        /// Observed digest length in bytes.
        length: usize,
    },
}

impl CertificateError {
    /// Short failure class used in structured logs.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Unreadable { .. } => "unreadable-source",
            Self::Unparseable { .. } => "unparseable-certificate",
            Self::FingerprintFailed { .. } => "fingerprint-computation-failed",
            Self::UnexpectedLength { .. } => "unexpected-length",
        }
    }
}

/// SHA-256 digest of a DER-encoded leaf certificate.
///
/// ## Invariants
/// - Always exactly [`DIGEST_LEN`] bytes.
/// - [`CertificateDigest::hex`] is the lowercase hex encoding of the bytes.
///
/// # Examples
/// ```
/// use backend::domain::CertificateDigest;
///
/// let digest = CertificateDigest::from_hex(&"ab".repeat(32)).expect("valid digest");
/// assert_eq!(digest.as_bytes().len(), 32);
/// assert_eq!(digest.hex(), "ab".repeat(32));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CertificateDigest([u8; DIGEST_LEN]);

impl CertificateDigest {
    /// Digest the first certificate of a PEM file.
    ///
    /// # Errors
    /// Returns [`CertificateError::Unreadable`] when the file cannot be read,
    /// or any error from [`CertificateDigest::from_pem`].
    pub fn from_pem_file(path: &Path) -> Result<Self, CertificateError> {
        let pem = std::fs::read(path).map_err(|source| CertificateError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_pem(&pem)
    }

    /// Digest the first `CERTIFICATE` block of a PEM document.
    ///
    /// Other PEM sections (private keys, parameters) are skipped. When the
    /// document holds a chain, the first certificate is treated as the leaf.
    ///
    /// # Errors
    /// Returns [`CertificateError::Unparseable`] when no certificate block is
    /// present or its contents are not an X.509 certificate.
    pub fn from_pem(pem: &[u8]) -> Result<Self, CertificateError> {
        let leaf = CertificateDer::pem_slice_iter(pem)
            .next()
            .ok_or_else(|| CertificateError::Unparseable {
                reason: "no CERTIFICATE block found".to_owned(),
            })?
            .map_err(|error| CertificateError::Unparseable {
                reason: error.to_string(),
            })?;
        Self::from_der(leaf.as_ref())
    }

    /// Digest a DER-encoded certificate.
    ///
    /// # Errors
    /// Returns [`CertificateError::Unparseable`] when `der` is not exactly one
    /// X.509 certificate.
    pub fn from_der(der: &[u8]) -> Result<Self, CertificateError> {
        check_x509(der)?;
        let digest = Sha256::digest(der);
        Self::try_from_slice(digest.as_slice())
    }

    /// Parse a digest previously rendered with [`CertificateDigest::hex`].
    ///
    /// # Errors
    /// Returns [`CertificateError::FingerprintFailed`] for non-hex input and
    /// [`CertificateError::UnexpectedLength`] when it does not decode to 32
    /// bytes.
    pub fn from_hex(value: &str) -> Result<Self, CertificateError> {
        let bytes = hex::decode(value.trim()).map_err(|error| {
            CertificateError::FingerprintFailed {
                reason: format!("digest is not hex: {error}"),
            }
        })?;
        Self::try_from_slice(&bytes)
    }

    /// Build a digest from raw bytes, enforcing the SHA-256 length.
    ///
    /// # Errors
    /// Returns [`CertificateError::UnexpectedLength`] unless `bytes` has
    /// exactly [`DIGEST_LEN`] bytes.
    pub fn try_from_slice(bytes: &[u8]) -> Result<Self, CertificateError> {
        <[u8; DIGEST_LEN]>::try_from(bytes)
            .map(Self)
            .map_err(|_| CertificateError::UnexpectedLength {
                length: bytes.len(),
            })
    }

    /// Raw digest bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Digest bytes as an owned vector, serialised as integers 0..=255.
    #[must_use]
    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    /// Lowercase hex rendering (64 characters).
    #[must_use]
    pub fn hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Debug for CertificateDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("CertificateDigest").field(&self.hex()).finish()
    }
}

impl std::fmt::Display for CertificateDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.hex())
    }
}

/// Check that `der` is exactly one X.509 certificate with no trailing bytes.
fn check_x509(der: &[u8]) -> Result<(), CertificateError> {
    let (rest, _) = x509_parser::parse_x509_certificate(der).map_err(|error| {
        CertificateError::Unparseable {
            reason: error.to_string(),
        }
    })?;
    if !rest.is_empty() {
        return Err(CertificateError::Unparseable {
            reason: format!("{} trailing bytes after certificate", rest.len()),
        });
    }
    Ok(())
}
