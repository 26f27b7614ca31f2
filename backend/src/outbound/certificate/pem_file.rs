//! PEM file certificate source with a modification-time cache.
//!
//! The gateway may rotate its certificate on restart. The cached digest is
//! reused only while the file's modification time is unchanged.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::SystemTime;

use tracing::{debug, info};

use crate::domain::ports::CertificateSource;
use crate::domain::{CertificateDigest, CertificateError};

#[derive(Debug, Clone, Copy)]
struct CachedDigest {
    modified: SystemTime,
    digest: CertificateDigest,
}

/// Reads the gateway's leaf certificate from a PEM file.
#[derive(Debug)]
pub struct PemFileCertificateSource {
    path: PathBuf,
    cache: Mutex<Option<CachedDigest>>,
}

impl PemFileCertificateSource {
    /// Create a source for `path`. The file is not read until the first
    /// lookup.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: Mutex::new(None),
        }
    }

    /// Path of the PEM file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn modified(&self) -> Result<SystemTime, CertificateError> {
        std::fs::metadata(&self.path)
            .and_then(|metadata| metadata.modified())
            .map_err(|source| CertificateError::Unreadable {
                path: self.path.clone(),
                source,
            })
    }
}

impl CertificateSource for PemFileCertificateSource {
    fn leaf_digest(&self) -> Result<CertificateDigest, CertificateError> {
        let modified = self.modified()?;
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(hit) = cache.as_ref().filter(|entry| entry.modified == modified) {
            debug!(path = %self.path.display(), "certificate digest served from cache");
            return Ok(hit.digest);
        }

        let digest = CertificateDigest::from_pem_file(&self.path)?;
        *cache = Some(CachedDigest { modified, digest });
        info!(
            path = %self.path.display(),
            digest = %digest,
            "certificate digest computed"
        );
        Ok(digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcgen::generate_simple_self_signed;
    use rstest::{fixture, rstest};
    use std::fs::File;
    use std::time::Duration;
    use tempfile::TempDir;

    fn self_signed_pem(host: &str) -> String {
        generate_simple_self_signed(vec![host.to_owned()])
            .expect("generate certificate")
            .cert
            .pem()
    }

    fn write_with_mtime(path: &Path, contents: &str, seconds: u64) {
        std::fs::write(path, contents).expect("write certificate");
        File::options()
            .write(true)
            .open(path)
            .expect("open certificate")
            .set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(seconds))
            .expect("set mtime");
    }

    #[fixture]
    fn dir() -> TempDir {
        tempfile::tempdir().expect("temp dir")
    }

    #[rstest]
    fn digests_the_file_contents(dir: TempDir) {
        let path = dir.path().join("cert.pem");
        let pem = self_signed_pem("localhost");
        write_with_mtime(&path, &pem, 1_000);

        let source = PemFileCertificateSource::new(&path);
        let digest = source.leaf_digest().expect("digest");

        let expected = CertificateDigest::from_pem(pem.as_bytes()).expect("expected digest");
        assert_eq!(digest, expected);
    }

    #[rstest]
    fn cache_is_keyed_by_modification_time(dir: TempDir) {
        let path = dir.path().join("cert.pem");
        let first = self_signed_pem("first.local");
        let second = self_signed_pem("second.local");
        write_with_mtime(&path, &first, 1_000);
        let source = PemFileCertificateSource::new(&path);
        let first_digest = source.leaf_digest().expect("first digest");

        // Same mtime: the cached digest is still served.
        write_with_mtime(&path, &second, 1_000);
        assert_eq!(source.leaf_digest().expect("cached digest"), first_digest);

        write_with_mtime(&path, &second, 2_000);
        let rotated = source.leaf_digest().expect("rotated digest");
        assert_ne!(rotated, first_digest);
        assert_eq!(
            rotated,
            CertificateDigest::from_pem(second.as_bytes()).expect("second digest")
        );
    }

    #[rstest]
    fn missing_file_is_unreadable(dir: TempDir) {
        let source = PemFileCertificateSource::new(dir.path().join("missing.pem"));

        let error = source.leaf_digest().expect_err("missing file");
        assert!(matches!(error, CertificateError::Unreadable { .. }));
    }

    #[rstest]
    fn invalid_contents_are_unparseable(dir: TempDir) {
        let path = dir.path().join("cert.pem");
        write_with_mtime(&path, "not a certificate", 1_000);

        let error = PemFileCertificateSource::new(&path)
            .leaf_digest()
            .expect_err("invalid file");
        assert!(matches!(error, CertificateError::Unparseable { .. }));
    }
}
