//! Certificate pinning endpoint.
//!
//! ```text
//! GET /internal/cert-info
//! ```
//!
//! Browsers establishing a WebTransport session to the gateway pass the digest
//! served here as `serverCertificateHashes`. Pages must not receive a stale or
//! partial digest, so any certificate failure is a server error.

use std::sync::Arc;

use actix_web::{HttpResponse, get, http::header, web};
use serde::Serialize;
use tracing::{debug, error};
use utoipa::ToSchema;

use crate::domain::{CertificateDigest, CertificateError, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Digest of the gateway leaf certificate in the two forms clients use.
#[derive(Debug, Serialize, ToSchema)]
pub struct CertInfoResponse {
    /// 32 raw digest bytes, ready for a `Uint8Array`.
    pub cert_digest_sha256_bytes: Vec<u8>,
    /// Lowercase hex encoding of the same bytes.
    #[schema(example = "3b1f0c0a0f5d2d7c52c1e3d4a8b9f0e1d2c3b4a5968778695a4b3c2d1e0f1a2b")]
    pub cert_digest_sha256_hex: String,
}

impl From<CertificateDigest> for CertInfoResponse {
    fn from(digest: CertificateDigest) -> Self {
        Self {
            cert_digest_sha256_bytes: digest.to_vec(),
            cert_digest_sha256_hex: digest.hex(),
        }
    }
}

/// Serve the SHA-256 digest of the gateway's current leaf certificate.
#[utoipa::path(
    get,
    path = "/internal/cert-info",
    responses(
        (status = 200, description = "Current certificate digest", body = CertInfoResponse),
        (status = 500, description = "Certificate unavailable", body = ErrorSchema)
    ),
    tags = ["certificate"],
    operation_id = "getCertInfo"
)]
#[get("/internal/cert-info")]
pub async fn cert_info(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let certificates = Arc::clone(&state.certificates);
    let digest = web::block(move || certificates.leaf_digest())
        .await
        .map_err(|err| {
            error!(error = %err, "certificate lookup task failed");
            Error::internal("certificate lookup failed")
        })?
        .map_err(map_certificate_error)?;

    debug!(digest = %digest, "serving certificate digest");
    Ok(HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(CertInfoResponse::from(digest)))
}

fn map_certificate_error(err: CertificateError) -> Error {
    error!(reason = err.reason(), error = %err, "certificate digest unavailable");
    Error::internal(err.to_string())
}
