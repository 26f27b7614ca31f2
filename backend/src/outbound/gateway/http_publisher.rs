//! Reqwest-backed gateway publisher.
//!
//! This adapter owns transport details only: request serialisation, timeout
//! and status mapping. It makes exactly one attempt per publish.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;
use url::Url;

use super::dto::PublishRequestDto;
use crate::domain::ports::{GatewayPublisher, PublishError};

/// Path of the publish endpoint relative to the control channel base URL.
pub const PUBLISH_PATH: &str = "internal/publish";

/// Errors raised while constructing the publisher.
#[derive(Debug, thiserror::Error)]
pub enum GatewayClientError {
    /// The HTTP client could not be built.
    #[error("failed to build gateway HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    /// The publish URL could not be derived from the base URL.
    #[error("invalid gateway control URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Publisher posting messages to the gateway's control channel.
#[derive(Debug, Clone)]
pub struct HttpGatewayPublisher {
    client: Client,
    publish_url: Url,
}

impl HttpGatewayPublisher {
    /// Build a publisher for the gateway reachable at `control_url`.
    ///
    /// `control_url` is the base URL of the control channel, e.g.
    /// `http://gateway:8080/`; requests go to [`PUBLISH_PATH`] beneath it.
    /// ```rust,ignore
    /// let publisher = HttpGatewayPublisher::new(&control_url, Duration::from_secs(3))?;
    /// ```
    ///
    /// # Errors
    /// Returns [`GatewayClientError`] when the client cannot be constructed or
    /// the publish URL cannot be joined onto `control_url`.
    pub fn new(control_url: &Url, timeout: Duration) -> Result<Self, GatewayClientError> {
        let client = Client::builder().timeout(timeout).build()?;
        let publish_url = control_url.join(PUBLISH_PATH)?;
        Ok(Self {
            client,
            publish_url,
        })
    }

    /// Endpoint receiving publish requests.
    #[must_use]
    pub fn publish_url(&self) -> &Url {
        &self.publish_url
    }
}

#[async_trait]
impl GatewayPublisher for HttpGatewayPublisher {
    async fn publish(&self, connection_id: &str, message: &str) -> Result<(), PublishError> {
        if connection_id.is_empty() {
            return Err(PublishError::connection_unknown(connection_id));
        }

        let response = self
            .client
            .post(self.publish_url.clone())
            .json(&PublishRequestDto {
                connection_id,
                message,
            })
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            debug!(connection_id, status = status.as_u16(), "gateway accepted publish");
            return Ok(());
        }

        let body = error_body(status, response.bytes().await);
        Err(map_status_error(status, connection_id, &body))
    }
}

fn map_transport_error(error: reqwest::Error) -> PublishError {
    PublishError::transport_unreachable(error.to_string())
}

/// Body of a failed publish; an unreadable body degrades to an empty preview.
fn error_body<B: AsRef<[u8]>, E: std::fmt::Display>(
    status: StatusCode,
    body: Result<B, E>,
) -> Vec<u8> {
    match body {
        Ok(bytes) => bytes.as_ref().to_vec(),
        Err(error) => {
            debug!(
                status = status.as_u16(),
                error = %error,
                "failed to read gateway error body"
            );
            Vec::new()
        }
    }
}

fn map_status_error(status: StatusCode, connection_id: &str, body: &[u8]) -> PublishError {
    if status == StatusCode::NOT_FOUND {
        return PublishError::connection_unknown(connection_id);
    }

    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    };
    PublishError::transport_rejected(message)
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
