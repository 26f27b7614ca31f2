//! Wire types for the gateway control channel.

use serde::Serialize;

/// Body of `POST /internal/publish`.
#[derive(Debug, Serialize)]
pub(super) struct PublishRequestDto<'a> {
    pub connection_id: &'a str,
    pub message: &'a str,
}
