//! Webhook endpoint receiving gateway lifecycle events.
//!
//! ```text
//! POST /gateway/events {"type":"connected","connection_id":"c1","transport":"webtransport"}
//! ```
//!
//! The body is read raw so that an empty delivery (a gateway heartbeat) and
//! malformed JSON can be told apart instead of being rejected by an extractor.

use actix_web::{HttpResponse, post, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{IngressOutcome, Received};
use crate::inbound::http::state::HttpState;

/// Acknowledgement returned for accepted deliveries.
#[derive(Debug, Serialize, ToSchema)]
pub struct WebhookAck {
    /// Always `true`.
    #[schema(example = true)]
    pub ok: bool,
    /// `empty` for heartbeats, `body` for events.
    #[schema(example = "body")]
    pub received: String,
    /// Name of the dispatched event, absent for heartbeats.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "gateway.onMessageReceived")]
    pub event: Option<String>,
}

/// Rejection returned for structurally broken deliveries.
#[derive(Debug, Serialize, ToSchema)]
pub struct WebhookRejection {
    /// Always `false`.
    #[schema(example = false)]
    pub ok: bool,
    /// `invalid_json` or `invalid_payload`.
    #[schema(example = "invalid_payload")]
    pub error: String,
    /// Offending field when it could be identified.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "payload")]
    pub field: Option<String>,
}

/// Receive one gateway event and run its handlers before answering.
///
/// Handler failures (including a failed publish back to the gateway) are
/// logged and never change the response.
#[utoipa::path(
    post,
    path = "/gateway/events",
    request_body(content = String, description = "Webhook event JSON; may be empty", content_type = "application/json"),
    responses(
        (status = 200, description = "Delivery accepted", body = WebhookAck),
        (status = 400, description = "Body is not valid JSON or has the wrong shape", body = WebhookRejection)
    ),
    tags = ["gateway"],
    operation_id = "receiveGatewayEvent"
)]
#[post("/gateway/events")]
pub async fn receive_event(state: web::Data<HttpState>, body: web::Bytes) -> HttpResponse {
    match state.ingress.handle(&body).await {
        IngressOutcome::Accepted { received, event } => HttpResponse::Ok().json(WebhookAck {
            ok: true,
            received: received.as_str().to_owned(),
            event: match received {
                Received::Empty => None,
                Received::Body => event.map(|kind| kind.event_name().to_owned()),
            },
        }),
        IngressOutcome::Rejected(error) => HttpResponse::BadRequest().json(WebhookRejection {
            ok: false,
            error: error.code().to_owned(),
            field: error.field().map(str::to_owned),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use serde_json::{Value, json};

    use crate::domain::ports::{MissingCertificateSource, MockGatewayPublisher};
    use crate::domain::{DEFAULT_WELCOME_MESSAGE, WebhookIngress, default_dispatcher};

    fn state_with(publisher: MockGatewayPublisher) -> web::Data<HttpState> {
        let dispatcher = default_dispatcher(Arc::new(publisher), DEFAULT_WELCOME_MESSAGE);
        let ingress = WebhookIngress::new(Arc::new(dispatcher));
        web::Data::new(HttpState::new(
            Arc::new(ingress),
            Arc::new(MissingCertificateSource),
        ))
    }

    async fn post(state: web::Data<HttpState>, body: &'static str) -> (StatusCode, Value) {
        let app = test::init_service(App::new().app_data(state).service(receive_event)).await;
        let req = test::TestRequest::post()
            .uri("/gateway/events")
            .insert_header(("content-type", "application/json"))
            .set_payload(body)
            .to_request();
        let res = test::call_service(&app, req).await;
        let status = res.status();
        let body: Value = test::read_body_json(res).await;
        (status, body)
    }

    #[actix_web::test]
    async fn heartbeat_has_no_event() {
        let mut publisher = MockGatewayPublisher::new();
        publisher.expect_publish().never();

        let (status, body) = post(state_with(publisher), "").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"ok": true, "received": "empty"}));
    }

    #[actix_web::test]
    async fn connected_publishes_welcome_before_answering() {
        let mut publisher = MockGatewayPublisher::new();
        publisher
            .expect_publish()
            .withf(|connection_id, message| {
                connection_id == "c1" && message == DEFAULT_WELCOME_MESSAGE
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let (status, body) = post(
            state_with(publisher),
            r#"{"type":"connected","connection_id":"c1","transport":"webtransport"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"ok": true, "received": "body", "event": "gateway.onConnected"})
        );
    }

    #[actix_web::test]
    async fn malformed_body_is_a_bad_request() {
        let mut publisher = MockGatewayPublisher::new();
        publisher.expect_publish().never();

        let (status, body) = post(state_with(publisher), "{oops").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"ok": false, "error": "invalid_json"}));
    }

    #[actix_web::test]
    async fn payload_field_is_reported() {
        let publisher = MockGatewayPublisher::new();

        let (status, body) = post(
            state_with(publisher),
            r#"{"type":"message_received","connection_id":"c1","transport":"webtransport","payload":7}"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"ok": false, "error": "invalid_payload", "field": "payload"})
        );
    }
}
