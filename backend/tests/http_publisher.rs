//! Behaviour of the reqwest gateway publisher against a stand-in control
//! channel.

use std::net::TcpListener;
use std::time::Duration;

use backend::domain::ports::{GatewayPublisher, PublishError};
use backend::outbound::gateway::HttpGatewayPublisher;
use rstest::rstest;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn publisher_for(server: &MockServer, timeout: Duration) -> HttpGatewayPublisher {
    let base = Url::parse(&server.uri()).expect("mock server URL");
    HttpGatewayPublisher::new(&base, timeout).expect("build publisher")
}

#[tokio::test]
async fn accepted_publish_posts_the_expected_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/internal/publish"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "connection_id": "c1",
            "message": "welcome from backend",
        })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let publisher = publisher_for(&server, Duration::from_secs(3));
    publisher
        .publish("c1", "welcome from backend")
        .await
        .expect("publish accepted");
}

#[tokio::test]
async fn unknown_connection_maps_from_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/internal/publish"))
        .respond_with(ResponseTemplate::new(404).set_body_string("unknown session"))
        .expect(1)
        .mount(&server)
        .await;

    let error = publisher_for(&server, Duration::from_secs(3))
        .publish("gone", "hi")
        .await
        .expect_err("connection unknown");

    assert_eq!(error, PublishError::connection_unknown("gone"));
}

#[rstest]
#[case(400)]
#[case(500)]
#[case(503)]
#[tokio::test]
async fn other_statuses_are_rejections(#[case] status: u16) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/internal/publish"))
        .respond_with(ResponseTemplate::new(status).set_body_string("gateway says no"))
        .expect(1)
        .mount(&server)
        .await;

    let error = publisher_for(&server, Duration::from_secs(3))
        .publish("c1", "hi")
        .await
        .expect_err("rejected");

    match error {
        PublishError::TransportRejected { message } => {
            assert!(message.contains(&status.to_string()));
            assert!(message.contains("gateway says no"));
        }
        other => panic!("expected TransportRejected, got {other:?}"),
    }
}

#[tokio::test]
async fn slow_gateway_times_out_as_unreachable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/internal/publish"))
        .respond_with(ResponseTemplate::new(202).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let error = publisher_for(&server, Duration::from_millis(100))
        .publish("c1", "hi")
        .await
        .expect_err("timed out");

    assert!(matches!(error, PublishError::TransportUnreachable { .. }));
}

#[tokio::test]
async fn closed_port_is_unreachable() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
        listener.local_addr().expect("local addr").port()
    };
    let base = Url::parse(&format!("http://127.0.0.1:{port}/")).expect("valid URL");
    let publisher =
        HttpGatewayPublisher::new(&base, Duration::from_secs(1)).expect("build publisher");

    let error = publisher.publish("c1", "hi").await.expect_err("refused");

    assert!(matches!(error, PublishError::TransportUnreachable { .. }));
}
