//! Trivial connectivity check used by the gateway during local development.

use actix_web::{HttpResponse, get};
use serde::Serialize;
use utoipa::ToSchema;

/// Body of `GET /api/ping`.
#[derive(Debug, Serialize, ToSchema)]
pub struct PingResponse {
    /// Always `true`.
    #[schema(example = true)]
    pub pong: bool,
}

/// Answer `{"pong":true}`.
#[utoipa::path(
    get,
    path = "/api/ping",
    tags = ["health"],
    responses((status = 200, description = "Backend reachable", body = PingResponse))
)]
#[get("/api/ping")]
pub async fn ping() -> HttpResponse {
    HttpResponse::Ok().json(PingResponse { pong: true })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test};
    use serde_json::{Value, json};

    #[actix_web::test]
    async fn answers_pong() {
        let app = test::init_service(App::new().service(ping)).await;
        let req = test::TestRequest::get().uri("/api/ping").to_request();

        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body, json!({"pong": true}));
    }
}
