use pushping_common::{PushGateway, PushPingError};
use pushping_config::PushConfig;
use pushping_expo::ExpoClient;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(endpoint: String) -> ExpoClient {
    ExpoClient::new(PushConfig {
        endpoint,
        request_timeout_secs: 2,
        ..PushConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_success_returns_receipt_unparsed() {
    let server = MockServer::start().await;
    let receipt = json!({"data": {"status": "ok", "id": "XXXX-1"}});

    Mock::given(method("POST"))
        .and(path("/--/api/v2/push/send"))
        .and(header("accept", "application/json"))
        .and(body_json(json!({
            "to": "ExponentPushToken[abc]",
            "sound": "default",
            "title": "Hello 👋",
            "body": "Automated ping from server",
            "data": {"type": "ping", "id": "auto-5s"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(receipt.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(format!("{}/--/api/v2/push/send", server.uri()));
    let result = client
        .send_notification("ExponentPushToken[abc]", &json!({"type": "ping", "id": "auto-5s"}))
        .await
        .unwrap();

    assert_eq!(result, receipt);
}

#[tokio::test]
async fn test_non_success_status_is_rejected_with_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad token"))
        .mount(&server)
        .await;

    let client = client_for(server.uri());
    let err = client
        .send_notification("not-a-token", &json!({}))
        .await
        .unwrap_err();

    match err {
        PushPingError::GatewayRejected { status, body } => {
            assert_eq!(status, 400);
            assert_eq!(body, "bad token");
        }
        other => panic!("expected GatewayRejected, got {other:?}"),
    }
}

#[tokio::test]
async fn test_success_with_non_json_body_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = client_for(server.uri())
        .send_notification("t", &json!({}))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PushPingError::GatewayRejected { status: 200, ref body } if body.contains("maintenance")
    ));
}

#[tokio::test]
async fn test_unreachable_gateway() {
    // nothing listens on port 1
    let err = client_for("http://127.0.0.1:1/push".to_string())
        .send_notification("t", &json!({}))
        .await
        .unwrap_err();

    assert!(matches!(err, PushPingError::GatewayUnreachable(_)));
}

#[tokio::test]
async fn test_slow_gateway_times_out_as_unreachable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": {}}))
                .set_delay(std::time::Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let err = client_for(server.uri())
        .send_notification("t", &json!({}))
        .await
        .unwrap_err();

    assert!(matches!(err, PushPingError::GatewayUnreachable(_)));
}
