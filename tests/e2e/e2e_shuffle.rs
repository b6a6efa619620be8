use std::process::{Command, Output};
use std::time::Duration;

use axum::Router;
use axum::http::{HeaderMap, StatusCode, header::CONTENT_TYPE};
use axum::routing::post;
use bytes::Bytes;
use shuffle_sender::{DEFAULT_PORT, Endpoint, NetworkStage, SenderConfig, ShuffleSender};
use sonic_rs::json;
use tokio::net::TcpListener;
use tokio::time::sleep;

#[tokio::test]
async fn e2e_shuffle_response_is_returned_as_is() {
    let server = TestServer::start().await;
    let sender = ShuffleSender::new(server.config("/shuffle"));

    let response = sender
        .send_shuffle_request(6)
        .await
        .expect("stub service answers json");

    assert_eq!(response.as_value(), &json!({"result": [3, 1, 4, 1, 5, 9]}));
}

#[tokio::test]
async fn e2e_request_carries_json_content_type_and_body() {
    let server = TestServer::start().await;
    let sender = ShuffleSender::new(server.config("/echo"));

    let response = sender
        .send_shuffle_request(6)
        .await
        .expect("echo handler answers json");

    assert_eq!(
        response.as_value(),
        &json!({"content_type": "application/json", "body": "{\"unique_nums\":6}"})
    );
}

#[tokio::test]
async fn e2e_non_success_status_is_parsed() {
    let server = TestServer::start().await;
    let sender = ShuffleSender::new(server.config("/reject"));

    let response = sender
        .send_shuffle_request(-1)
        .await
        .expect("400 json body is returned");

    assert_eq!(
        response.error_message(),
        Some("random_nums must be a positive integer")
    );
}

#[tokio::test]
async fn e2e_non_json_body_is_parse_error() {
    let server = TestServer::start().await;
    let sender = ShuffleSender::new(server.config("/garbage"));

    let err = sender
        .send_shuffle_request(6)
        .await
        .expect_err("text body should not parse");

    assert!(err.is_parse());
    assert_eq!(err.status(), Some(200));
}

#[tokio::test]
async fn e2e_unreachable_endpoint_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind probe listener");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);

    let sender =
        ShuffleSender::new(SenderConfig::with_endpoint(Endpoint::new("127.0.0.1", port)));
    let err = sender
        .send_shuffle_request(6)
        .await
        .expect_err("nothing listens on the probed port");

    assert!(err.is_network());
    assert_eq!(err.stage(), Some(NetworkStage::Connect));
}

#[tokio::test]
async fn e2e_configured_timeout_is_network_error() {
    let server = TestServer::start().await;
    let sender = ShuffleSender::new(
        server
            .config("/slow")
            .with_timeout(Duration::from_millis(200)),
    );

    let err = sender
        .send_shuffle_request(6)
        .await
        .expect_err("slow handler exceeds the timeout");

    assert_eq!(err.stage(), Some(NetworkStage::Timeout));
}

// The binary's endpoint is compiled in, so this test needs the default port.
#[tokio::test]
async fn e2e_binary_prints_reply_or_fails_silently() {
    let Ok(listener) = TcpListener::bind(("127.0.0.1", DEFAULT_PORT)).await else {
        eprintln!("port {DEFAULT_PORT} is busy; skipping binary run");
        return;
    };

    let mut server = TestServer::serve(listener);
    let output = run_binary().await;
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(output.stdout, b"{\"result\":[3,1,4,1,5,9]}\n");
    server.task.abort();
    let _ = (&mut server.task).await;

    // Bind and release so nothing answers on the default port.
    let listener = TcpListener::bind(("127.0.0.1", DEFAULT_PORT))
        .await
        .expect("rebind default port");
    drop(listener);
    let output = run_binary().await;
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

async fn run_binary() -> Output {
    tokio::task::spawn_blocking(|| {
        Command::new(env!("CARGO_BIN_EXE_shuffle-send"))
            .output()
            .expect("spawn shuffle-send")
    })
    .await
    .expect("join binary run")
}

struct TestServer {
    port: u16,
    task: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        Self::serve(listener)
    }

    fn serve(listener: TcpListener) -> Self {
        let app = Router::new()
            .route("/shuffle", post(shuffle_handler))
            .route("/echo", post(echo_handler))
            .route("/reject", post(reject_handler))
            .route("/garbage", post(garbage_handler))
            .route("/slow", post(slow_handler));
        let port = listener.local_addr().expect("local addr").port();

        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { port, task }
    }

    fn config(&self, path: &str) -> SenderConfig {
        SenderConfig::with_endpoint(Endpoint::new("127.0.0.1", self.port).with_path(path))
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn shuffle_handler() -> (StatusCode, &'static str) {
    (StatusCode::OK, r#"{"result":[3,1,4,1,5,9]}"#)
}

#[derive(serde::Serialize)]
struct EchoPayload<'a> {
    content_type: &'a str,
    body: &'a str,
}

async fn echo_handler(headers: HeaderMap, body: Bytes) -> (StatusCode, String) {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let body = String::from_utf8_lossy(&body);
    let payload = EchoPayload {
        content_type,
        body: body.as_ref(),
    };
    (
        StatusCode::OK,
        sonic_rs::to_string(&payload).expect("echo payload serializes"),
    )
}

async fn reject_handler() -> (StatusCode, &'static str) {
    (
        StatusCode::BAD_REQUEST,
        r#"{"error":"random_nums must be a positive integer"}"#,
    )
}

async fn garbage_handler() -> (StatusCode, &'static str) {
    (StatusCode::OK, "not json")
}

async fn slow_handler() -> (StatusCode, &'static str) {
    sleep(Duration::from_millis(2000)).await;
    (StatusCode::OK, r#"{"result":[]}"#)
}
