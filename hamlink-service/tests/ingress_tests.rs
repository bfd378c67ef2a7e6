use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use hamlink_core::SegmentMeta;
use hamlink_service::ingress::{self, IngressState};
use hamlink_service::wire::{CodeRequest, CodeTransferRequest};
use hamlink_service::{Dispatcher, HttpForwarder, ServiceConfig, Transfer};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// Helper: fake downstream that records every body and answers `status`
async fn downstream(status: StatusCode) -> (String, mpsc::UnboundedReceiver<CodeTransferRequest>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let app = Router::new().route(
        "/encoded-message/transfer",
        post(move |Json(body): Json<CodeTransferRequest>| {
            let tx = tx.clone();
            async move {
                let _ = tx.send(body);
                status
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/encoded-message/transfer", addr), rx)
}

/// Helper: start the ingress + dispatcher on an ephemeral port
async fn start(config: ServiceConfig) -> (String, Dispatcher) {
    let forwarder = HttpForwarder::new(config.forward_url.clone(), config.forward_timeout()).unwrap();
    let dispatcher = Dispatcher::spawn(
        Transfer::new(config.pipeline().unwrap(), forwarder),
        config.workers,
        config.queue_depth,
        config.seed,
    );
    let app = ingress::router(IngressState::new(dispatcher.handle()), config.body_limit());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(ingress::serve(listener, app, std::future::pending()));

    (format!("http://{}", addr), dispatcher)
}

fn config(forward_url: String, message_loss: u8, frame_error: u8) -> ServiceConfig {
    ServiceConfig {
        forward_url,
        message_loss,
        frame_error,
        workers: 2,
        forward_timeout_ms: 2000,
        seed: Some(1234),
        ..ServiceConfig::default()
    }
}

fn request(seg_num: u32, payload: &[u8]) -> CodeRequest {
    CodeRequest {
        meta: SegmentMeta {
            sender: "erin".to_string(),
            time: "2024-05-01T12:00:00Z".to_string(),
            seg_count: 8,
            seg_num,
        },
        payload: payload.to_vec(),
    }
}

async fn post_code(base: &str, req: &CodeRequest) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("{}/code", base))
        .json(req)
        .send()
        .await
        .unwrap()
}

async fn next(rx: &mut mpsc::UnboundedReceiver<CodeTransferRequest>) -> Option<CodeTransferRequest> {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .ok()
        .flatten()
}

#[tokio::test]
async fn clean_link_forwards_exact_payload() {
    let (forward_url, mut rx) = downstream(StatusCode::OK).await;
    let (base, _dispatcher) = start(config(forward_url, 0, 0)).await;

    let req = request(3, b"The quick brown fox");
    let resp = post_code(&base, &req).await;
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    assert!(resp.bytes().await.unwrap().is_empty());

    let fwd = next(&mut rx).await.expect("segment was not forwarded");
    assert_eq!(fwd.meta.sender, "erin");
    assert_eq!(fwd.meta.time, "2024-05-01T12:00:00Z");
    assert_eq!(fwd.meta.seg_count, 8);
    assert_eq!(fwd.meta.seg_num, 3);
    assert_eq!(fwd.payload, b"The quick brown fox");
    assert!(!fwd.has_error);
}

#[tokio::test]
async fn single_flips_are_corrected_before_forwarding() {
    let (forward_url, mut rx) = downstream(StatusCode::OK).await;
    let (base, _dispatcher) = start(config(forward_url, 0, 100)).await;

    let payload: Vec<u8> = (0..=255).collect();
    for n in 0..4 {
        assert_eq!(post_code(&base, &request(n, &payload)).await.status(), reqwest::StatusCode::OK);
    }

    let mut seen = Vec::new();
    for _ in 0..4 {
        let fwd = next(&mut rx).await.expect("segment was not forwarded");
        assert_eq!(fwd.payload, payload);
        assert!(!fwd.has_error);
        seen.push(fwd.meta.seg_num);
    }
    seen.sort_unstable();
    assert_eq!(seen, vec![0, 1, 2, 3]);
}

#[tokio::test]
async fn total_loss_never_forwards() {
    let (forward_url, mut rx) = downstream(StatusCode::OK).await;
    let (base, _dispatcher) = start(config(forward_url, 100, 10)).await;

    for n in 0..20 {
        let resp = post_code(&base, &request(n, b"gone")).await;
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
    }

    let got = tokio::time::timeout(Duration::from_millis(500), rx.recv()).await;
    assert!(got.is_err(), "lost segments must not reach the downstream");
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let (forward_url, mut rx) = downstream(StatusCode::OK).await;
    let (base, _dispatcher) = start(config(forward_url, 0, 0)).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/code", base))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
    let text = resp.text().await.unwrap();
    assert!(text.starts_with("Can't read request body"), "{}", text);

    let got = tokio::time::timeout(Duration::from_millis(300), rx.recv()).await;
    assert!(got.is_err());
}

#[tokio::test]
async fn missing_field_and_blank_sender_are_rejected() {
    let (forward_url, _rx) = downstream(StatusCode::OK).await;
    let (base, _dispatcher) = start(config(forward_url, 0, 0)).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/code", base))
        .json(&serde_json::json!({"sender": "x", "time": "t", "seg_count": 1, "payload": "AA=="}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);

    let mut req = request(0, b"x");
    req.meta.sender = String::new();
    assert_eq!(post_code(&base, &req).await.status(), reqwest::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn downstream_failure_is_invisible_to_caller() {
    let (forward_url, mut rx) = downstream(StatusCode::INTERNAL_SERVER_ERROR).await;
    let (base, _dispatcher) = start(config(forward_url, 0, 0)).await;

    let resp = post_code(&base, &request(1, b"still accepted")).await;
    assert_eq!(resp.status(), reqwest::StatusCode::OK);

    // Attempted exactly once, no retry
    assert!(next(&mut rx).await.is_some());
    let again = tokio::time::timeout(Duration::from_millis(300), rx.recv()).await;
    assert!(again.is_err());
}

#[tokio::test]
async fn unreachable_downstream_is_invisible_to_caller() {
    // Bind then drop to get a port nobody listens on
    let port = {
        let l = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        l.local_addr().unwrap().port()
    };
    let (base, _dispatcher) =
        start(config(format!("http://127.0.0.1:{}/transfer", port), 0, 0)).await;

    let resp = post_code(&base, &request(0, b"nowhere to go")).await;
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
}

#[tokio::test]
async fn health_answers_ok() {
    let (forward_url, _rx) = downstream(StatusCode::OK).await;
    let (base, _dispatcher) = start(config(forward_url, 0, 0)).await;

    let resp = reqwest::get(format!("{}/health", base)).await.unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
}
