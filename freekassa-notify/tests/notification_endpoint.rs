//! Integration tests for the notification endpoint.
//!
//! These tests drive the Axum router directly and verify the HTTP-level
//! answers the provider sees: `YES` for accepted notifications, 400 for
//! rejected ones, 500 when the merchant handler fails.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    extract::connect_info::MockConnectInfo,
    http::{Method, Request, StatusCode},
};
use freekassa_notify::{
    NOTIFICATION_IPS, Notification, NotificationHandler, inbound::NotificationServer,
    notification_signature,
};
use http_body_util::BodyExt;
use tower::ServiceExt;

const SECRET2: &str = "second-secret";

/// Handler that remembers the payment ids it accepted.
#[derive(Clone, Default)]
struct RecordingHandler {
    accepted: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

#[async_trait::async_trait]
impl NotificationHandler for RecordingHandler {
    async fn on_payment(&self, notification: &Notification) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("order store unavailable");
        }
        self.accepted
            .lock()
            .unwrap()
            .push(notification.payment_id.clone().unwrap_or_default());
        Ok(())
    }
}

fn provider_addr() -> SocketAddr {
    SocketAddr::from((NOTIFICATION_IPS[0].octets(), 443))
}

fn stranger_addr() -> SocketAddr {
    SocketAddr::from(([203, 0, 113, 7], 443))
}

/// Helper to build the router as seen from `peer`.
fn app(handler: RecordingHandler, peer: SocketAddr) -> axum::Router {
    NotificationServer::new(SECRET2, handler)
        .router()
        .layer(MockConnectInfo(peer))
}

/// Helper to build a form-encoded notification.
fn notification_request(sign: &str) -> Request<Body> {
    let body = format!(
        "MERCHANT_ID=5&AMOUNT=10.00&intid=777&MERCHANT_ORDER_ID=abc&CUR_ID=1&SIGN={}&us_ref=r-1",
        sign
    );
    Request::builder()
        .method(Method::POST)
        .uri("/notification")
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

fn valid_sign() -> String {
    notification_signature("5", "10.00", SECRET2, "abc")
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = app(RecordingHandler::default(), provider_addr());
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_valid_notification_answers_yes() {
    let handler = RecordingHandler::default();
    let app = app(handler.clone(), provider_addr());

    let response = app.oneshot(notification_request(&valid_sign())).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "YES");
    assert_eq!(*handler.accepted.lock().unwrap(), vec!["abc".to_string()]);
}

#[tokio::test]
async fn test_bad_signature_is_rejected() {
    let handler = RecordingHandler::default();
    let app = app(handler.clone(), provider_addr());

    let response = app
        .oneshot(notification_request("0123456789abcdef0123456789abcdef"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["error"], "Invalid signature");
    assert!(handler.accepted.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_source_ip_is_rejected() {
    let handler = RecordingHandler::default();
    let app = app(handler.clone(), stranger_addr());

    let response = app.oneshot(notification_request(&valid_sign())).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(handler.accepted.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_ip_check_can_be_disabled() {
    let handler = RecordingHandler::default();
    let app = NotificationServer::new(SECRET2, handler.clone())
        .with_ip_check(false)
        .router()
        .layer(MockConnectInfo(stranger_addr()));

    let response = app.oneshot(notification_request(&valid_sign())).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(handler.accepted.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_trusted_proxy_header() {
    let app = NotificationServer::new(SECRET2, RecordingHandler::default())
        .with_trusted_proxy(true)
        .router()
        .layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 50000))));

    let mut request = notification_request(&valid_sign());
    request
        .headers_mut()
        .insert("x-real-ip", "178.154.197.79".parse().unwrap());

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_handler_failure_is_server_error() {
    let handler = RecordingHandler {
        fail: true,
        ..Default::default()
    };
    let app = app(handler, provider_addr());

    let response = app.oneshot(notification_request(&valid_sign())).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
