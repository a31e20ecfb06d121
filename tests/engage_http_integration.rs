//! Integration tests for the engagement HTTP endpoint.
//!
//! These tests drive the full router in-process:
//! 1. Payload validation and API key rejection
//! 2. A complete ten-turn engagement ending in a delivered report
//! 3. Link filtering and session retirement as seen from outside

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use secrecy::Secret;
use serde_json::{json, Value};
use tower::ServiceExt;

use scam_honeypot::adapters::http::{app_router, ApiKeyState, EngageHandlers};
use scam_honeypot::adapters::{InMemorySessionStore, RecordingReportSink};
use scam_honeypot::application::{DispatcherConfig, EngageMessageHandler, ReportDispatcher};
use scam_honeypot::domain::reporting::{ConfidenceLevel, ReportKind, ScamType};
use scam_honeypot::ports::SessionStore;

// =============================================================================
// Test Infrastructure
// =============================================================================

struct TestApp {
    router: Router,
    store: InMemorySessionStore,
    sink: RecordingReportSink,
    dispatcher: Arc<ReportDispatcher>,
}

fn test_app(api_key: Option<&str>) -> TestApp {
    let store = InMemorySessionStore::new();
    let sink = RecordingReportSink::new();
    let dispatcher = Arc::new(ReportDispatcher::with_config(
        Arc::new(sink.clone()),
        DispatcherConfig::default().with_initial_backoff(Duration::from_millis(1)),
    ));
    let handler = EngageMessageHandler::new(Arc::new(store.clone()), dispatcher.clone());
    let router = app_router(
        EngageHandlers::new(Arc::new(handler)),
        ApiKeyState::new(api_key.map(|k| Secret::new(k.to_string()))),
        Duration::from_secs(30),
    );
    TestApp {
        router,
        store,
        sink,
        dispatcher,
    }
}

fn engage_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/engage")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn message(session_id: &str, text: &str) -> Value {
    json!({
        "sessionId": session_id,
        "message": { "sender": "scammer", "text": text, "timestamp": 1770005528731u64 },
        "conversationHistory": [],
        "metadata": { "channel": "SMS", "language": "English", "locale": "IN" }
    })
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

// =============================================================================
// Validation and auth
// =============================================================================

#[tokio::test]
async fn health_is_open() {
    let app = test_app(Some("secret"));
    let response = app
        .router
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"OK");
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let app = test_app(None);
    let request = Request::builder()
        .method("POST")
        .uri("/api/engage")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "status": "error", "reply": "Invalid request format" }));
}

#[tokio::test]
async fn missing_session_id_is_rejected() {
    let app = test_app(None);
    let (status, body) = send(&app.router, engage_request(message("", "hello"))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "status": "error", "reply": "sessionId is required" }));
    assert_eq!(app.store.count().await, 0);
}

#[tokio::test]
async fn missing_text_is_rejected() {
    let app = test_app(None);
    let (status, body) = send(&app.router, engage_request(json!({ "sessionId": "s1" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["reply"], "message.text is required");
}

#[tokio::test]
async fn wrong_api_key_is_unauthorized() {
    let app = test_app(Some("secret"));

    let (status, _) = send(&app.router, engage_request(message("s1", "hi"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let mut request = engage_request(message("s1", "hi"));
    request
        .headers_mut()
        .insert("x-api-key", "wrong".parse().unwrap());
    let (status, _) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let mut request = engage_request(message("s1", "hi"));
    request
        .headers_mut()
        .insert("x-api-key", "secret".parse().unwrap());
    let (status, body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
}

// =============================================================================
// Full engagement
// =============================================================================

#[tokio::test]
async fn ten_turn_engagement_delivers_a_report() {
    let app = test_app(None);
    let mut outcomes = app.dispatcher.subscribe();

    let script = [
        "URGENT: your account will be blocked. Send OTP now to unblock.",
        "Pay the verification fee to sbi.help@ybl immediately",
        "Call our officer on +91 98765 43210",
        "Transfer to account number 123456789012 IFSC SBIN0001234",
        "Visit https://bit.ly/sbi-kyc to complete the process",
        "You can also use https://onlinesbi.com/login",
        "Why are you not responding?",
        "Final warning, do it now",
        "Sir please hurry",
        "Last chance",
    ];

    for (i, text) in script.iter().enumerate() {
        let (status, body) = send(&app.router, engage_request(message("wertyu", text))).await;
        assert_eq!(status, StatusCode::OK, "turn {}", i + 1);
        assert_eq!(body["status"], "success");
        assert!(!body["reply"].as_str().unwrap_or_default().is_empty());
    }

    let outcome = tokio::time::timeout(Duration::from_secs(5), outcomes.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(outcome.kind, ReportKind::Final);
    assert!(outcome.status.is_delivered());
    assert_eq!(app.store.count().await, 0);

    let reports = app.sink.delivered().await;
    assert_eq!(reports.len(), 1);
    let report = &reports[0];

    assert_eq!(report.session_id, "wertyu");
    assert!(report.scam_detected);
    assert_eq!(report.total_messages_exchanged, 20);
    assert_eq!(report.engagement_metrics.total_messages_exchanged, 20);

    let intel = &report.extracted_intelligence;
    assert_eq!(intel.upi_ids, vec!["sbi.help@ybl"]);
    assert_eq!(intel.phone_numbers, vec!["+919876543210"]);
    assert_eq!(intel.bank_accounts, vec!["123456789012"]);
    assert_eq!(intel.ifsc_codes, vec!["SBIN0001234"]);
    assert_eq!(intel.phishing_links, vec!["https://bit.ly/sbi-kyc"]);
    assert!(!intel.suspicious_keywords.is_empty());

    assert_eq!(report.scam_type, ScamType::BankFraud);
    assert_eq!(report.confidence_level, ConfidenceLevel::High);
    assert!(report.agent_notes.contains("UPI: sbi.help@ybl"));

    let json = serde_json::to_value(report).unwrap();
    assert!(json["extractedIntelligence"].get("caseIDs").is_none());
    assert_eq!(json["extractedIntelligence"]["ifscCodes"], json!(["SBIN0001234"]));
}

#[tokio::test]
async fn next_message_after_completion_opens_a_new_session() {
    let app = test_app(None);
    for _ in 0..10 {
        send(&app.router, engage_request(message("s1", "hello there"))).await;
    }
    assert_eq!(app.store.count().await, 0);

    let (status, _) = send(&app.router, engage_request(message("s1", "hello again"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.store.count().await, 1);
}

#[tokio::test]
async fn history_supplies_missed_intel() {
    let app = test_app(None);
    let body = json!({
        "sessionId": "h1",
        "message": { "sender": "scammer", "text": "Did you pay?" },
        "conversationHistory": [
            { "sender": "scammer", "text": "URGENT: account blocked, share OTP now" },
            { "sender": "user", "text": "Where do I send it?" },
            { "sender": "scammer", "text": "Send Rs 10 to kyc.update@paytm" }
        ]
    });

    let (status, _) = send(&app.router, engage_request(body)).await;
    assert_eq!(status, StatusCode::OK);

    let ids = app.store.active_sessions().await;
    assert_eq!(ids.len(), 1);
    assert_eq!(ids[0].as_str(), "h1");
}
