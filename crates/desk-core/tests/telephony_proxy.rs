//! TwilioClient against an in-process proxy

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use calldesk_core::dialer::{CallPhase, Dialer, PollOutcome, PollPolicy};
use calldesk_core::services::MockDeskBackend;
use calldesk_core::telephony::{ProviderStatus, TelephonyProvider, TwilioClient, TwilioConfig};
use serde_json::{Value, json};
use std::time::Duration;

#[derive(Clone, Default)]
struct Recorded {
    bodies: Arc<Mutex<Vec<Value>>>,
    status_sids: Arc<Mutex<Vec<String>>>,
}

async fn initiate(State(recorded): State<Recorded>, Json(body): Json<Value>) -> Json<Value> {
    recorded.bodies.lock().unwrap().push(body);
    Json(json!({
        "success": true,
        "callId": "twilio-42",
        "sid": "CA0123456789abc",
        "timestamp": "2024-03-01T12:00:00Z"
    }))
}

async fn end(State(recorded): State<Recorded>, Json(body): Json<Value>) -> Json<Value> {
    recorded.bodies.lock().unwrap().push(body);
    Json(json!({ "success": true, "message": "Call ended" }))
}

async fn status(State(recorded): State<Recorded>, Path(sid): Path<String>) -> Result<Json<Value>, StatusCode> {
    recorded.status_sids.lock().unwrap().push(sid.clone());
    match sid.as_str() {
        "CA0123456789abc" => Ok(Json(json!({
            "success": true,
            "status": "completed",
            "duration": 42
        }))),
        _ => Err(StatusCode::NOT_FOUND),
    }
}

async fn spawn_proxy() -> (String, Recorded) {
    let recorded = Recorded::default();
    let app = Router::new()
        .route("/api/twilio/call", post(initiate))
        .route("/api/twilio/call/end", post(end))
        .route("/api/twilio/call/:sid", get(status))
        .with_state(recorded.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), recorded)
}

fn config() -> TwilioConfig {
    TwilioConfig {
        account_sid: "AC000000000001".to_string(),
        auth_token: "token-123456".to_string(),
        phone_number: "+15550001111".to_string(),
    }
}

#[tokio::test]
async fn test_initiate_posts_configured_caller_id() {
    let (base_url, recorded) = spawn_proxy().await;
    let client = TwilioClient::new(base_url, config()).unwrap();

    let initiation = client.initiate_call("+15552223333", Some("follow up")).await;
    assert!(initiation.success);
    assert_eq!(initiation.call_id.as_deref(), Some("twilio-42"));
    assert_eq!(initiation.sid.as_deref(), Some("CA0123456789abc"));

    let bodies = recorded.bodies.lock().unwrap();
    assert_eq!(
        bodies[0],
        json!({ "to": "+15552223333", "from": "+15550001111", "notes": "follow up" })
    );
}

#[tokio::test]
async fn test_end_call_sends_sid() {
    let (base_url, recorded) = spawn_proxy().await;
    let client = TwilioClient::new(format!("{}/", base_url), config()).unwrap();

    let result = client.end_call("CA0123456789abc").await;
    assert!(result.success);
    assert_eq!(result.message.as_deref(), Some("Call ended"));
    assert_eq!(
        recorded.bodies.lock().unwrap()[0],
        json!({ "callSid": "CA0123456789abc" })
    );
}

#[tokio::test]
async fn test_status_reports_and_falls_back_on_error() {
    let (base_url, _) = spawn_proxy().await;
    let client = TwilioClient::new(base_url, config()).unwrap();

    let report = client.call_status("CA0123456789abc").await;
    assert_eq!(report.status, ProviderStatus::Completed);
    assert_eq!(report.duration, Some(42));

    // 404 from the proxy yields the mock in-progress report
    let fallback = client.call_status("CAunknown").await;
    assert!(fallback.success);
    assert_eq!(fallback.status, ProviderStatus::InProgress);
    assert!(fallback.duration.is_some_and(|d| d < 300));
}

#[tokio::test]
async fn test_dial_and_follow_through_proxy() {
    let (base_url, _) = spawn_proxy().await;
    let provider = Arc::new(TwilioClient::new(base_url, config()).unwrap());
    let dialer = Dialer::new(provider, Arc::new(MockDeskBackend::instant()));

    let mut placed = dialer.place_call(" +15552223333 ", None).await.unwrap();
    assert_eq!(placed.to, "+15552223333");
    assert_eq!(placed.phase, CallPhase::Connected);

    let policy = PollPolicy {
        interval: Duration::from_millis(10),
        window: Duration::from_secs(2),
    };
    let outcome = dialer.follow(&mut placed, policy).await;
    assert!(matches!(
        outcome,
        Some(PollOutcome::Settled { status: ProviderStatus::Completed, .. })
    ));
    assert_eq!(placed.phase, CallPhase::Completed);
}

#[tokio::test]
async fn test_status_sid_stays_one_path_segment() {
    let (base_url, recorded) = spawn_proxy().await;
    let client = TwilioClient::new(base_url, config()).unwrap();

    let report = client.call_status("../end").await;
    assert_eq!(report.status, ProviderStatus::InProgress);

    assert_eq!(*recorded.status_sids.lock().unwrap(), vec!["../end".to_string()]);
    assert!(recorded.bodies.lock().unwrap().is_empty());
}
