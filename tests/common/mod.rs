// tests/common/mod.rs

#![allow(dead_code)]

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use study_compass::app::AppContext;
use study_compass::config::Config;
use study_compass::identity::{IdentityProvider, StaticIdentityProvider};

/// One scripted endpoint response.
pub struct Scripted {
    pub status: u16,
    pub body: Value,
}

impl Scripted {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    pub fn error(status: u16, message: &str) -> Self {
        Self {
            status,
            body: json!({ "error": message }),
        }
    }
}

/// Scriptable in-process stand-in for the recommendation backend.
/// Each endpoint serves whatever is scripted and counts its calls.
pub struct MockState {
    pub questionnaire: Mutex<Scripted>,
    pub user_status: Mutex<Scripted>,
    pub access: Mutex<Scripted>,
    pub ad: Mutex<Scripted>,
    pub ad_complete: Mutex<Scripted>,
    pub recommendations: Mutex<Scripted>,
    pub pricing: Mutex<Scripted>,

    pub status_calls: AtomicUsize,
    pub access_calls: AtomicUsize,
    pub ad_calls: AtomicUsize,
    pub complete_calls: AtomicUsize,
    pub recommendation_calls: AtomicUsize,

    /// guest_token values received by /ad-complete/.
    pub completed_tokens: Mutex<Vec<Value>>,
    /// Authorization header of the most recent request, if any.
    pub last_authorization: Mutex<Option<String>>,
}

impl MockState {
    fn new() -> Self {
        Self {
            questionnaire: Mutex::new(Scripted::ok(default_questionnaire())),
            user_status: Mutex::new(Scripted::ok(guest_status(1, Some("guest-token-1")))),
            access: Mutex::new(Scripted::ok(json!({ "access": "granted" }))),
            ad: Mutex::new(Scripted::ok(default_ad(5))),
            ad_complete: Mutex::new(Scripted::ok(json!({ "status": "completed" }))),
            recommendations: Mutex::new(Scripted::ok(germany_recommendations())),
            pricing: Mutex::new(Scripted::ok(default_pricing())),
            status_calls: AtomicUsize::new(0),
            access_calls: AtomicUsize::new(0),
            ad_calls: AtomicUsize::new(0),
            complete_calls: AtomicUsize::new(0),
            recommendation_calls: AtomicUsize::new(0),
            completed_tokens: Mutex::new(Vec::new()),
            last_authorization: Mutex::new(None),
        }
    }
}

pub struct MockBackend {
    pub address: String,
    pub state: Arc<MockState>,
}

/// Spawns the mock backend on a random port, mirroring the questionnaire
/// API surface the client consumes.
pub async fn spawn_mock_backend() -> MockBackend {
    let state = Arc::new(MockState::new());

    let app = Router::new()
        .route("/api/questionnaire/", get(get_questionnaire))
        .route("/api/user-status/", get(get_user_status))
        .route("/api/check-access/", post(post_check_access))
        .route("/api/ad/", get(get_ad))
        .route("/api/ad-complete/", post(post_ad_complete))
        .route("/api/recommendations/", post(post_recommendations))
        .route("/api/pricing/", get(get_pricing))
        .with_state(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockBackend {
        address: format!("http://127.0.0.1:{}", port),
        state,
    }
}

fn record_auth(state: &MockState, headers: &HeaderMap) {
    *state.last_authorization.lock().unwrap() = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
}

fn respond(script: &Mutex<Scripted>) -> (StatusCode, Json<Value>) {
    let script = script.lock().unwrap();
    (
        StatusCode::from_u16(script.status).unwrap(),
        Json(script.body.clone()),
    )
}

async fn get_questionnaire(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    record_auth(&state, &headers);
    respond(&state.questionnaire)
}

async fn get_user_status(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.status_calls.fetch_add(1, Ordering::SeqCst);
    record_auth(&state, &headers);
    respond(&state.user_status)
}

async fn post_check_access(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(_body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.access_calls.fetch_add(1, Ordering::SeqCst);
    record_auth(&state, &headers);
    respond(&state.access)
}

async fn get_ad(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.ad_calls.fetch_add(1, Ordering::SeqCst);
    record_auth(&state, &headers);
    respond(&state.ad)
}

async fn post_ad_complete(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.complete_calls.fetch_add(1, Ordering::SeqCst);
    record_auth(&state, &headers);
    state
        .completed_tokens
        .lock()
        .unwrap()
        .push(body.get("guest_token").cloned().unwrap_or(Value::Null));
    respond(&state.ad_complete)
}

/// Serves the scripted payload and, on success, applies the server-side
/// entitlement decrement to the user-status script (free attempt first,
/// credits otherwise), so a subsequent refresh observes the consumption.
async fn post_recommendations(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(_body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.recommendation_calls.fetch_add(1, Ordering::SeqCst);
    record_auth(&state, &headers);
    let response = respond(&state.recommendations);

    if response.0 == StatusCode::OK {
        let mut status = state.user_status.lock().unwrap();
        if let Some(n) = status.body.get("free_attempts_remaining").and_then(Value::as_u64) {
            status.body["free_attempts_remaining"] = json!(n.saturating_sub(1));
        } else if let Some(c) = status.body.get("credits").and_then(Value::as_u64) {
            status.body["credits"] = json!(c.saturating_sub(1));
        }
    }
    response
}

async fn get_pricing(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    record_auth(&state, &headers);
    respond(&state.pricing)
}

// ---- canned payloads ----

pub fn default_questionnaire() -> Value {
    json!({
        "steps": [
            {
                "step_number": 1,
                "title": "Destination",
                "description": "Where do you want to study?",
                "questions": [
                    {
                        "question_key": "destination_country",
                        "question_text": "Preferred destination country",
                        "question_type": "select",
                        "is_required": true,
                        "placeholder": "",
                        "help_text": "",
                        "options": [
                            { "value": "DE", "label": "Germany" },
                            { "value": "NL", "label": "Netherlands" }
                        ]
                    },
                    {
                        "question_key": "budget",
                        "question_text": "Yearly budget (EUR)",
                        "question_type": "number",
                        "is_required": true,
                        "placeholder": "20000",
                        "help_text": "",
                        "options": []
                    }
                ]
            }
        ]
    })
}

pub fn guest_status(free_attempts: u32, guest_token: Option<&str>) -> Value {
    let mut status = json!({
        "user_type": "guest",
        "free_attempts_remaining": free_attempts,
    });
    if let Some(token) = guest_token {
        status["guest_token"] = json!(token);
    }
    status
}

pub fn authenticated_status(email: &str, credits: u32) -> Value {
    json!({
        "user_type": "authenticated",
        "email": email,
        "credits": credits,
    })
}

pub fn default_ad(display_seconds: u32) -> Value {
    json!({
        "id": 7,
        "headline": "Learn German in 3 months",
        "image_url": "https://ads.example.com/german.png",
        "cta_text": "Enroll now",
        "cta_url": "https://ads.example.com/enroll",
        "display_seconds": display_seconds,
    })
}

pub fn germany_recommendations() -> Value {
    json!({
        "countries": [
            {
                "name": "Germany",
                "reason": "Low tuition and strong engineering programs",
                "universities": [
                    {
                        "name": "TU Munich",
                        "program": "M.Sc. Computer Science",
                        "tuition": 300.0,
                        "scholarship": true,
                        "reasoning": ["Fits your budget", "English-taught program"]
                    }
                ]
            }
        ]
    })
}

pub fn default_pricing() -> Value {
    json!([
        { "id": 1, "name": "Starter", "credits": 1, "price": "$5", "description": "One recommendation run" },
        { "id": 2, "name": "Explorer", "credits": 5, "price": "$20", "description": "Five recommendation runs" }
    ])
}

// ---- context helpers ----

pub fn temp_state_dir() -> PathBuf {
    std::env::temp_dir().join(format!("study-compass-test-{}", uuid::Uuid::new_v4()))
}

pub fn test_config(address: &str) -> Config {
    Config {
        api_base_url: address.parse().expect("mock address must be a valid URL"),
        state_dir: temp_state_dir(),
        rust_log: "error".to_string(),
    }
}

/// App context wired against the mock backend with nobody signed in.
pub fn test_context(mock: &MockBackend) -> AppContext {
    test_context_with_provider(mock, Arc::new(StaticIdentityProvider::anonymous()))
}

pub fn test_context_with_provider(
    mock: &MockBackend,
    provider: Arc<dyn IdentityProvider>,
) -> AppContext {
    AppContext::new(test_config(&mock.address), provider).expect("failed to build app context")
}
