//! In-process mock of the Sitebook REST API.
//!
//! Serves a small in-memory store on an ephemeral port so integration tests
//! exercise the real HTTP path: URL joining, bearer headers, response
//! envelopes and error bodies. Collections answer in different envelope
//! shapes on purpose:
//!
//! - `labour`: `{ "success": true, "data": [..] }`
//! - `transactions`: `{ "success": true, "count": n, "transactions": [..] }`
//! - everything else: a bare array
//!
//! A request carrying `Bearer expired` gets a 401. `GET /api/slow` answers
//! only after [`SLOW_RESPONSE`].

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::header::{AUTHORIZATION, CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use sitebook_client::{ApiClient, ClientConfig};

/// Password accepted by the mock auth endpoints.
pub const PASSWORD: &str = "secret";

/// Token issued by `POST /auth/login`.
pub const ISSUED_TOKEN: &str = "tok-issued";

/// Delay before `GET /api/slow` answers.
pub const SLOW_RESPONSE: Duration = Duration::from_secs(3);

#[derive(Debug, Default)]
pub struct MockState {
    pub collections: HashMap<String, Vec<Value>>,
    /// `Authorization` header of every request, in arrival order.
    pub auth_headers: Vec<Option<String>>,
    /// When set, every create answers 400 with this message.
    pub reject_creates: Option<String>,
    /// Body of the last bulk attendance submission.
    pub last_bulk: Option<Value>,
    next_id: u32,
}

impl MockState {
    pub fn seed(&mut self, collection: &str, records: Vec<Value>) {
        self.collections.insert(collection.to_string(), records);
    }

    pub fn request_count(&self) -> usize {
        self.auth_headers.len()
    }
}

type Shared = Arc<Mutex<MockState>>;

pub struct MockBackend {
    pub base_url: String,
    pub state: Shared,
}

impl MockBackend {
    /// A client pointed at this backend, optionally already signed in.
    pub fn client(&self, token: Option<&str>) -> ApiClient {
        let mut config = ClientConfig::new(self.base_url.clone());
        config.token = token.map(str::to_string);
        ApiClient::new(&config).expect("client builds")
    }

    /// A signed-in client that gives up after `secs` seconds.
    pub fn client_with_timeout(&self, secs: u64) -> ApiClient {
        let mut config = ClientConfig::new(self.base_url.clone());
        config.token = Some(ISSUED_TOKEN.to_string());
        config.request_timeout_secs = secs;
        ApiClient::new(&config).expect("client builds")
    }

    pub fn state(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }
}

/// Start the mock API on `127.0.0.1:0` and return its base URL.
pub async fn spawn() -> MockBackend {
    let state: Shared = Arc::new(Mutex::new(MockState::default()));
    let app = router(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock server");
    });

    MockBackend {
        base_url: format!("http://{addr}/api"),
        state,
    }
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/verify-password", post(verify_password))
        .route("/api/attendance/bulk", post(bulk_attendance))
        .route(
            "/api/attendance/stats/site-percentages",
            get(site_percentages),
        )
        .route("/api/labour/salaries/all", get(all_salaries))
        .route("/api/labour/salaries/{id}", get(salaries_for))
        .route("/api/reports/{name}", get(download_report))
        .route("/api/slow", get(slow))
        .route("/api/{collection}", get(list).post(create))
        .route(
            "/api/{collection}/{id}",
            get(get_one).put(update).delete(remove),
        )
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn check_auth(state: &Shared, headers: &HeaderMap) -> Result<(), Response> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let expired = header.as_deref() == Some("Bearer expired");
    state.lock().unwrap().auth_headers.push(header);
    if expired {
        return Err(error(StatusCode::UNAUTHORIZED, "Token expired"));
    }
    Ok(())
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "message": message }))).into_response()
}

fn wrap_list(collection: &str, records: Vec<Value>) -> Value {
    match collection {
        "labour" => json!({ "success": true, "data": records }),
        "transactions" => {
            json!({ "success": true, "count": records.len(), "transactions": records })
        }
        _ => Value::Array(records),
    }
}

fn find(records: &[Value], id: &str) -> Option<usize> {
    records.iter().position(|r| r["_id"] == id)
}

// ---------------------------------------------------------------------------
// Generic collection handlers
// ---------------------------------------------------------------------------

async fn list(
    State(state): State<Shared>,
    Path(collection): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(r) = check_auth(&state, &headers) {
        return r;
    }
    let records = state
        .lock()
        .unwrap()
        .collections
        .get(&collection)
        .cloned()
        .unwrap_or_default();
    Json(wrap_list(&collection, records)).into_response()
}

async fn create(
    State(state): State<Shared>,
    Path(collection): Path<String>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    if let Err(r) = check_auth(&state, &headers) {
        return r;
    }
    let mut s = state.lock().unwrap();
    if let Some(message) = s.reject_creates.clone() {
        return error(StatusCode::BAD_REQUEST, &message);
    }
    s.next_id += 1;
    body["_id"] = json!(format!("{collection}-{}", s.next_id));
    s.collections
        .entry(collection)
        .or_default()
        .push(body.clone());
    (StatusCode::CREATED, Json(json!({ "success": true, "data": body }))).into_response()
}

async fn get_one(
    State(state): State<Shared>,
    Path((collection, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    if let Err(r) = check_auth(&state, &headers) {
        return r;
    }
    let s = state.lock().unwrap();
    let records = s.collections.get(&collection).map(Vec::as_slice).unwrap_or(&[]);
    match find(records, &id) {
        Some(i) if collection == "labour" => Json(json!({ "data": records[i] })).into_response(),
        Some(i) => Json(records[i].clone()).into_response(),
        None => error(StatusCode::NOT_FOUND, &format!("{collection} {id} not found")),
    }
}

async fn update(
    State(state): State<Shared>,
    Path((collection, id)): Path<(String, String)>,
    headers: HeaderMap,
    Json(patch): Json<Value>,
) -> Response {
    if let Err(r) = check_auth(&state, &headers) {
        return r;
    }
    let mut s = state.lock().unwrap();
    let records = s.collections.entry(collection.clone()).or_default();
    let Some(i) = find(records, &id) else {
        return error(StatusCode::NOT_FOUND, &format!("{collection} {id} not found"));
    };
    if let (Some(record), Some(fields)) = (records[i].as_object_mut(), patch.as_object()) {
        for (key, value) in fields {
            record.insert(key.clone(), value.clone());
        }
    }
    Json(json!({ "success": true, "data": records[i] })).into_response()
}

async fn remove(
    State(state): State<Shared>,
    Path((collection, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    if let Err(r) = check_auth(&state, &headers) {
        return r;
    }
    let mut s = state.lock().unwrap();
    let records = s.collections.entry(collection.clone()).or_default();
    match find(records, &id) {
        Some(i) => {
            records.remove(i);
            Json(json!({ "success": true, "message": "Deleted" })).into_response()
        }
        None => error(StatusCode::NOT_FOUND, &format!("{collection} {id} not found")),
    }
}

// ---------------------------------------------------------------------------
// Resource-specific handlers
// ---------------------------------------------------------------------------

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    state.lock().unwrap().auth_headers.push(None);
    if body["password"] != PASSWORD {
        return error(StatusCode::UNAUTHORIZED, "Invalid credentials");
    }
    Json(json!({
        "success": true,
        "token": ISSUED_TOKEN,
        "user": {
            "_id": "user-1",
            "name": "Asha Rao",
            "email": body["email"],
            "role": "Manager"
        }
    }))
    .into_response()
}

async fn verify_password(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(r) = check_auth(&state, &headers) {
        return r;
    }
    if body["password"] == "locked" {
        return error(StatusCode::UNAUTHORIZED, "Too many attempts");
    }
    Json(json!({ "valid": body["password"] == PASSWORD })).into_response()
}

async fn bulk_attendance(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(r) = check_auth(&state, &headers) {
        return r;
    }
    let count = body["records"].as_array().map_or(0, Vec::len);
    state.lock().unwrap().last_bulk = Some(body);
    (StatusCode::CREATED, Json(json!({ "success": true, "count": count }))).into_response()
}

async fn site_percentages(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(r) = check_auth(&state, &headers) {
        return r;
    }
    Json(json!({
        "success": true,
        "data": [
            { "_id": "proj-1", "siteName": "Riverside Tower", "percentage": 87.5, "present": 7, "total": 8 },
            { "_id": "proj-2", "siteName": "Hill Villas", "percentage": 50.0 }
        ]
    }))
    .into_response()
}

async fn all_salaries(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(r) = check_auth(&state, &headers) {
        return r;
    }
    let records = state
        .lock()
        .unwrap()
        .collections
        .get("salary")
        .cloned()
        .unwrap_or_default();
    Json(json!({ "salaries": records })).into_response()
}

async fn salaries_for(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(r) = check_auth(&state, &headers) {
        return r;
    }
    let records: Vec<Value> = state
        .lock()
        .unwrap()
        .collections
        .get("salary")
        .map(|all| all.iter().filter(|s| s["labour"] == id).cloned().collect())
        .unwrap_or_default();
    Json(json!({ "data": records })).into_response()
}

async fn download_report(
    State(state): State<Shared>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(r) = check_auth(&state, &headers) {
        return r;
    }
    (
        [
            (CONTENT_TYPE, "text/csv".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{name}.csv\""),
            ),
        ],
        "name,days\nRavi Kumar,22\n",
    )
        .into_response()
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(SLOW_RESPONSE).await;
    Json(json!([]))
}
