//! In-process mock of the presensi backend for integration tests.
//!
//! Every request is recorded so tests can assert on exactly what was
//! sent. Responses per endpoint are configurable, and check-in can be
//! held open to observe the workflow mid-flight.

#![allow(dead_code)]

use std::io::Cursor;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use presensi_client::config::ClientConfig;
use presensi_client::context::ClientContext;
use presensi_client::store::MemoryStore;
use presensi_core::user::{Session, UserProfile};
use serde_json::{json, Value};
use tokio::sync::Notify;

/// One multipart part as the server received it.
#[derive(Debug, Clone)]
pub struct ReceivedPart {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl ReceivedPart {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }
}

#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub query: Option<String>,
    pub json: Option<Value>,
    pub parts: Vec<ReceivedPart>,
}

impl ReceivedRequest {
    pub fn part(&self, name: &str) -> Option<&ReceivedPart> {
        self.parts.iter().find(|p| p.name == name)
    }
}

pub struct MockState {
    pub requests: Mutex<Vec<ReceivedRequest>>,
    pub login: Mutex<(u16, Value)>,
    pub register: Mutex<(u16, Value)>,
    pub check_in: Mutex<(u16, Value)>,
    pub check_out: Mutex<(u16, Value)>,
    pub report: Mutex<(u16, Value)>,
    /// Signalled when a check-in request has been fully received.
    pub check_in_arrived: Notify,
    /// When set, check-in responses wait for this before answering.
    pub check_in_gate: Mutex<Option<Arc<Notify>>>,
}

impl MockState {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            login: Mutex::new((
                200,
                json!({
                    "token": "abc123",
                    "user": {"id": 7, "nama": "Budi", "email": "budi@kampus.ac.id", "role": "mahasiswa"}
                }),
            )),
            register: Mutex::new((201, json!({"message": "Registrasi berhasil"}))),
            check_in: Mutex::new((200, json!({"message": "Check-in berhasil"}))),
            check_out: Mutex::new((200, json!({"message": "Check-out berhasil"}))),
            report: Mutex::new((200, json!({"data": sample_records()}))),
            check_in_arrived: Notify::new(),
            check_in_gate: Mutex::new(None),
        })
    }

    pub fn requests_to(&self, path: &str) -> Vec<ReceivedRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn set(&self, slot: &Mutex<(u16, Value)>, status: u16, body: Value) {
        *slot.lock().unwrap() = (status, body);
    }

    fn record(&self, req: ReceivedRequest) {
        self.requests.lock().unwrap().push(req);
    }
}

pub fn sample_records() -> Value {
    json!([
        {
            "id": 1,
            "checkIn": "2024-01-01T01:30:00.000Z",
            "checkOut": "2024-01-01T09:00:00.000Z",
            "latitude": "-6.20000000",
            "longitude": "106.81666600",
            "buktiFoto": "uploads/1.jpg",
            "user": {"nama": "budi", "email": "budi@kampus.ac.id"}
        },
        {
            "id": 2,
            "checkIn": "2024-01-01T02:00:00.000Z",
            "checkOut": null,
            "latitude": null,
            "longitude": null,
            "buktiFoto": null,
            "user": {"nama": "ani", "email": "ani@kampus.ac.id"}
        }
    ])
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn reply(slot: &Mutex<(u16, Value)>) -> (StatusCode, Json<Value>) {
    let (status, body) = slot.lock().unwrap().clone();
    (StatusCode::from_u16(status).unwrap(), Json(body))
}

async fn login(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.record(ReceivedRequest {
        path: "/api/auth/login".into(),
        authorization: header(&headers, "authorization"),
        content_type: header(&headers, "content-type"),
        query: None,
        json: Some(body),
        parts: Vec::new(),
    });
    reply(&state.login)
}

async fn register(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.record(ReceivedRequest {
        path: "/api/auth/register".into(),
        authorization: header(&headers, "authorization"),
        content_type: header(&headers, "content-type"),
        query: None,
        json: Some(body),
        parts: Vec::new(),
    });
    reply(&state.register)
}

async fn check_in(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> (StatusCode, Json<Value>) {
    let mut parts = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.unwrap().to_vec();
        parts.push(ReceivedPart {
            name,
            file_name,
            content_type,
            data,
        });
    }

    state.record(ReceivedRequest {
        path: "/api/presensi/check-in".into(),
        authorization: header(&headers, "authorization"),
        content_type: header(&headers, "content-type"),
        query: None,
        json: None,
        parts,
    });
    state.check_in_arrived.notify_one();

    let gate = state.check_in_gate.lock().unwrap().clone();
    if let Some(gate) = gate {
        gate.notified().await;
    }
    reply(&state.check_in)
}

async fn check_out(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.record(ReceivedRequest {
        path: "/api/presensi/check-out".into(),
        authorization: header(&headers, "authorization"),
        content_type: header(&headers, "content-type"),
        query: None,
        json: Some(body),
        parts: Vec::new(),
    });
    reply(&state.check_out)
}

async fn daily_report(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> (StatusCode, Json<Value>) {
    let filtered = query.is_some();
    state.record(ReceivedRequest {
        path: "/api/reports/daily".into(),
        authorization: header(&headers, "authorization"),
        content_type: header(&headers, "content-type"),
        query,
        json: None,
        parts: Vec::new(),
    });

    let (status, mut body) = state.report.lock().unwrap().clone();
    // Any filter narrows the sample listing to its first row.
    if filtered {
        if let Some(data) = body.get_mut("data").and_then(Value::as_array_mut) {
            data.truncate(1);
        }
    }
    (StatusCode::from_u16(status).unwrap(), Json(body))
}

/// Start the mock backend and return its base URL.
pub async fn spawn_backend(state: Arc<MockState>) -> String {
    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/presensi/check-in", post(check_in))
        .route("/api/presensi/check-out", post(check_out))
        .route("/api/reports/daily", get(daily_report))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Base URL of a port nothing is listening on.
pub async fn unreachable_backend() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// Client context on in-memory storage, not logged in.
pub async fn context(base_url: &str) -> ClientContext {
    let config = ClientConfig {
        api_url: base_url.to_string(),
        ..ClientConfig::default()
    };
    ClientContext::with_store(config, Arc::new(MemoryStore::new()))
        .await
        .unwrap()
}

/// Client context with an active session carrying `token`.
pub async fn logged_in(base_url: &str, token: &str) -> ClientContext {
    let ctx = context(base_url).await;
    ctx.sessions
        .login(Session::new(
            token,
            UserProfile {
                id: Some(7),
                nama: "Budi".into(),
                email: "budi@kampus.ac.id".into(),
                role: "admin".into(),
            },
        ))
        .await
        .unwrap();
    ctx
}

/// Write a small PNG to use as the camera's frame source.
pub fn frame_file(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("frame.png");
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(RgbImage::from_pixel(40, 30, Rgb([10, 200, 90])))
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    std::fs::write(&path, bytes).unwrap();
    path
}
