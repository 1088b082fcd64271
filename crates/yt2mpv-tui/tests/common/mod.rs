#![allow(dead_code)]

//! In-process fake of the mpv queue service, counting hits per route.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{RawQuery, State};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::sync::mpsc;

use yt2mpv_tui::client::ServiceClient;
use yt2mpv_tui::notify::{ChannelNotifier, Notification};

pub struct FakeService {
    health: AtomicU16,
    playlist: Mutex<Value>,
    reply: Mutex<Value>,
    /// Status for the playlist route; 200 serves `playlist`.
    playlist_status: AtomicU16,
    hits: Mutex<HashMap<String, usize>>,
    queries: Mutex<Vec<String>>,
}

impl FakeService {
    fn new() -> Self {
        Self {
            health: AtomicU16::new(204),
            playlist: Mutex::new(json!([])),
            reply: Mutex::new(json!({"error": "success"})),
            playlist_status: AtomicU16::new(200),
            hits: Mutex::new(HashMap::new()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn set_health(&self, status: u16) {
        self.health.store(status, Ordering::SeqCst);
    }

    pub fn set_playlist(&self, playlist: Value) {
        *self.playlist.lock().unwrap() = playlist;
    }

    pub fn set_playlist_status(&self, status: u16) {
        self.playlist_status.store(status, Ordering::SeqCst);
    }

    pub fn set_reply(&self, reply: Value) {
        *self.reply.lock().unwrap() = reply;
    }

    pub fn hits(&self, route: &str) -> usize {
        self.hits.lock().unwrap().get(route).copied().unwrap_or(0)
    }

    pub fn total_hits(&self) -> usize {
        self.hits.lock().unwrap().values().sum()
    }

    /// Raw query strings of the command routes, in arrival order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    fn record(&self, uri: &Uri) {
        *self.hits.lock().unwrap().entry(uri.path().to_string()).or_insert(0) += 1;
    }
}

async fn healthz(State(fake): State<Arc<FakeService>>, uri: Uri) -> StatusCode {
    fake.record(&uri);
    StatusCode::from_u16(fake.health.load(Ordering::SeqCst)).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

async fn playlist(State(fake): State<Arc<FakeService>>, uri: Uri) -> Response {
    fake.record(&uri);
    let status = fake.playlist_status.load(Ordering::SeqCst);
    if status != 200 {
        return StatusCode::from_u16(status)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response();
    }
    Json(fake.playlist.lock().unwrap().clone()).into_response()
}

async fn command(State(fake): State<Arc<FakeService>>, uri: Uri, RawQuery(query): RawQuery) -> Json<Value> {
    fake.record(&uri);
    fake.queries
        .lock()
        .unwrap()
        .push(format!("{}?{}", uri.path(), query.unwrap_or_default()));
    Json(fake.reply.lock().unwrap().clone())
}

/// Serve a fresh fake on an ephemeral port.
pub async fn spawn_fake() -> (String, Arc<FakeService>) {
    let fake = Arc::new(FakeService::new());
    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/playlist", get(playlist))
        .route("/req", get(command))
        .route("/play", get(command))
        .route("/control", get(command))
        .route("/remove", get(command))
        .with_state(Arc::clone(&fake));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), fake)
}

pub fn client(base_url: &str) -> ServiceClient {
    ServiceClient::with_base_url(base_url, Duration::from_secs(5)).unwrap()
}

/// A base URL nothing listens on.
pub async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub fn notifier() -> (ChannelNotifier, mpsc::UnboundedReceiver<Notification>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChannelNotifier::new(tx), rx)
}

/// Two entries, the first one playing.
pub fn two_entries() -> Value {
    json!([
        {"id": 1, "filename": "x.mp4", "title": "", "current": true, "playing": true},
        {"id": 2, "filename": "y.webm", "title": "Y", "thumbnail": "https://i.ytimg.com/vi/y/hq.jpg", "current": false}
    ])
}
