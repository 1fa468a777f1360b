use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use rinsr_console::api::RinsrClient;
use rinsr_console::config::ApiConfig;

/// Scriptable stand-in for the RINSR backend.
#[derive(Default)]
pub struct BackendState {
    /// Identity endpoint body; `None` answers 401.
    pub principal: Mutex<Option<Value>>,
    /// Per-role pages; `None` answers 500 (the fail-closed case).
    pub role_pages: Mutex<Option<Vec<String>>>,
    pub notifications: Mutex<Vec<Value>>,
    pub fail_notification_list: Mutex<bool>,
    /// Read mutations for these ids answer 500.
    pub fail_read_ids: Mutex<HashSet<String>>,
    /// Ids the backend has actually marked read.
    pub read_ids: Mutex<Vec<String>>,
}

pub struct MockBackend {
    pub base_url: String,
    pub state: Arc<BackendState>,
}

pub async fn spawn_backend() -> Result<MockBackend> {
    let state = Arc::new(BackendState::default());

    let app = Router::new()
        .route("/api/auth/me", get(me))
        .route("/api/permissions/:role", get(permissions))
        .route("/api/notifications", get(notifications))
        .route("/api/notifications/:id/read", put(mark_read))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr: SocketAddr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(MockBackend { base_url: format!("http://{}", addr), state })
}

pub fn client_for(backend: &MockBackend) -> RinsrClient {
    RinsrClient::new(&ApiConfig {
        base_url: backend.base_url.clone(),
        token: Some("test-token".to_string()),
        request_timeout_secs: 5,
        notification_limit: 50,
    })
    .expect("client construction")
}

pub fn principal_json(role: &str, allowed_pages: &[&str], hub_id: Option<&str>) -> Value {
    json!({
        "id": "admin-1",
        "name": "Ops Admin",
        "email": "ops@rinsr.example",
        "role": role,
        "allowedPages": allowed_pages,
        "hubId": hub_id,
    })
}

pub fn notification_json(
    id: &str,
    order_id: Option<&str>,
    status: &str,
    kind: &str,
    created_at: &str,
) -> Value {
    json!({
        "id": id,
        "title": format!("notification {}", id),
        "body": "",
        "orderId": order_id,
        "status": status,
        "type": kind,
        "createdAt": created_at,
    })
}

async fn me(State(state): State<Arc<BackendState>>) -> (StatusCode, Json<Value>) {
    match state.principal.lock().unwrap().clone() {
        Some(principal) => (StatusCode::OK, Json(principal)),
        None => (StatusCode::UNAUTHORIZED, Json(json!({ "error": "unauthenticated" }))),
    }
}

async fn permissions(
    State(state): State<Arc<BackendState>>,
    Path(_role): Path<String>,
) -> (StatusCode, Json<Value>) {
    match state.role_pages.lock().unwrap().clone() {
        Some(pages) => (StatusCode::OK, Json(json!({ "pages": pages }))),
        None => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "permission store down" }))),
    }
}

async fn notifications(State(state): State<Arc<BackendState>>) -> (StatusCode, Json<Value>) {
    if *state.fail_notification_list.lock().unwrap() {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "list unavailable" })));
    }
    let list = state.notifications.lock().unwrap().clone();
    (StatusCode::OK, Json(json!({ "notifications": list })))
}

async fn mark_read(State(state): State<Arc<BackendState>>, Path(id): Path<String>) -> StatusCode {
    if state.fail_read_ids.lock().unwrap().contains(&id) {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    state.read_ids.lock().unwrap().push(id);
    StatusCode::OK
}
