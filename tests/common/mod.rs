//! Shared fixtures: an in-process stand-in for the benefit backend and a
//! session wired to it.

#![allow(dead_code)]

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use benefit_portal::db;
use benefit_portal::i18n::Translations;
use benefit_portal::services::{
    BackendClient, BackendClientConfig, EventBus, LocalStorage, UiEvent,
};
use benefit_portal::Session;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::sync::mpsc;

/// Requests the stand-in backend has seen.
#[derive(Debug, Default)]
pub struct Recorded {
    pub list_queries: Vec<HashMap<String, String>>,
    pub user_queries: Vec<HashMap<String, String>>,
    pub batch_requests: Vec<(String, Value, Option<String>)>,
    pub saved_applications: Vec<(Option<String>, Value, Option<String>)>,
    pub deleted_applications: Vec<(String, Option<String>)>,
}

#[derive(Debug)]
pub struct BackendState {
    pub recorded: Mutex<Recorded>,
    pub list_status: Mutex<StatusCode>,
    pub user_status: Mutex<StatusCode>,
    pub terms_needed: AtomicBool,
}

impl Default for BackendState {
    fn default() -> Self {
        Self {
            recorded: Mutex::new(Recorded::default()),
            list_status: Mutex::new(StatusCode::OK),
            user_status: Mutex::new(StatusCode::OK),
            terms_needed: AtomicBool::new(false),
        }
    }
}

impl BackendState {
    pub fn fail_list_with(&self, status: StatusCode) {
        *self.list_status.lock().unwrap() = status;
    }

    pub fn fail_user_with(&self, status: StatusCode) {
        *self.user_status.lock().unwrap() = status;
    }

    pub fn list_requests(&self) -> usize {
        self.recorded.lock().unwrap().list_queries.len()
    }
}

pub fn applications_fixture() -> Vec<Value> {
    vec![
        json!({
            "id": "app-draft",
            "status": "draft",
            "employee": { "first_name": "Aino", "last_name": "Virtanen" },
            "application_number": 101,
            "modified_at": "2024-03-04T08:30:00+02:00",
            "unread_messages_count": 0
        }),
        json!({
            "id": "app-info",
            "status": "additional_information_needed",
            "employee": { "first_name": "Eero", "last_name": "Korhonen" },
            "application_number": 102,
            "submitted_at": "2024-02-20T12:00:00+02:00",
            "modified_at": "2024-02-28T09:00:00+02:00",
            "additional_information_needed_by": "2024-03-15",
            "unread_messages_count": 2
        }),
        json!({
            "id": "app-received",
            "status": "received",
            "employee": { "first_name": "", "last_name": "" },
            "application_number": 103,
            "submitted_at": "2024-01-10T10:00:00+02:00",
            "modified_at": "2024-01-10T10:00:00+02:00",
            "batch": { "id": "batch-1", "status": "awaiting_ahjo_decision" }
        }),
    ]
}

fn csrf(headers: &HeaderMap) -> Option<String> {
    headers
        .get("X-CSRFToken")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn list_applications(
    State(state): State<Arc<BackendState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let statuses: Vec<String> = params
        .get("status")
        .map(|s| s.split(',').map(str::to_string).collect())
        .unwrap_or_default();
    state.recorded.lock().unwrap().list_queries.push(params);

    let status = *state.list_status.lock().unwrap();
    if status != StatusCode::OK {
        return (status, Json(json!({ "detail": "List is unavailable" }))).into_response();
    }

    let list: Vec<Value> = applications_fixture()
        .into_iter()
        .filter(|app| statuses.iter().any(|s| app["status"] == s.as_str()))
        .collect();
    Json(list).into_response()
}

async fn current_user(
    State(state): State<Arc<BackendState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.recorded.lock().unwrap().user_queries.push(params);

    let status = *state.user_status.lock().unwrap();
    if status != StatusCode::OK {
        return (status, Json(json!({ "detail": "Not authenticated" }))).into_response();
    }

    Json(json!({
        "id": "user-1",
        "first_name": "Maija",
        "last_name": "Mallikas",
        "csrf_token": "csrf-from-backend",
        "terms_of_service_approval_needed": state.terms_needed.load(Ordering::SeqCst)
    }))
    .into_response()
}

async fn change_batch_status(
    State(state): State<Arc<BackendState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state
        .recorded
        .lock()
        .unwrap()
        .batch_requests
        .push((id.clone(), body.clone(), csrf(&headers)));

    match id.as_str() {
        "batch-ok" => Json(json!({
            "id": id,
            "status": body["status"],
            "previousStatus": "awaiting_ahjo_decision",
            "decision": "accepted"
        }))
        .into_response(),
        "batch-rejected" => (
            StatusCode::NOT_ACCEPTABLE,
            Json(json!({ "errorKey": "batchInvalidDecisionDate" })),
        )
            .into_response(),
        "batch-bad-request" => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "errorKey": "batchInvalidDecisionDate" })),
        )
            .into_response(),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": "Internal server error" })),
        )
            .into_response(),
    }
}

async fn create_application(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    state
        .recorded
        .lock()
        .unwrap()
        .saved_applications
        .push((None, body.clone(), csrf(&headers)));

    let mut created = body;
    created["id"] = json!("app-new");
    Json(created)
}

async fn get_application(Path(id): Path<String>) -> Json<Value> {
    Json(json!({
        "id": id,
        "status": "draft",
        "application_step": "step_2",
        "company_contact_person_first_name": "Maija",
        "employee": { "first_name": "Aino", "last_name": "Virtanen" }
    }))
}

async fn update_application(
    State(state): State<Arc<BackendState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    state
        .recorded
        .lock()
        .unwrap()
        .saved_applications
        .push((Some(id), body.clone(), csrf(&headers)));
    Json(body)
}

async fn delete_application(
    State(state): State<Arc<BackendState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> StatusCode {
    state
        .recorded
        .lock()
        .unwrap()
        .deleted_applications
        .push((id, csrf(&headers)));
    StatusCode::NO_CONTENT
}

/// Start the stand-in backend on a random local port.
pub async fn start_backend() -> (String, Arc<BackendState>) {
    let state = Arc::new(BackendState::default());

    let app = Router::new()
        .route("/v1/applications/simplified/", get(list_applications))
        .route("/v1/applications/", post(create_application))
        .route(
            "/v1/applications/{id}/",
            get(get_application)
                .put(update_application)
                .delete(delete_application),
        )
        .route("/v1/users/me/", get(current_user))
        .route(
            "/v1/handlerapplicationbatches/{id}/status/",
            patch(change_batch_status),
        )
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), state)
}

/// A session against the stand-in backend, with storage in a temp dir.
///
/// Translations are empty, so every text is its translation key.
pub struct TestPortal {
    pub session: Arc<Session>,
    pub events: mpsc::UnboundedReceiver<UiEvent>,
    pub backend: Arc<BackendState>,
    pub base_url: String,
    _dir: TempDir,
}

impl TestPortal {
    pub async fn start() -> Self {
        let (base_url, backend) = start_backend().await;
        let dir = tempfile::tempdir().unwrap();
        let pool = db::initialize(&db::get_db_path(dir.path())).await.unwrap();

        let client = BackendClient::new(BackendClientConfig {
            base_url: base_url.clone(),
            timeout_secs: 5,
            locale: "fi".to_string(),
        })
        .unwrap();
        let (bus, events) = EventBus::channel();
        let session = Session::new(client, LocalStorage::new(pool), Translations::new("fi"), bus);

        Self {
            session: Arc::new(session),
            events,
            backend,
            base_url,
            _dir: dir,
        }
    }

    pub fn drain_events(&mut self) -> Vec<UiEvent> {
        benefit_portal::services::events::drain(&mut self.events)
    }
}

pub fn statuses(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}
