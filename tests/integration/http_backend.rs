//! Integration tests for the HTTP backend against an in-process fake API.
//!
//! Covers the REST contract end to end:
//! - request paths, methods and body shapes
//! - bearer token on every request
//! - `{ data: ... }` envelopes
//! - error bodies fanned out into one notification per message
//! - a full drag-and-drop round trip through `TaskBoard`

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use parking_lot::Mutex;
use serde_json::{Value, json};

use taskboard::api::http::{HttpBackend, HttpConfig};
use taskboard::api::{ApiError, Backend};
use taskboard::board::{DropTarget, Settlement, TaskBoard, project_owner};
use taskboard::notify::{NotificationLevel, NotificationLog};
use taskboard_proto::task::{CreateTaskRequest, TaskId, TaskStatus};

// =============================================================================
// Fake API
// =============================================================================

/// A request as seen by the fake API.
#[derive(Debug, Clone)]
struct Recorded {
    method: &'static str,
    path: String,
    authorization: Option<String>,
    body: Option<Value>,
}

#[derive(Default)]
struct FakeState {
    tasks: Vec<Value>,
    requests: Vec<Recorded>,
    /// Status and body returned by the next `PUT .../status`.
    reject_status: Option<(StatusCode, Value)>,
    /// Status and body returned by every `POST /task`.
    reject_create: Option<(StatusCode, Value)>,
    next_id: u32,
}

type Shared = Arc<Mutex<FakeState>>;

fn record(
    state: &Shared,
    method: &'static str,
    path: String,
    headers: &HeaderMap,
    body: Option<Value>,
) {
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.lock().requests.push(Recorded {
        method,
        path,
        authorization,
        body,
    });
}

async fn list_tasks(
    State(state): State<Shared>,
    Path(project_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    record(
        &state,
        "GET",
        format!("/api/task/project/{project_id}"),
        &headers,
        None,
    );
    let tasks: Vec<Value> = state
        .lock()
        .tasks
        .iter()
        .filter(|t| t["projectId"] == project_id)
        .cloned()
        .collect();
    Json(json!({ "data": tasks })).into_response()
}

async fn update_status(
    State(state): State<Shared>,
    Path(task_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record(
        &state,
        "PUT",
        format!("/api/task/{task_id}/status"),
        &headers,
        Some(body.clone()),
    );
    let mut state = state.lock();
    if let Some((status, error)) = state.reject_status.take() {
        return (status, Json(error)).into_response();
    }
    match state.tasks.iter_mut().find(|t| t["id"] == task_id) {
        Some(task) => {
            task["status"] = body["status"].clone();
            Json(task.clone()).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Task not found" })),
        )
            .into_response(),
    }
}

async fn create_task(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record(&state, "POST", "/api/task".to_string(), &headers, Some(body.clone()));
    let mut state = state.lock();
    if let Some((status, error)) = state.reject_create.clone() {
        return (status, Json(error)).into_response();
    }
    state.next_id += 1;
    let task = json!({
        "id": format!("new-{}", state.next_id),
        "title": body["title"],
        "description": body["description"],
        "status": "todo",
        "assigneeEmail": null,
        "projectId": body["projectId"],
    });
    state.tasks.push(task.clone());
    (StatusCode::CREATED, Json(task)).into_response()
}

async fn get_project(
    State(state): State<Shared>,
    Path(project_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    record(
        &state,
        "GET",
        format!("/api/project/{project_id}"),
        &headers,
        None,
    );
    if project_id != "p-1" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Project not found" })),
        )
            .into_response();
    }
    Json(json!({
        "data": {
            "id": "p-1",
            "name": "Launch",
            "ownerId": "u-owner",
            "owner": { "email": "owner@example.com" },
            "members": []
        }
    }))
    .into_response()
}

fn seed_task(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "title": format!("Task {id}"),
        "description": "",
        "status": status,
        "assigneeEmail": null,
        "projectId": "p-1",
    })
}

/// Starts the fake API on an ephemeral port; returns its base URL.
async fn start_fake_api(tasks: Vec<Value>) -> (String, Shared) {
    let state: Shared = Arc::new(Mutex::new(FakeState {
        tasks,
        ..FakeState::default()
    }));
    let app = Router::new()
        .route("/api/task/project/{project_id}", get(list_tasks))
        .route("/api/task/{task_id}/status", put(update_status))
        .route("/api/task", post(create_task))
        .route("/api/project/{project_id}", get(get_project))
        .with_state(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/api"), state)
}

fn backend(base_url: &str, token: Option<&str>) -> HttpBackend {
    HttpBackend::new(&HttpConfig {
        base_url: base_url.to_string(),
        token: token.map(str::to_string),
        ..HttpConfig::default()
    })
    .unwrap()
}

// =============================================================================
// Contract
// =============================================================================

#[tokio::test]
async fn fetch_tasks_unwraps_data_envelope() {
    let (url, state) = start_fake_api(vec![seed_task("1", "todo"), seed_task("2", "done")]).await;
    let tasks = backend(&url, None).fetch_tasks("p-1").await.unwrap();

    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[1].status, TaskStatus::Done);
    let requests = state.lock().requests.clone();
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/api/task/project/p-1");
}

#[tokio::test]
async fn bearer_token_sent_on_every_request() {
    let (url, state) = start_fake_api(vec![seed_task("1", "todo")]).await;
    let api = backend(&url, Some("tok-123"));

    api.fetch_tasks("p-1").await.unwrap();
    api.update_status(&TaskId::new("1"), TaskStatus::Done)
        .await
        .unwrap();
    api.fetch_project("p-1").await.unwrap();

    let requests = state.lock().requests.clone();
    assert_eq!(requests.len(), 3);
    assert!(
        requests
            .iter()
            .all(|r| r.authorization.as_deref() == Some("Bearer tok-123"))
    );
}

#[tokio::test]
async fn no_token_means_no_authorization_header() {
    let (url, state) = start_fake_api(Vec::new()).await;
    backend(&url, None).fetch_tasks("p-1").await.unwrap();
    assert!(state.lock().requests[0].authorization.is_none());
}

#[tokio::test]
async fn update_status_puts_wire_status() {
    let (url, state) = start_fake_api(vec![seed_task("1", "todo")]).await;
    backend(&url, None)
        .update_status(&TaskId::new("1"), TaskStatus::InProgress)
        .await
        .unwrap();

    let request = state.lock().requests[0].clone();
    assert_eq!(request.method, "PUT");
    assert_eq!(request.path, "/api/task/1/status");
    assert_eq!(request.body, Some(json!({ "status": "in_progress" })));
}

#[tokio::test]
async fn create_task_posts_camel_case_body() {
    let (url, state) = start_fake_api(Vec::new()).await;
    let created = backend(&url, None)
        .create_task(&CreateTaskRequest {
            title: "Ship it".to_string(),
            description: "today".to_string(),
            project_id: "p-1".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(created.title, "Ship it");
    assert_eq!(created.status, TaskStatus::Todo);
    let request = state.lock().requests[0].clone();
    assert_eq!(request.path, "/api/task");
    assert_eq!(
        request.body,
        Some(json!({ "title": "Ship it", "description": "today", "projectId": "p-1" }))
    );
}

#[tokio::test]
async fn project_owner_reads_owner_id() {
    let (url, _state) = start_fake_api(Vec::new()).await;
    let api = backend(&url, None);
    assert_eq!(project_owner(&api, "p-1").await.unwrap(), "u-owner");

    let err = project_owner(&api, "p-404").await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Status {
            status: 404,
            messages: vec!["Project not found".to_string()],
        }
    );
}

#[tokio::test]
async fn errors_array_yields_one_message_each() {
    let (url, state) = start_fake_api(vec![seed_task("1", "todo")]).await;
    state.lock().reject_status = Some((
        StatusCode::UNPROCESSABLE_ENTITY,
        json!({ "errors": [{ "message": "status is invalid" }, { "message": "task is locked" }] }),
    ));

    let err = backend(&url, None)
        .update_status(&TaskId::new("1"), TaskStatus::Done)
        .await
        .unwrap_err();
    assert_eq!(
        err.messages(),
        vec!["status is invalid".to_string(), "task is locked".to_string()]
    );
}

#[tokio::test]
async fn unrecognised_error_body_falls_back() {
    let (url, state) = start_fake_api(vec![seed_task("1", "todo")]).await;
    state.lock().reject_status = Some((StatusCode::INTERNAL_SERVER_ERROR, json!("boom")));

    let err = backend(&url, None)
        .update_status(&TaskId::new("1"), TaskStatus::Done)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 500, .. }));
    assert_eq!(err.messages(), vec!["Something went wrong".to_string()]);
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = backend(&format!("http://{addr}/api"), None)
        .fetch_tasks("p-1")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

// =============================================================================
// Board over HTTP
// =============================================================================

fn http_board(
    url: &str,
) -> (
    TaskBoard<HttpBackend, NotificationLog>,
    Arc<NotificationLog>,
) {
    let log = Arc::new(NotificationLog::default());
    let board = TaskBoard::new("p-1", Arc::new(backend(url, Some("tok"))), Arc::clone(&log))
        .with_identity(Some("u-owner".to_string()), Some("u-owner".to_string()));
    (board, log)
}

#[tokio::test]
async fn drag_round_trip_commits_server_state() {
    let (url, state) = start_fake_api(vec![seed_task("1", "todo"), seed_task("2", "todo")]).await;
    let (mut board, log) = http_board(&url);
    assert!(board.mount().await);

    board.drag_start(TaskId::new("1"));
    let settlement = board
        .drop_on(Some(DropTarget::Column(TaskStatus::InProgress)))
        .await;

    assert_eq!(settlement, Some(Settlement::Committed));
    assert_eq!(board.columns().in_progress.len(), 1);
    assert_eq!(board.columns().todo.len(), 1);
    assert_eq!(
        log.messages(NotificationLevel::Success),
        vec!["Task status updated"]
    );

    let paths: Vec<String> = state.lock().requests.iter().map(|r| r.path.clone()).collect();
    assert_eq!(
        paths,
        vec![
            "/api/task/project/p-1",
            "/api/task/1/status",
            "/api/task/project/p-1",
        ]
    );
}

#[tokio::test]
async fn rejected_move_rolls_back_and_notifies_server_message() {
    let (url, state) = start_fake_api(vec![seed_task("1", "todo")]).await;
    let (mut board, log) = http_board(&url);
    board.mount().await;
    state.lock().reject_status = Some((
        StatusCode::FORBIDDEN,
        json!({ "message": "Not allowed to move this task" }),
    ));

    board.drag_start(TaskId::new("1"));
    let settlement = board
        .drop_on(Some(DropTarget::Column(TaskStatus::Done)))
        .await;

    assert_eq!(settlement, Some(Settlement::RolledBack));
    assert_eq!(board.columns().todo.len(), 1);
    assert_eq!(
        log.messages(NotificationLevel::Error),
        vec!["Not allowed to move this task"]
    );
}

#[tokio::test]
async fn create_over_http_refreshes_board() {
    let (url, _state) = start_fake_api(vec![seed_task("1", "done")]).await;
    let (mut board, log) = http_board(&url);
    board.mount().await;

    let created = board.create_task("Write docs", "").await.unwrap();

    assert_eq!(board.store().len(), 2);
    assert_eq!(
        board.store().get(&created.id).map(|t| t.status),
        Some(TaskStatus::Todo)
    );
    assert_eq!(log.messages(NotificationLevel::Success), vec!["Task created"]);
}

#[tokio::test]
async fn failed_create_notifies_each_error_and_keeps_store() {
    let (url, state) = start_fake_api(vec![seed_task("1", "done")]).await;
    let (mut board, log) = http_board(&url);
    board.mount().await;
    state.lock().reject_create = Some((
        StatusCode::BAD_REQUEST,
        json!({ "errors": [{ "message": "title taken" }, { "message": "project archived" }] }),
    ));
    let revision = board.store().revision();

    assert!(board.create_task("Write docs", "").await.is_err());
    assert_eq!(board.store().revision(), revision);
    assert_eq!(
        log.messages(NotificationLevel::Error),
        vec!["title taken", "project archived"]
    );
}
