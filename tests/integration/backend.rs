//! Minimal axum stand-in for the reservation backend.
//!
//! Covers the response shapes the client must cope with: `{data}` envelopes,
//! bare values, empty bodies, 204s and the different error body layouts.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{Multipart, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
    Json, Router,
};
use reservation_admin::{
    api::{Api, ApiClient},
    config::ApiConfig,
    services::Services,
};
use serde_json::{json, Value};

pub const PASSWORD: &str = "Secret123";
const SESSION_COOKIE: &str = "SESSION=fake-session";

#[derive(Default)]
pub struct Recorded {
    pub approved: Mutex<Vec<String>>,
    /// (part name, content type)
    pub multipart_parts: Mutex<Vec<(String, Option<String>)>>,
    /// (action segment, body)
    pub batch_calls: Mutex<Vec<(String, Value)>>,
    /// (public id, read)
    pub notifications: Mutex<Vec<(String, bool)>>,
}

/// Undeletable notice, used to exercise rollback
pub const SYSTEM_NOTICE: &str = "n-system";

pub struct FakeBackend {
    pub base_url: String,
    pub recorded: Arc<Recorded>,
}

impl FakeBackend {
    pub async fn start() -> Self {
        let recorded = Arc::new(Recorded {
            notifications: Mutex::new(vec![
                ("n-1".to_string(), false),
                ("n-2".to_string(), false),
                (SYSTEM_NOTICE.to_string(), false),
                ("n-4".to_string(), true),
            ]),
            ..Default::default()
        });

        let app = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/auth/logout", post(logout))
            .route("/api/auth/me", get(me))
            .route("/api/events", post(create_event))
            .route("/api/events/pending-approvals", get(pending_events))
            .route("/api/events/:id", get(get_event))
            .route("/api/events/:id/approve", post(approve_event))
            .route("/api/events/:id/reject", post(reject_event))
            .route("/api/equipment-reservations/pending-approvals", get(pending_reservations))
            .route("/api/equipment-reservations/:action", post(batch_reservations))
            .route("/api/notifications", get(list_notifications))
            .route("/api/notifications/unread-count", get(unread_count))
            .route("/api/notifications/read-all", patch(read_all))
            .route("/api/notifications/:id/read", patch(read_notification))
            .route("/api/notifications/:id", delete(delete_notification))
            .route("/api/admin/departments", get(empty_ok))
            .route("/api/dashboard/overview", get(plain_text_failure))
            .with_state(recorded.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}/api", addr),
            recorded,
        }
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(&ApiConfig {
            base_url: self.base_url.clone(),
            timeout_secs: Some(5),
        })
        .unwrap()
    }

    pub fn api(&self) -> Api {
        Api::new(self.client())
    }

    pub fn services(&self) -> Services {
        Services::new(self.api())
    }
}

pub fn approver_json() -> Value {
    json!({
        "publicId": "u-head",
        "firstName": "Dana",
        "lastName": "Cruz",
        "email": "head@example.edu",
        "roles": ["DEPT_HEAD", "EQUIPMENT_OWNER"],
        "active": true
    })
}

pub fn event_json(public_id: &str) -> Value {
    json!({
        "publicId": public_id,
        "eventName": "Science Fair",
        "eventType": "Exhibit",
        "status": "PENDING",
        "startTime": "2024-06-01T10:00:00",
        "endTime": "2024-06-01T12:00:00",
        "approvals": []
    })
}

fn reservation_json(public_id: &str) -> Value {
    json!({
        "publicId": public_id,
        "equipment": { "publicId": "eq-1", "name": "Projector" },
        "quantity": 1,
        "status": "PENDING",
        "startTime": "2024-06-01T10:00:00",
        "endTime": "2024-06-01T12:00:00"
    })
}

fn has_session(headers: &HeaderMap) -> bool {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|c| c.contains(SESSION_COOKIE))
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] == PASSWORD {
        (
            [(header::SET_COOKIE, format!("{}; Path=/; HttpOnly", SESSION_COOKIE))],
            Json(json!({ "data": approver_json() })),
        )
            .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": { "message": "Invalid email or password" } })),
        )
            .into_response()
    }
}

async fn logout() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn me(headers: HeaderMap) -> Response {
    if has_session(&headers) {
        Json(approver_json()).into_response()
    } else {
        StatusCode::UNAUTHORIZED.into_response()
    }
}

async fn pending_events() -> Json<Value> {
    Json(json!({
        "data": [event_json("e-1"), event_json("e-locked"), event_json("e-3")]
    }))
}

async fn get_event(Path(id): Path<String>) -> Response {
    if id == "missing" {
        StatusCode::NOT_FOUND.into_response()
    } else {
        Json(event_json(&id)).into_response()
    }
}

async fn approve_event(
    State(recorded): State<Arc<Recorded>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if !has_session(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if id == "e-locked" {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "message": "Event already processed" })),
        )
            .into_response();
    }
    recorded.approved.lock().unwrap().push(id);
    StatusCode::NO_CONTENT.into_response()
}

async fn reject_event(Json(body): Json<Value>) -> Response {
    let remarks = body["remarks"].as_str().unwrap_or_default();
    if remarks.len() < 5 {
        // Message double-encoded by an upstream service
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": { "message": "{\"message\":\"Remarks too short\"}" } })),
        )
            .into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn create_event(State(recorded): State<Arc<Recorded>>, mut multipart: Multipart) -> Response {
    let mut event_name = String::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.unwrap();
        if name == "event" {
            let body: Value = serde_json::from_slice(&bytes).unwrap();
            event_name = body["eventName"].as_str().unwrap_or_default().to_string();
        }
        recorded.multipart_parts.lock().unwrap().push((name, content_type));
    }

    let mut event = event_json("e-created");
    event["eventName"] = json!(event_name);
    (StatusCode::CREATED, Json(json!({ "data": event }))).into_response()
}

async fn pending_reservations() -> Json<Value> {
    Json(json!([reservation_json("r-1"), reservation_json("r-2")]))
}

async fn batch_reservations(
    State(recorded): State<Arc<Recorded>>,
    Path(action): Path<String>,
    Json(body): Json<Value>,
) -> StatusCode {
    recorded.batch_calls.lock().unwrap().push((action, body));
    StatusCode::NO_CONTENT
}

async fn list_notifications(State(recorded): State<Arc<Recorded>>) -> Json<Value> {
    let rows: Vec<Value> = recorded
        .notifications
        .lock()
        .unwrap()
        .iter()
        .map(|(id, read)| {
            json!({
                "publicId": id,
                "message": { "type": "EVENT_APPROVED", "message": "Your event was approved" },
                "isRead": read,
                "relatedEventPublicId": "e-1",
                "createdAt": "2024-06-01T10:00:00"
            })
        })
        .collect();
    Json(json!({ "data": rows }))
}

async fn unread_count(State(recorded): State<Arc<Recorded>>) -> Json<Value> {
    let count = recorded
        .notifications
        .lock()
        .unwrap()
        .iter()
        .filter(|(_, read)| !read)
        .count();
    Json(json!({ "count": count }))
}

async fn read_all(State(recorded): State<Arc<Recorded>>) -> StatusCode {
    for (_, read) in recorded.notifications.lock().unwrap().iter_mut() {
        *read = true;
    }
    StatusCode::NO_CONTENT
}

async fn read_notification(State(recorded): State<Arc<Recorded>>, Path(id): Path<String>) -> StatusCode {
    let mut rows = recorded.notifications.lock().unwrap();
    match rows.iter_mut().find(|(row, _)| *row == id) {
        Some((_, read)) => {
            *read = true;
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn delete_notification(State(recorded): State<Arc<Recorded>>, Path(id): Path<String>) -> Response {
    if id == SYSTEM_NOTICE {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({ "message": "System notices cannot be deleted" })),
        )
            .into_response();
    }
    recorded.notifications.lock().unwrap().retain(|(row, _)| *row != id);
    StatusCode::NO_CONTENT.into_response()
}

async fn empty_ok() -> StatusCode {
    StatusCode::OK
}

async fn plain_text_failure() -> (StatusCode, &'static str) {
    (StatusCode::BAD_GATEWAY, "upstream timeout")
}
