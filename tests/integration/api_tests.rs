//! Client behaviour against the fake backend: envelopes, empty bodies and
//! error message extraction

use reservation_admin::{
    models::notification::UnreadCount,
    models::user::LoginRequest,
    services::events::EventGateway,
    AppError,
};

use crate::backend::{FakeBackend, PASSWORD};

fn api_status(err: &AppError) -> Option<u16> {
    match err {
        AppError::Api { status, .. } => Some(*status),
        _ => None,
    }
}

#[tokio::test]
async fn test_envelope_and_bare_bodies_decode_alike() {
    let backend = FakeBackend::start().await;
    let api = backend.api();

    let pending = api.events.pending_approvals().await.unwrap();
    assert_eq!(pending.len(), 3);
    assert_eq!(pending[0].public_id, "e-1");

    let detail = api.events.get("e-9").await.unwrap();
    assert_eq!(detail.public_id, "e-9");

    let count: UnreadCount = api.notifications.unread_count().await.unwrap();
    assert_eq!(count.count, 3);
}

#[tokio::test]
async fn test_empty_bodies() {
    let backend = FakeBackend::start().await;
    let api = backend.api();

    let departments = api.admin.list_departments().await.unwrap();
    assert!(departments.is_empty());

    api.notifications.mark_all_read().await.unwrap();
}

#[tokio::test]
async fn test_error_message_extraction() {
    let backend = FakeBackend::start().await;
    let api = backend.api();

    let missing = api.events.get("missing").await.unwrap_err();
    assert_eq!(api_status(&missing), Some(404));
    assert_eq!(missing.user_message(), "Request failed with status 404");

    let overview = api.dashboard.overview().await.unwrap_err();
    assert_eq!(api_status(&overview), Some(502));
    assert_eq!(overview.user_message(), "upstream timeout");

    let nested = api.events.reject("e-1", "no").await.unwrap_err();
    assert_eq!(nested.user_message(), "Remarks too short");
}

#[tokio::test]
async fn test_session_cookie_is_sent_after_login() {
    let backend = FakeBackend::start().await;
    let api = backend.api();

    let anonymous = api.events.approve("e-1", "").await.unwrap_err();
    assert!(anonymous.is_unauthorized());

    let user = api
        .auth
        .login(&LoginRequest {
            email: "head@example.edu".to_string(),
            password: PASSWORD.to_string(),
        })
        .await
        .unwrap();
    assert_eq!(user.public_id, "u-head");

    api.events.approve("e-1", "").await.unwrap();
    assert_eq!(*backend.recorded.approved.lock().unwrap(), vec!["e-1".to_string()]);

    let conflict = api.events.approve("e-locked", "").await.unwrap_err();
    assert_eq!(api_status(&conflict), Some(409));
    assert_eq!(conflict.user_message(), "Event already processed");
}
