//! Services end to end: session handling, multipart uploads and bulk actions

use chrono::NaiveDate;
use reservation_admin::{
    models::{
        enums::ApprovalAction,
        event::EventForm,
        upload::UploadFile,
        user::LoginRequest,
    },
    services::Services,
    AppError,
};

use crate::backend::{FakeBackend, PASSWORD};

async fn logged_in(backend: &FakeBackend) -> Services {
    let services = backend.services();
    services
        .auth
        .login(&LoginRequest {
            email: "head@example.edu".to_string(),
            password: PASSWORD.to_string(),
        })
        .await
        .unwrap();
    services
}

#[tokio::test]
async fn test_session_lifecycle() {
    let backend = FakeBackend::start().await;
    let services = backend.services();

    assert_eq!(services.auth.restore_session().await.unwrap(), None);

    let bad = services
        .auth
        .login(&LoginRequest {
            email: "head@example.edu".to_string(),
            password: "wrong".to_string(),
        })
        .await
        .unwrap_err();
    assert!(bad.is_unauthorized());
    assert_eq!(bad.user_message(), "Invalid email or password");
    assert!(!services.session.is_authenticated());

    let services = logged_in(&backend).await;
    let restored = services.auth.restore_session().await.unwrap();
    assert_eq!(restored.map(|u| u.public_id), Some("u-head".to_string()));

    services.auth.logout().await.unwrap();
    assert!(!services.session.is_authenticated());
    assert!(services.cache.is_empty());
}

#[tokio::test]
async fn test_create_event_sends_multipart_parts() {
    let backend = FakeBackend::start().await;
    let services = logged_in(&backend).await;
    let day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

    let form = EventForm {
        event_name: "Orientation".to_string(),
        event_type: "Seminar".to_string(),
        event_purpose: Some("Welcome new students".to_string()),
        description: None,
        venue_public_id: "v-gym".to_string(),
        department_public_id: None,
        start_date_time: day.and_hms_opt(9, 0, 0).unwrap(),
        end_date_time: day.and_hms_opt(11, 0, 0).unwrap(),
        approved_letter: Some(UploadFile::new("letter.pdf", "application/pdf", b"%PDF-1.4".to_vec())),
        event_image: Some(UploadFile::new("banner.png", "image/png", vec![0x89, 0x50, 0x4e, 0x47])),
    };

    let created = services.events.create_event(&form).await.unwrap();
    assert_eq!(created.public_id, "e-created");
    assert_eq!(created.event_name, "Orientation");

    let parts = backend.recorded.multipart_parts.lock().unwrap().clone();
    let names: Vec<&str> = parts.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["event", "approvedLetter", "eventImage"]);
    assert_eq!(parts[0].1.as_deref(), Some("application/json"));
    assert_eq!(parts[1].1.as_deref(), Some("application/pdf"));
}

#[tokio::test]
async fn test_create_event_rejects_oversized_image_locally() {
    let backend = FakeBackend::start().await;
    let services = logged_in(&backend).await;
    let day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

    let form = EventForm {
        event_name: "Orientation".to_string(),
        event_type: "Seminar".to_string(),
        event_purpose: None,
        description: None,
        venue_public_id: "v-gym".to_string(),
        department_public_id: None,
        start_date_time: day.and_hms_opt(9, 0, 0).unwrap(),
        end_date_time: day.and_hms_opt(11, 0, 0).unwrap(),
        approved_letter: None,
        event_image: Some(UploadFile::new("huge.png", "image/png", vec![0; 6 * 1024 * 1024])),
    };

    let err = services.events.create_event(&form).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(backend.recorded.multipart_parts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_bulk_approve_reports_partial_failure() {
    let backend = FakeBackend::start().await;
    let services = logged_in(&backend).await;

    let mut queue = services.events.approval_queue().await.unwrap();
    assert_eq!(queue.select_all_eligible(), 3);

    let outcome = services
        .events
        .bulk_act(&mut queue, ApprovalAction::Approve, "")
        .await
        .unwrap();

    assert_eq!(outcome.succeeded, vec!["e-1", "e-3"]);
    assert_eq!(outcome.failed.len(), 1);
    assert_eq!(outcome.failed[0].public_id, "e-locked");

    let toast = outcome.toast("event", "events");
    assert!(toast.is_error());
    assert_eq!(toast.message, "Failed to approve 1 of 3 events: Event already processed");

    let mut approved = backend.recorded.approved.lock().unwrap().clone();
    approved.sort();
    assert_eq!(approved, vec!["e-1", "e-3"]);
    assert_eq!(queue.selected_ids(), vec!["e-locked"]);
}

#[tokio::test]
async fn test_reservation_bulk_reject_is_one_batch_call() {
    let backend = FakeBackend::start().await;
    let services = logged_in(&backend).await;

    let mut queue = services.reservations.approval_queue().await.unwrap();
    queue.select_all_eligible();

    let outcome = services
        .reservations
        .bulk_act(&mut queue, ApprovalAction::Reject, "Projector under repair")
        .await
        .unwrap();
    assert!(outcome.is_success());
    assert_eq!(outcome.toast("reservation", "reservations").message, "2 reservations rejected");

    let calls = backend.recorded.batch_calls.lock().unwrap().clone();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "reject");
    assert_eq!(calls[0].1["reservationPublicIds"], serde_json::json!(["r-1", "r-2"]));
    assert_eq!(calls[0].1["remarks"], "Projector under repair");
}
