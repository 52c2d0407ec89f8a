//! Notification read/delete mutations against the fake backend

use reservation_admin::{
    cache::QueryKey,
    models::notification::{Notification, NotificationQuery, UnreadCount},
    services::{notifications::notifications_key, Services},
};

use crate::backend::{FakeBackend, SYSTEM_NOTICE};

fn unread_key() -> QueryKey {
    notifications_key().child("unread-count")
}

fn list_key() -> QueryKey {
    notifications_key()
        .child("list")
        .with_params(&NotificationQuery::default())
        .unwrap()
}

async fn primed(backend: &FakeBackend) -> Services {
    let services = backend.services();
    let rows = services
        .notifications
        .list(&NotificationQuery::default())
        .await
        .unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(services.notifications.unread_count().await.unwrap(), 3);
    services
}

fn cached_rows(services: &Services) -> Vec<Notification> {
    services.cache.get(&list_key()).unwrap()
}

fn cached_count(services: &Services) -> u64 {
    services.cache.get::<UnreadCount>(&unread_key()).unwrap().count
}

#[tokio::test]
async fn test_mark_read_decrements_unread_count() {
    let backend = FakeBackend::start().await;
    let services = primed(&backend).await;

    services.notifications.mark_read("n-1").await.unwrap();

    assert_eq!(cached_count(&services), 2);
    let rows = cached_rows(&services);
    assert!(rows.iter().find(|n| n.public_id == "n-1").unwrap().is_read);
    assert!(!services.cache.is_fresh(&unread_key()));

    // Already read: no second decrement
    services.notifications.mark_read("n-4").await.unwrap();
    assert_eq!(cached_count(&services), 2);

    assert_eq!(services.notifications.unread_count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_mark_all_read_zeroes_unread_count() {
    let backend = FakeBackend::start().await;
    let services = primed(&backend).await;

    services.notifications.mark_all_read().await.unwrap();

    assert_eq!(cached_count(&services), 0);
    assert!(cached_rows(&services).iter().all(|n| n.is_read));
    assert_eq!(services.notifications.unread_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_delete_removes_row_and_rolls_back_on_failure() {
    let backend = FakeBackend::start().await;
    let services = primed(&backend).await;

    services.notifications.delete("n-2").await.unwrap();
    let rows = cached_rows(&services);
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|n| n.public_id != "n-2"));

    // Refetch so the list is fresh again before the failing delete
    let rows = services
        .notifications
        .list(&NotificationQuery::default())
        .await
        .unwrap();
    assert_eq!(rows.len(), 3);

    let err = services.notifications.delete(SYSTEM_NOTICE).await.unwrap_err();
    assert_eq!(err.user_message(), "System notices cannot be deleted");

    let rows = cached_rows(&services);
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().any(|n| n.public_id == SYSTEM_NOTICE));
    assert!(services.cache.is_fresh(&list_key()));
}
