//! Notification endpoints (polled, no push channel)

use reqwest::Method;

use super::{segment, ApiClient};
use crate::{
    error::AppResult,
    models::notification::{Notification, NotificationQuery, UnreadCount},
};

#[derive(Clone)]
pub struct NotificationsApi {
    client: ApiClient,
}

impl NotificationsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: &NotificationQuery) -> AppResult<Vec<Notification>> {
        self.client.get_with_query("/notifications", query).await
    }

    pub async fn unread_count(&self) -> AppResult<UnreadCount> {
        self.client.get("/notifications/unread-count").await
    }

    pub async fn mark_read(&self, public_id: &str) -> AppResult<()> {
        self.client
            .execute::<()>(
                Method::PATCH,
                &format!("/notifications/{}/read", segment(public_id)),
                None,
            )
            .await
    }

    pub async fn mark_all_read(&self) -> AppResult<()> {
        self.client
            .execute::<()>(Method::PATCH, "/notifications/read-all", None)
            .await
    }

    pub async fn delete(&self, public_id: &str) -> AppResult<()> {
        self.client
            .delete(&format!("/notifications/{}", segment(public_id)))
            .await
    }
}
