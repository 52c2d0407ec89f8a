//! Activity log endpoints (admin only)

use super::ApiClient;
use crate::{
    error::AppResult,
    models::{
        activity_log::{ActivityLog, ActivityLogQuery},
        Page,
    },
};

#[derive(Clone)]
pub struct ActivityLogsApi {
    client: ApiClient,
}

impl ActivityLogsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: &ActivityLogQuery) -> AppResult<Page<ActivityLog>> {
        self.client
            .get_with_query("/admin/activity-logs", query)
            .await
    }
}
