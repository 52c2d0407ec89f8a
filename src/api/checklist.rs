//! Equipment checklist endpoints

use super::{segment, ApiClient};
use crate::{
    error::AppResult,
    models::checklist::{ChecklistItem, ChecklistSubmission},
};

#[derive(Clone)]
pub struct ChecklistApi {
    client: ApiClient,
}

impl ChecklistApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, reservation_public_id: &str) -> AppResult<Vec<ChecklistItem>> {
        self.client
            .get(&format!("/equipment-checklist/{}", segment(reservation_public_id)))
            .await
    }

    pub async fn submit(
        &self,
        reservation_public_id: &str,
        submission: &ChecklistSubmission,
    ) -> AppResult<Vec<ChecklistItem>> {
        self.client
            .post_json(
                &format!("/equipment-checklist/{}", segment(reservation_public_id)),
                submission,
            )
            .await
    }
}
