//! Equipment checkout/return checklists

use super::auth::Session;
use crate::{
    api::checklist::ChecklistApi,
    cache::{QueryCache, QueryKey},
    error::AppResult,
    models::checklist::{ChecklistItem, ChecklistSubmission},
    validation::FormValidate,
};

fn checklist_key(reservation_public_id: &str) -> QueryKey {
    QueryKey::root("equipment-checklist").child(reservation_public_id)
}

#[derive(Clone)]
pub struct ChecklistService {
    api: ChecklistApi,
    cache: QueryCache,
    session: Session,
}

impl ChecklistService {
    pub fn new(api: ChecklistApi, cache: QueryCache, session: Session) -> Self {
        Self { api, cache, session }
    }

    pub async fn get(&self, reservation_public_id: &str) -> AppResult<Vec<ChecklistItem>> {
        self.cache
            .fetch(checklist_key(reservation_public_id), || {
                self.api.get(reservation_public_id)
            })
            .await
    }

    pub async fn submit(
        &self,
        reservation_public_id: &str,
        submission: &ChecklistSubmission,
    ) -> AppResult<Vec<ChecklistItem>> {
        self.session.require_user()?;
        submission.validate_form()?;
        let items = self.api.submit(reservation_public_id, submission).await?;
        tracing::debug!(
            "Checklist for reservation {} now has {} items",
            reservation_public_id,
            items.len()
        );
        self.cache.set(checklist_key(reservation_public_id), &items)?;
        Ok(items)
    }
}
