//! Activity log browsing (admin only)

use validator::ValidationErrors;

use super::auth::Session;
use crate::{
    api::activity_logs::ActivityLogsApi,
    cache::{QueryCache, QueryKey},
    error::AppResult,
    models::{
        activity_log::{ActivityLog, ActivityLogQuery},
        Page,
    },
    validation::check_date_range,
};

fn slot() -> QueryKey {
    QueryKey::root("activity-logs")
}

#[derive(Clone)]
pub struct ActivityLogsService {
    api: ActivityLogsApi,
    cache: QueryCache,
    session: Session,
}

impl ActivityLogsService {
    pub fn new(api: ActivityLogsApi, cache: QueryCache, session: Session) -> Self {
        Self { api, cache, session }
    }

    /// `None` when a newer page/filter request superseded this one
    pub async fn list(&self, query: &ActivityLogQuery) -> AppResult<Option<Page<ActivityLog>>> {
        self.session.require_user()?.require_admin()?;
        if let (Some(from), Some(to)) = (query.from, query.to) {
            let mut errors = ValidationErrors::new();
            check_date_range(&mut errors, from, to);
            if !errors.is_empty() {
                return Err(errors.into());
            }
        }
        let key = slot().with_params(query)?;
        self.cache
            .fetch_latest(&slot(), key, || self.api.list(query))
            .await
    }
}
