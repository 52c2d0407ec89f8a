//! Dashboard aggregates, cached until invalidated

use crate::{
    api::dashboard::DashboardApi,
    cache::{QueryCache, QueryKey},
    error::AppResult,
    models::{
        dashboard::{DashboardOverview, MonthlyCount},
        event::Event,
    },
};

pub fn dashboard_key() -> QueryKey {
    QueryKey::root("dashboard")
}

#[derive(Clone)]
pub struct DashboardService {
    api: DashboardApi,
    cache: QueryCache,
}

impl DashboardService {
    pub fn new(api: DashboardApi, cache: QueryCache) -> Self {
        Self { api, cache }
    }

    pub async fn overview(&self) -> AppResult<DashboardOverview> {
        self.cache
            .fetch(dashboard_key().child("overview"), || self.api.overview())
            .await
    }

    pub async fn upcoming_events(&self) -> AppResult<Vec<Event>> {
        self.cache
            .fetch(dashboard_key().child("upcoming-events"), || {
                self.api.upcoming_events()
            })
            .await
    }

    /// Twelve entries, January first. Months the backend omits count as zero.
    pub async fn events_per_month(&self, year: i32) -> AppResult<Vec<MonthlyCount>> {
        let key = dashboard_key()
            .child("events-per-month")
            .child(year.to_string());
        let counts: Vec<MonthlyCount> = self
            .cache
            .fetch(key, || self.api.events_per_month(year))
            .await?;
        Ok(fill_months(counts))
    }

    pub fn refresh(&self) {
        self.cache.invalidate(&dashboard_key());
    }
}

fn fill_months(counts: Vec<MonthlyCount>) -> Vec<MonthlyCount> {
    (1..=12)
        .map(|month| MonthlyCount {
            month,
            count: counts
                .iter()
                .filter(|c| c.month == month)
                .map(|c| c.count)
                .sum(),
        })
        .collect()
}
