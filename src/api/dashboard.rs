//! Dashboard endpoints

use super::ApiClient;
use crate::{
    error::AppResult,
    models::{
        dashboard::{DashboardOverview, MonthlyCount, YearQuery},
        event::Event,
    },
};

#[derive(Clone)]
pub struct DashboardApi {
    client: ApiClient,
}

impl DashboardApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn overview(&self) -> AppResult<DashboardOverview> {
        self.client.get("/dashboard/overview").await
    }

    pub async fn upcoming_events(&self) -> AppResult<Vec<Event>> {
        self.client.get("/dashboard/upcoming-events").await
    }

    pub async fn events_per_month(&self, year: i32) -> AppResult<Vec<MonthlyCount>> {
        self.client
            .get_with_query("/dashboard/events-per-month", &YearQuery { year })
            .await
    }
}
