//! Dashboard aggregates

use serde::{Deserialize, Serialize};

/// Headline counters for the admin dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardOverview {
    pub total_events: u64,
    pub pending_events: u64,
    pub approved_events: u64,
    pub rejected_events: u64,
    pub canceled_events: u64,
    pub upcoming_events: u64,
    pub total_reservations: u64,
    pub pending_reservations: u64,
    pub total_users: u64,
    pub total_venues: u64,
    pub total_equipment: u64,
}

/// Events per month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCount {
    /// 1-12
    pub month: u32,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct YearQuery {
    pub year: i32,
}
