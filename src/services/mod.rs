//! Client-side services: validation, caching and optimistic updates over the API

pub mod activity_logs;
pub mod admin;
pub mod approvals;
pub mod auth;
pub mod checklist;
pub mod dashboard;
pub mod events;
pub mod notifications;
pub mod reservations;

use std::sync::Arc;

use crate::{api::Api, cache::QueryCache};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub session: auth::Session,
    pub cache: QueryCache,
    pub auth: auth::AuthService,
    pub events: events::EventsService,
    pub reservations: reservations::ReservationsService,
    pub checklist: checklist::ChecklistService,
    pub admin: admin::AdminService,
    pub dashboard: dashboard::DashboardService,
    pub notifications: notifications::NotificationsService,
    pub activity_logs: activity_logs::ActivityLogsService,
}

impl Services {
    /// Create all services over one API client, sharing a session and cache
    pub fn new(api: Api) -> Self {
        let session = auth::Session::new();
        let cache = QueryCache::new();

        Self {
            auth: auth::AuthService::new(api.auth, session.clone(), cache.clone()),
            events: events::EventsService::new(Arc::new(api.events), cache.clone(), session.clone()),
            reservations: reservations::ReservationsService::new(
                Arc::new(api.reservations),
                cache.clone(),
                session.clone(),
            ),
            checklist: checklist::ChecklistService::new(api.checklist, cache.clone(), session.clone()),
            admin: admin::AdminService::new(api.admin, cache.clone(), session.clone()),
            dashboard: dashboard::DashboardService::new(api.dashboard, cache.clone()),
            notifications: notifications::NotificationsService::new(api.notifications, cache.clone()),
            activity_logs: activity_logs::ActivityLogsService::new(
                api.activity_logs,
                cache.clone(),
                session.clone(),
            ),
            session,
            cache,
        }
    }
}
