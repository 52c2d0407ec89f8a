//! Reservation Admin client core
//!
//! Headless core of the venue and equipment reservation admin console: a
//! typed client for the backend REST API, form validation, a query cache with
//! optimistic updates, and the approval queue used by approvers to act on
//! pending events and equipment reservations.

use std::sync::Arc;

pub mod api;
pub mod cache;
pub mod config;
pub mod datetime;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod toast;
pub mod validation;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared by every screen
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let client = api::ApiClient::new(&config.api)?;
        tracing::info!("Backend API at {}", client.base_url());
        let services = services::Services::new(api::Api::new(client));

        Ok(Self {
            config: Arc::new(config),
            services: Arc::new(services),
        })
    }

    /// Load configuration, install tracing and build the state
    pub fn from_env() -> AppResult<Self> {
        let config = AppConfig::load()?;
        logging::init_tracing(&config.logging);
        Self::new(config)
    }
}
