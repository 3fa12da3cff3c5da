//! Haletix Theater Box Office
//!
//! A REST JSON server for a small theater's box office: shows, customers,
//! ticket sales with seat assignment, waitlists, return deadlines and sales
//! reports, persisted in a key-value store.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    /// Wire services over an opened repository
    pub fn new(config: AppConfig, repository: repository::Repository) -> Self {
        let services = services::Services::new(repository, &config);
        Self {
            config: Arc::new(config),
            services: Arc::new(services),
        }
    }
}
