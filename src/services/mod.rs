//! Business logic services

pub mod availability;
pub mod dashboard;
pub mod exchange;
pub mod people;
pub mod reports;
pub mod sales;
pub mod seating;
pub mod shows;
pub mod waitlist;

use crate::{config::AppConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub shows: shows::ShowsService,
    pub seating: seating::SeatingService,
    pub people: people::PeopleService,
    pub sales: sales::SalesService,
    pub waitlist: waitlist::WaitlistService,
    pub dashboard: dashboard::DashboardService,
    pub reports: reports::ReportsService,
    pub exchange: exchange::ExchangeService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: &AppConfig) -> Self {
        let seating = seating::SeatingService::new(repository.clone(), config.venue.clone());

        Self {
            shows: shows::ShowsService::new(
                repository.clone(),
                seating.clone(),
                config.deadlines,
                config.venue.section.clone(),
            ),
            people: people::PeopleService::new(repository.clone()),
            sales: sales::SalesService::new(repository.clone(), seating.clone()),
            waitlist: waitlist::WaitlistService::new(repository.clone()),
            dashboard: dashboard::DashboardService::new(repository.clone(), config.deadlines),
            reports: reports::ReportsService::new(repository.clone()),
            exchange: exchange::ExchangeService::new(repository),
            seating,
        }
    }
}
