//! Shows repository

use chrono::{DateTime, Utc};

use super::collection::{Collection, Record};
use crate::{
    error::{AppError, AppResult},
    models::show::{CreateShow, Show, UpdateShow, DEFAULT_LOCATION},
};

impl Record for Show {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Clone)]
pub struct ShowsRepository {
    shows: Collection<Show>,
}

impl ShowsRepository {
    pub fn new(shows: Collection<Show>) -> Self {
        Self { shows }
    }

    pub async fn list(&self) -> Vec<Show> {
        self.shows.all().await
    }

    /// Look up a show that may have been deleted
    pub async fn find(&self, id: &str) -> Option<Show> {
        self.shows.find(id).await
    }

    /// Get show by ID
    pub async fn get_by_id(&self, id: &str) -> AppResult<Show> {
        self.find(id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Show with id {} not found", id)))
    }

    /// Create a show. `data` must already be validated.
    pub async fn create(&self, data: CreateShow, default_section: &str, now: DateTime<Utc>) -> AppResult<Show> {
        let date = data
            .date
            .ok_or_else(|| AppError::Validation("Date is required".to_string()))?;

        let show = Show {
            id: super::new_id(),
            title: data.title,
            date,
            time: data.time.filter(|t| !t.is_empty()),
            price: data.price.unwrap_or(0.0),
            max_tickets: data.max_tickets.unwrap_or(0),
            location: data
                .location
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
            section: data
                .section
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| default_section.to_string()),
            created_at: Some(now),
        };

        self.shows.insert(show.clone()).await?;
        Ok(show)
    }

    pub async fn update(&self, id: &str, data: UpdateShow) -> AppResult<Show> {
        self.shows
            .update(id, |show| data.apply(show))
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Show with id {} not found", id)))
    }

    /// Delete a show; sales referencing it are left in place. Returns the remaining shows.
    pub async fn delete(&self, id: &str) -> AppResult<Vec<Show>> {
        self.shows
            .remove(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Show with id {} not found", id)))
    }

    pub async fn replace_all(&self, shows: Vec<Show>) -> AppResult<Vec<Show>> {
        self.shows.replace_all(shows).await
    }
}
