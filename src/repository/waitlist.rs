//! Waitlist repository

use chrono::{DateTime, Utc};

use super::collection::{Collection, Record};
use crate::{
    error::{AppError, AppResult},
    models::waitlist::{WaitlistEntry, WaitlistStatus},
};

impl Record for WaitlistEntry {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Clone)]
pub struct WaitlistRepository {
    entries: Collection<WaitlistEntry>,
}

impl WaitlistRepository {
    pub fn new(entries: Collection<WaitlistEntry>) -> Self {
        Self { entries }
    }

    pub async fn list(&self) -> Vec<WaitlistEntry> {
        self.entries.all().await
    }

    pub async fn find(&self, id: &str) -> Option<WaitlistEntry> {
        self.entries.find(id).await
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<WaitlistEntry> {
        self.find(id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Waitlist entry with id {} not found", id)))
    }

    /// Put a person on a show's waitlist in the Waiting state
    pub async fn add(
        &self,
        show_id: &str,
        person_id: &str,
        quantity: u32,
        notes: String,
        now: DateTime<Utc>,
    ) -> AppResult<WaitlistEntry> {
        let entry = WaitlistEntry {
            id: super::new_id(),
            show_id: show_id.to_string(),
            person_id: person_id.to_string(),
            quantity,
            notes,
            status: WaitlistStatus::Waiting,
            added_at: now,
            notified_at: None,
            converted_at: None,
        };

        self.entries.insert(entry.clone()).await?;
        Ok(entry)
    }

    pub async fn update<F>(&self, id: &str, f: F) -> AppResult<WaitlistEntry>
    where
        F: FnOnce(&mut WaitlistEntry),
    {
        self.entries
            .update(id, f)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Waitlist entry with id {} not found", id)))
    }

    /// Delete an entry and return the remaining ones
    pub async fn delete(&self, id: &str) -> AppResult<Vec<WaitlistEntry>> {
        self.entries
            .remove(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Waitlist entry with id {} not found", id)))
    }
}
