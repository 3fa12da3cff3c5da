//! Waitlist service: demand for sold-out shows and its conversion into sales

use chrono::{DateTime, Utc};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        waitlist::{CreateWaitlistEntry, UpdateWaitlistEntry, WaitlistEntryDetails},
        Sale, WaitlistEntry, WaitlistStatus,
    },
    repository::Repository,
};

use super::availability;

fn transition(entry: &WaitlistEntry, next: WaitlistStatus) -> AppResult<()> {
    if entry.status.can_transition_to(next) {
        Ok(())
    } else {
        Err(AppError::Conflict(format!(
            "Waitlist entry {} is {} and cannot become {}",
            entry.id, entry.status, next
        )))
    }
}

#[derive(Clone)]
pub struct WaitlistService {
    repository: Repository,
}

impl WaitlistService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Waiting and notified entries of a show, oldest first
    pub async fn for_show(&self, show_id: &str) -> AppResult<Vec<WaitlistEntryDetails>> {
        let snapshot = self.repository.snapshot().await;
        if snapshot.show(show_id).is_none() {
            return Err(AppError::NotFound(format!("Show with id {} not found", show_id)));
        }
        Ok(availability::active_waitlist(&snapshot.waitlist, &snapshot.people, show_id))
    }

    pub async fn add(&self, show_id: &str, data: CreateWaitlistEntry, now: DateTime<Utc>) -> AppResult<WaitlistEntry> {
        data.validate()?;
        let Some(person_id) = data.person_id else {
            return Err(AppError::Validation("A customer must be selected".to_string()));
        };
        self.repository.shows.get_by_id(show_id).await?;
        self.repository.people.get_by_id(&person_id).await?;

        let entry = self
            .repository
            .waitlist
            .add(
                show_id,
                &person_id,
                data.quantity.unwrap_or(1),
                data.notes.unwrap_or_default(),
                now,
            )
            .await?;
        tracing::info!("Waitlisted {} tickets for show {}", entry.quantity, show_id);
        Ok(entry)
    }

    /// Change quantity or notes of an entry still on the list
    pub async fn update(&self, id: &str, data: UpdateWaitlistEntry) -> AppResult<WaitlistEntry> {
        data.validate()?;
        let _gate = self.repository.write_gate().await;
        let entry = self.repository.waitlist.get_by_id(id).await?;
        if !entry.status.is_active() {
            return Err(AppError::Conflict(format!(
                "Waitlist entry {} is {} and can no longer be edited",
                id, entry.status
            )));
        }

        self.repository
            .waitlist
            .update(id, |e| {
                if let Some(quantity) = data.quantity {
                    e.quantity = quantity;
                }
                if let Some(notes) = data.notes {
                    e.notes = notes;
                }
            })
            .await
    }

    /// Record that the customer was told tickets are available
    pub async fn notify(&self, id: &str, now: DateTime<Utc>) -> AppResult<WaitlistEntry> {
        let _gate = self.repository.write_gate().await;
        let entry = self.repository.waitlist.get_by_id(id).await?;
        transition(&entry, WaitlistStatus::Notified)?;

        self.repository
            .waitlist
            .update(id, |e| {
                e.status = WaitlistStatus::Notified;
                e.notified_at = Some(now);
            })
            .await
    }

    pub async fn cancel(&self, id: &str) -> AppResult<WaitlistEntry> {
        let _gate = self.repository.write_gate().await;
        let entry = self.repository.waitlist.get_by_id(id).await?;
        transition(&entry, WaitlistStatus::Cancelled)?;

        self.repository
            .waitlist
            .update(id, |e| e.status = WaitlistStatus::Cancelled)
            .await
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.repository.waitlist.delete(id).await?;
        Ok(())
    }

    /// Turn an entry into a Reserved sale.
    ///
    /// Refused when the show has no tickets left or fewer than the entry
    /// wants, unless `force` is set.
    pub async fn convert(&self, id: &str, force: bool, now: DateTime<Utc>) -> AppResult<Sale> {
        let _gate = self.repository.write_gate().await;
        let entry = self.repository.waitlist.get_by_id(id).await?;
        transition(&entry, WaitlistStatus::Converted)?;

        let show = self.repository.shows.get_by_id(&entry.show_id).await?;
        let sales = self.repository.sales.list().await;
        let remaining = availability::remaining(&show, &availability::show_stats(&sales, &show.id));

        if !force && (remaining <= 0 || i64::from(entry.quantity) > remaining) {
            return Err(AppError::Capacity {
                requested: entry.quantity,
                available: remaining.max(0),
            });
        }

        self.repository
            .convert_gated(id, now)
            .await?
            .ok_or_else(|| AppError::Conflict(format!("Waitlist entry {} could not be converted", id)))
    }
}
