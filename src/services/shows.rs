//! Shows service: catalogue of performances and the per-show attendee page

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    config::DeadlineConfig,
    error::{AppError, AppResult},
    models::{
        sale::{format_seats, Sale},
        show::{CreateShow, UpdateShow},
        waitlist::WaitlistEntryDetails,
        Show,
    },
    repository::{Repository, Snapshot},
};

use super::{
    availability::{self, DeadlineInfo, ShowStats, WaitlistStats},
    seating::{SeatMap, SeatingService},
};

/// A show with its live occupancy figures
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShowSummary {
    #[serde(flatten)]
    pub show: Show,
    pub sold_count: u32,
    pub revenue: f64,
    pub remaining: i64,
    pub deadline: Option<DeadlineInfo>,
    pub waitlist: WaitlistStats,
}

impl ShowSummary {
    pub fn from_snapshot(snapshot: &Snapshot, show: &Show, now: DateTime<Utc>, policy: &DeadlineConfig) -> Self {
        let stats: ShowStats = availability::show_stats(&snapshot.sales, &show.id);
        let remaining = availability::remaining(show, &stats);

        Self {
            show: show.clone(),
            sold_count: stats.sold_count,
            revenue: stats.revenue,
            remaining,
            deadline: availability::deadline_info(show.date, remaining, now, policy),
            waitlist: availability::waitlist_stats(&snapshot.waitlist, &show.id),
        }
    }
}

/// A non-cancelled sale of the show with its buyer's contact details
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    #[serde(flatten)]
    pub sale: Sale,
    pub person_name: String,
    pub person_phone: String,
    pub person_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seat_label: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendeesPage {
    pub show: ShowSummary,
    /// Oldest purchase first
    pub attendees: Vec<Attendee>,
    pub total_tickets: u32,
    pub total_revenue: f64,
    pub waitlist: Vec<WaitlistEntryDetails>,
    pub seat_map: SeatMap,
}

#[derive(Clone)]
pub struct ShowsService {
    repository: Repository,
    seating: SeatingService,
    deadlines: DeadlineConfig,
    default_section: String,
}

impl ShowsService {
    pub fn new(
        repository: Repository,
        seating: SeatingService,
        deadlines: DeadlineConfig,
        default_section: String,
    ) -> Self {
        Self {
            repository,
            seating,
            deadlines,
            default_section,
        }
    }

    /// All shows with sold count, revenue, remaining capacity and deadline
    pub async fn list(&self, now: DateTime<Utc>) -> Vec<ShowSummary> {
        let snapshot = self.repository.snapshot().await;
        snapshot
            .shows
            .iter()
            .map(|show| ShowSummary::from_snapshot(&snapshot, show, now, &self.deadlines))
            .collect()
    }

    pub async fn get(&self, id: &str, now: DateTime<Utc>) -> AppResult<ShowSummary> {
        let snapshot = self.repository.snapshot().await;
        let show = snapshot
            .show(id)
            .ok_or_else(|| AppError::NotFound(format!("Show with id {} not found", id)))?;
        Ok(ShowSummary::from_snapshot(&snapshot, show, now, &self.deadlines))
    }

    pub async fn create(&self, data: CreateShow, now: DateTime<Utc>) -> AppResult<Show> {
        data.validate()?;
        let show = self
            .repository
            .shows
            .create(data, &self.default_section, now)
            .await?;
        tracing::info!("Created show {} ({})", show.title, show.id);
        Ok(show)
    }

    pub async fn update(&self, id: &str, data: UpdateShow) -> AppResult<Show> {
        data.validate()?;
        self.repository.shows.update(id, data).await
    }

    /// Remove a show. Its sales and waitlist entries are kept and show up
    /// with placeholder titles.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.repository.shows.delete(id).await?;
        tracing::info!("Deleted show {}", id);
        Ok(())
    }

    /// Everything the box office needs on the night: attendees, totals,
    /// waitlist and the seating chart.
    pub async fn attendees(&self, id: &str, now: DateTime<Utc>) -> AppResult<AttendeesPage> {
        let snapshot = self.repository.snapshot().await;
        let show = snapshot
            .show(id)
            .ok_or_else(|| AppError::NotFound(format!("Show with id {} not found", id)))?;

        let mut attendees: Vec<Attendee> = snapshot
            .sales
            .iter()
            .filter(|s| s.show_id == id && s.status.counts())
            .map(|sale| {
                let person = snapshot.person(&sale.person_id);
                Attendee {
                    sale: sale.clone(),
                    person_name: snapshot.person_name(&sale.person_id),
                    person_phone: person.map(|p| p.phone.clone()).unwrap_or_default(),
                    person_email: person.map(|p| p.email.clone()).unwrap_or_default(),
                    seat_label: format_seats(&sale.seats),
                }
            })
            .collect();
        attendees.sort_by_key(|a| a.sale.sale_date);

        let summary = ShowSummary::from_snapshot(&snapshot, show, now, &self.deadlines);
        Ok(AttendeesPage {
            total_tickets: summary.sold_count,
            total_revenue: summary.revenue,
            attendees,
            waitlist: availability::active_waitlist(&snapshot.waitlist, &snapshot.people, id),
            seat_map: self.seating.chart(&snapshot, show, None),
            show: summary,
        })
    }
}
