//! Occupancy, waitlist demand and return-deadline calculations.
//!
//! Pure functions over snapshots of the collections; nothing here touches
//! the store.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    config::DeadlineConfig,
    models::{
        sale::Sale,
        waitlist::{WaitlistEntry, WaitlistEntryDetails, WaitlistStatus},
        Person, Show,
    },
    repository::Snapshot,
};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Placeholder title for sales whose show was deleted
pub const UNKNOWN_SHOW: &str = "Unknown Show";

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShowStats {
    pub sold_count: u32,
    pub revenue: f64,
}

/// Tickets sold and revenue for a show, cancelled sales excluded
pub fn show_stats(sales: &[Sale], show_id: &str) -> ShowStats {
    sales
        .iter()
        .filter(|s| s.show_id == show_id && s.status.counts())
        .fold(ShowStats::default(), |acc, s| ShowStats {
            sold_count: acc.sold_count + s.quantity,
            revenue: acc.revenue + s.total_amount,
        })
}

/// Capacity left; negative when the show is overbooked
pub fn remaining(show: &Show, stats: &ShowStats) -> i64 {
    show.max_tickets - i64::from(stats.sold_count)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistStats {
    pub waiting: usize,
    pub notified: usize,
    pub converted: usize,
    /// Tickets wanted by entries still waiting
    pub total_tickets_wanted: u32,
}

pub fn waitlist_stats(entries: &[WaitlistEntry], show_id: &str) -> WaitlistStats {
    entries
        .iter()
        .filter(|w| w.show_id == show_id)
        .fold(WaitlistStats::default(), |mut acc, w| {
            match w.status {
                WaitlistStatus::Waiting => {
                    acc.waiting += 1;
                    acc.total_tickets_wanted += w.quantity;
                }
                WaitlistStatus::Notified => acc.notified += 1,
                WaitlistStatus::Converted => acc.converted += 1,
                WaitlistStatus::Cancelled => {}
            }
            acc
        })
}

/// Waiting and notified entries of a show, oldest first
pub fn active_waitlist(entries: &[WaitlistEntry], people: &[Person], show_id: &str) -> Vec<WaitlistEntryDetails> {
    let mut active: Vec<WaitlistEntryDetails> = entries
        .iter()
        .filter(|w| w.show_id == show_id && w.status.is_active())
        .map(|w| WaitlistEntryDetails {
            entry: w.clone(),
            person: people.iter().find(|p| p.id == w.person_id).cloned(),
        })
        .collect();
    active.sort_by_key(|d| d.entry.added_at);
    active
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DeadlineTier {
    Passed,
    Urgent,
    Warning,
    Safe,
}

impl DeadlineTier {
    fn for_days(days: i64) -> Self {
        match days {
            d if d <= 0 => DeadlineTier::Passed,
            d if d <= 3 => DeadlineTier::Urgent,
            d if d <= 7 => DeadlineTier::Warning,
            _ => DeadlineTier::Safe,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            DeadlineTier::Passed => "var(--text-muted)",
            DeadlineTier::Urgent => "var(--color-danger)",
            DeadlineTier::Warning => "var(--color-warning)",
            DeadlineTier::Safe => "var(--color-success)",
        }
    }

    pub fn background(self) -> &'static str {
        match self {
            DeadlineTier::Passed => "rgba(255, 255, 255, 0.1)",
            DeadlineTier::Urgent => "rgba(239, 68, 68, 0.2)",
            DeadlineTier::Warning => "rgba(245, 158, 11, 0.2)",
            DeadlineTier::Safe => "rgba(16, 185, 129, 0.15)",
        }
    }
}

/// Countdown to the date after which unsold tickets can no longer be returned
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeadlineInfo {
    pub deadline_date: NaiveDate,
    pub days_until_deadline: i64,
    pub status: DeadlineTier,
    pub color: String,
    pub bg_color: String,
    /// e.g. `Nov 6`
    pub formatted_deadline: String,
    pub remaining: i64,
}

/// Return-deadline signal for a show, or None when there is nothing to act on
/// (sold out, or the deadline passed more than `stale_after_days` ago).
pub fn deadline_info(
    show_date: NaiveDate,
    remaining: i64,
    now: DateTime<Utc>,
    policy: &DeadlineConfig,
) -> Option<DeadlineInfo> {
    if remaining <= 0 {
        return None;
    }

    let deadline = show_date.checked_sub_signed(Duration::try_days(policy.return_window_days)?)?;
    let deadline_at = deadline.and_hms_opt(0, 0, 0)?.and_utc();
    let days = ceil_days(deadline_at - now);
    if days < -policy.stale_after_days {
        return None;
    }

    let tier = DeadlineTier::for_days(days);
    Some(DeadlineInfo {
        deadline_date: deadline,
        days_until_deadline: days,
        status: tier,
        color: tier.color().to_string(),
        bg_color: tier.background().to_string(),
        formatted_deadline: deadline.format("%b %-d").to_string(),
        remaining,
    })
}

fn ceil_days(delta: Duration) -> i64 {
    let ms = delta.num_milliseconds();
    // Integer division truncates toward zero, which already rounds negatives up
    let days = ms / MILLIS_PER_DAY;
    if ms % MILLIS_PER_DAY > 0 {
        days + 1
    } else {
        days
    }
}

/// One ticket purchase in a person's history
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketRecord {
    #[serde(flatten)]
    pub sale: Sale,
    pub show_title: String,
    pub show_date: Option<NaiveDate>,
    pub show_time: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketHistory {
    /// Shows on or after today, latest first
    pub upcoming: Vec<TicketRecord>,
    /// Shows before today, latest first
    pub past: Vec<TicketRecord>,
    /// Counts every non-cancelled sale, including those whose show was deleted
    pub total_tickets: u32,
    pub total_spent: f64,
}

/// Non-cancelled tickets of a person split around `today`
pub fn person_history(snapshot: &Snapshot, person_id: &str, today: NaiveDate) -> TicketHistory {
    let mut records: Vec<TicketRecord> = snapshot
        .sales
        .iter()
        .filter(|s| s.person_id == person_id && s.status.counts())
        .map(|sale| {
            let show = snapshot.show(&sale.show_id);
            TicketRecord {
                sale: sale.clone(),
                show_title: show
                    .map(|s| s.title.clone())
                    .unwrap_or_else(|| UNKNOWN_SHOW.to_string()),
                show_date: show.map(|s| s.date),
                show_time: show.and_then(|s| s.time.clone()),
            }
        })
        .collect();
    records.sort_by(|a, b| b.show_date.cmp(&a.show_date));

    let total_tickets = records.iter().map(|r| r.sale.quantity).sum();
    let total_spent = records.iter().map(|r| r.sale.total_amount).sum();

    let (upcoming, past) = records
        .into_iter()
        .filter(|r| r.show_date.is_some())
        .partition(|r| r.show_date >= Some(today));

    TicketHistory {
        upcoming,
        past,
        total_tickets,
        total_spent,
    }
}
