//! Repository layer over the key-value store.
//!
//! Every collection is kept in memory and written back in full on each
//! mutation. References between records (sale to show, sale to person, ...)
//! are plain ids: lookups must tolerate a missing target.

pub mod collection;
pub mod people;
pub mod sales;
pub mod shows;
pub mod store;
pub mod waitlist;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        sale::{PaymentMethod, Sale, SaleStatus},
        waitlist::WaitlistStatus,
        Person, Show, WaitlistEntry,
    },
};

use self::{collection::Collection, store::KeyValueStore};

pub const SHOWS: &str = "shows";
pub const PEOPLE: &str = "people";
pub const SALES: &str = "sales";
pub const WAITLIST: &str = "waitlist";

/// Placeholder for a person or show that no longer exists
pub const UNKNOWN: &str = "Unknown";

pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Main repository struct holding every collection
#[derive(Clone)]
pub struct Repository {
    pub shows: shows::ShowsRepository,
    pub people: people::PeopleRepository,
    pub sales: sales::SalesRepository,
    pub waitlist: waitlist::WaitlistRepository,
    /// Serializes read-check-write sequences spanning several collections
    gate: Arc<Mutex<()>>,
}

impl Repository {
    /// Load all collections from `store`, keys namespaced as `<prefix>_<collection>`
    pub fn open(store: Arc<dyn KeyValueStore>, prefix: &str) -> AppResult<Self> {
        let key = |name: &str| format!("{}_{}", prefix, name);

        Ok(Self {
            shows: shows::ShowsRepository::new(Collection::load(store.clone(), key(SHOWS))?),
            people: people::PeopleRepository::new(Collection::load(store.clone(), key(PEOPLE))?),
            sales: sales::SalesRepository::new(Collection::load(store.clone(), key(SALES))?),
            waitlist: waitlist::WaitlistRepository::new(Collection::load(store, key(WAITLIST))?),
            gate: Arc::new(Mutex::new(())),
        })
    }

    /// Hold while checking state and then writing based on it. Not reentrant.
    pub async fn write_gate(&self) -> MutexGuard<'_, ()> {
        self.gate.lock().await
    }

    /// Consistent-enough copy of every collection for derived views
    pub async fn snapshot(&self) -> Snapshot {
        Snapshot {
            shows: self.shows.list().await,
            people: self.people.list(None).await,
            sales: self.sales.list().await,
            waitlist: self.waitlist.list().await,
        }
    }

    /// Promote a waitlist entry into a Reserved cash sale priced at the show's
    /// current price, and mark the entry Converted.
    ///
    /// Returns `None` without touching anything when the entry or its show is
    /// gone, or the entry is already Converted/Cancelled. Capacity is not checked.
    pub async fn convert_waitlist_to_sale(
        &self,
        entry_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Sale>> {
        let _gate = self.write_gate().await;
        self.convert_gated(entry_id, now).await
    }

    /// `convert_waitlist_to_sale` for callers already holding the write gate
    pub(crate) async fn convert_gated(
        &self,
        entry_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Sale>> {
        let Some(entry) = self.waitlist.find(entry_id).await else {
            return Ok(None);
        };
        if !entry.status.can_transition_to(WaitlistStatus::Converted) {
            return Ok(None);
        }
        let Some(show) = self.shows.find(&entry.show_id).await else {
            return Ok(None);
        };

        let sale = self
            .sales
            .create(Sale {
                id: new_id(),
                show_id: entry.show_id.clone(),
                person_id: entry.person_id.clone(),
                quantity: entry.quantity,
                status: SaleStatus::Reserved,
                payment_method: PaymentMethod::Cash,
                total_amount: show.price * f64::from(entry.quantity),
                sale_date: now,
                seats: Vec::new(),
            })
            .await?;

        self.waitlist
            .update(entry_id, |e| {
                e.status = WaitlistStatus::Converted;
                e.converted_at = Some(now);
            })
            .await?;

        tracing::info!("Converted waitlist entry {} into sale {}", entry_id, sale.id);
        Ok(Some(sale))
    }
}

/// Point-in-time copy of all collections
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub shows: Vec<Show>,
    pub people: Vec<Person>,
    pub sales: Vec<Sale>,
    pub waitlist: Vec<WaitlistEntry>,
}

impl Snapshot {
    pub fn show(&self, id: &str) -> Option<&Show> {
        self.shows.iter().find(|s| s.id == id)
    }

    pub fn person(&self, id: &str) -> Option<&Person> {
        self.people.iter().find(|p| p.id == id)
    }

    pub fn person_name(&self, id: &str) -> String {
        self.person(id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| UNKNOWN.to_string())
    }

    pub fn show_title(&self, id: &str) -> String {
        self.show(id)
            .map(|s| s.title.clone())
            .unwrap_or_else(|| UNKNOWN.to_string())
    }
}
