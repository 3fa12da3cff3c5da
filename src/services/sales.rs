//! Sales service: ticket sales with capacity checks and seat assignment

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        sale::{
            format_seats, CreateSale, Sale, SaleDetails, SaleQuery, SaleSortKey, SaleStatus,
            Seat, SortDirection, UpdateSale,
        },
        Show,
    },
    repository::{new_id, Repository, Snapshot},
};

use super::{availability, seating::SeatingService};

/// Sale with buyer name, show title and show date resolved
pub fn sale_details(snapshot: &Snapshot, sale: &Sale) -> SaleDetails {
    SaleDetails {
        sale: sale.clone(),
        person_name: snapshot.person_name(&sale.person_id),
        show_title: snapshot.show_title(&sale.show_id),
        show_date: snapshot
            .show(&sale.show_id)
            .map(|s| s.date.to_string())
            .unwrap_or_default(),
        seat_label: format_seats(&sale.seats),
    }
}

fn compare(a: &SaleDetails, b: &SaleDetails, key: SaleSortKey) -> Ordering {
    match key {
        SaleSortKey::SaleDate => a.sale.sale_date.cmp(&b.sale.sale_date),
        SaleSortKey::PersonName => a.person_name.to_lowercase().cmp(&b.person_name.to_lowercase()),
        SaleSortKey::ShowTitle => a.show_title.to_lowercase().cmp(&b.show_title.to_lowercase()),
        SaleSortKey::Quantity => a.sale.quantity.cmp(&b.sale.quantity),
        SaleSortKey::Status => a.sale.status.to_string().cmp(&b.sale.status.to_string()),
        SaleSortKey::TotalAmount => a
            .sale
            .total_amount
            .partial_cmp(&b.sale.total_amount)
            .unwrap_or(Ordering::Equal),
    }
}

/// Refuse `quantity` tickets beyond what is left unless the clerk confirmed.
/// Waitlist and cancelled sales never consume capacity.
fn check_capacity(
    sales: &[Sale],
    show: &Show,
    quantity: u32,
    status: SaleStatus,
    excluding_sale: Option<&str>,
    confirmed: bool,
) -> AppResult<()> {
    if confirmed || !status.counts() || status == SaleStatus::Waitlist {
        return Ok(());
    }

    let others: Vec<Sale> = sales
        .iter()
        .filter(|s| excluding_sale != Some(s.id.as_str()))
        .cloned()
        .collect();
    let available = availability::remaining(show, &availability::show_stats(&others, &show.id));
    if i64::from(quantity) > available {
        return Err(AppError::Capacity {
            requested: quantity,
            available,
        });
    }
    Ok(())
}

#[derive(Clone)]
pub struct SalesService {
    repository: Repository,
    seating: SeatingService,
}

impl SalesService {
    pub fn new(repository: Repository, seating: SeatingService) -> Self {
        Self { repository, seating }
    }

    /// Every sale, enriched and sorted (newest first by default)
    pub async fn list(&self, query: &SaleQuery) -> Vec<SaleDetails> {
        let snapshot = self.repository.snapshot().await;
        let key = query.sort.unwrap_or_default();
        let direction = query.direction.unwrap_or_default();

        let mut sales: Vec<SaleDetails> = snapshot
            .sales
            .iter()
            .map(|sale| sale_details(&snapshot, sale))
            .collect();
        sales.sort_by(|a, b| match direction {
            SortDirection::Asc => compare(a, b, key),
            SortDirection::Desc => compare(b, a, key),
        });
        sales
    }

    pub async fn get(&self, id: &str) -> AppResult<SaleDetails> {
        let snapshot = self.repository.snapshot().await;
        snapshot
            .sales
            .iter()
            .find(|s| s.id == id)
            .map(|sale| sale_details(&snapshot, sale))
            .ok_or_else(|| AppError::NotFound(format!("Sale with id {} not found", id)))
    }

    /// Record a sale at the show's current price
    pub async fn create(&self, data: CreateSale, now: DateTime<Utc>) -> AppResult<Sale> {
        data.validate()?;
        let (Some(show_id), Some(person_id)) = (data.show_id, data.person_id) else {
            return Err(AppError::Validation("Show and customer are required".to_string()));
        };

        let _gate = self.repository.write_gate().await;
        let show = self.repository.shows.get_by_id(&show_id).await?;
        self.repository.people.get_by_id(&person_id).await?;

        let seats = data.seats.unwrap_or_default();
        let quantity = match data.quantity {
            Some(q) => q,
            None if !seats.is_empty() => seats.len() as u32,
            None => 1,
        };
        let status = data.status.unwrap_or_default();

        let sales = self.repository.sales.list().await;
        check_capacity(&sales, &show, quantity, status, None, data.confirm_overbooking)?;
        let seats = self.checked_seats(&sales, &show, seats, quantity, status, None)?;

        let sale = self
            .repository
            .sales
            .create(Sale {
                id: new_id(),
                show_id,
                person_id,
                quantity,
                status,
                payment_method: data.payment_method.unwrap_or_default(),
                total_amount: show.price * f64::from(quantity),
                sale_date: now,
                seats,
            })
            .await?;

        tracing::info!(
            "Sold {} tickets for {} to {} ({})",
            sale.quantity,
            show.title,
            sale.person_id,
            sale.status
        );
        Ok(sale)
    }

    /// Edit a sale. The amount is repriced only when the quantity or the show changes.
    pub async fn update(&self, id: &str, data: UpdateSale) -> AppResult<Sale> {
        data.validate()?;
        let _gate = self.repository.write_gate().await;
        let existing = self.repository.sales.get_by_id(id).await?;

        let show_id = data.show_id.unwrap_or_else(|| existing.show_id.clone());
        let show_changed = show_id != existing.show_id;
        let show = self.repository.shows.get_by_id(&show_id).await?;

        let person_id = data.person_id.unwrap_or_else(|| existing.person_id.clone());
        if person_id != existing.person_id {
            self.repository.people.get_by_id(&person_id).await?;
        }

        let seats = match data.seats {
            Some(seats) => seats,
            None if show_changed => Vec::new(),
            None => existing.seats.clone(),
        };
        let quantity = match data.quantity {
            Some(q) => q,
            None if seats_changed(&seats, &existing) => seats.len() as u32,
            None => existing.quantity,
        };
        let status = data.status.unwrap_or(existing.status);

        let sales = self.repository.sales.list().await;
        check_capacity(&sales, &show, quantity, status, Some(id), data.confirm_overbooking)?;
        let seats = self.checked_seats(&sales, &show, seats, quantity, status, Some(id))?;

        let reprice = show_changed || quantity != existing.quantity;
        let payment_method = data.payment_method.unwrap_or(existing.payment_method);

        self.repository
            .sales
            .update(id, |sale| {
                sale.show_id = show_id;
                sale.person_id = person_id;
                sale.quantity = quantity;
                sale.status = status;
                sale.payment_method = payment_method;
                sale.seats = seats;
                if reprice {
                    sale.total_amount = show.price * f64::from(quantity);
                }
            })
            .await
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.repository.sales.delete(id).await?;
        tracing::info!("Deleted sale {}", id);
        Ok(())
    }

    pub async fn assign_seats(&self, id: &str, seats: Vec<Seat>) -> AppResult<Sale> {
        self.seating.assign(id, seats).await
    }

    /// Cancelled sales hold no seats, so their picks are not checked against
    /// the house
    fn checked_seats(
        &self,
        sales: &[Sale],
        show: &Show,
        seats: Vec<Seat>,
        quantity: u32,
        status: SaleStatus,
        sale_id: Option<&str>,
    ) -> AppResult<Vec<Seat>> {
        if seats.is_empty() || !status.counts() {
            return Ok(seats);
        }
        self.seating.check_seats(sales, show, seats, quantity, sale_id)
    }
}

/// New seats were picked on an edit that did not state a quantity
fn seats_changed(seats: &[Seat], existing: &Sale) -> bool {
    !seats.is_empty() && seats != existing.seats.as_slice()
}
