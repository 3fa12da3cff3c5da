//! Sale (ticket order) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Sale lifecycle status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub enum SaleStatus {
    #[default]
    Reserved,
    Paid,
    Cancelled,
    Waitlist,
}

impl SaleStatus {
    /// Cancelled sales are kept for audit but never count toward occupancy or revenue
    pub fn counts(self) -> bool {
        self != SaleStatus::Cancelled
    }
}

impl std::fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SaleStatus::Reserved => "Reserved",
            SaleStatus::Paid => "Paid",
            SaleStatus::Cancelled => "Cancelled",
            SaleStatus::Waitlist => "Waitlist",
        };
        write!(f, "{}", label)
    }
}

/// How a sale was (or will be) paid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum PaymentMethod {
    #[default]
    Cash,
    Check,
    Venmo,
    #[serde(rename = "Credit Card")]
    CreditCard,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Check => "Check",
            PaymentMethod::Venmo => "Venmo",
            PaymentMethod::CreditCard => "Credit Card",
        };
        write!(f, "{}", label)
    }
}

/// A seat attributed to a sale. Identity is `(row, seat_number)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    pub row: String,
    #[serde(alias = "seat")]
    pub seat_number: u32,
    #[serde(default)]
    pub section: String,
}

impl Seat {
    pub fn new(row: impl Into<String>, seat_number: u32, section: impl Into<String>) -> Self {
        Self {
            row: row.into(),
            seat_number,
            section: section.into(),
        }
    }

    pub fn key(&self) -> (String, u32) {
        (self.row.clone(), self.seat_number)
    }

    pub fn same_place(&self, row: &str, seat_number: u32) -> bool {
        self.row == row && self.seat_number == seat_number
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.row, self.seat_number)
    }
}

/// Render seats the way tickets print them, e.g. `South B9, B8`
pub fn format_seats(seats: &[Seat]) -> Option<String> {
    let first = seats.first()?;
    let section = if first.section.is_empty() { "SOUTH" } else { first.section.as_str() };
    let list = seats
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    Some(format!("{} {}", section, list))
}

/// Ticket sale record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    pub show_id: String,
    pub person_id: String,
    pub quantity: u32,
    #[serde(default)]
    pub status: SaleStatus,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    /// Show price times quantity, captured when the sale was written
    #[serde(default)]
    pub total_amount: f64,
    pub sale_date: DateTime<Utc>,
    #[serde(default)]
    pub seats: Vec<Seat>,
}

/// Create sale request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSale {
    #[validate(required(message = "A show must be selected"))]
    pub show_id: Option<String>,
    #[validate(required(message = "A customer must be selected"))]
    pub person_id: Option<String>,
    /// Defaults to the number of seats, or 1
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: Option<u32>,
    pub status: Option<SaleStatus>,
    pub payment_method: Option<PaymentMethod>,
    pub seats: Option<Vec<Seat>>,
    /// Sell even when fewer tickets remain than requested
    #[serde(default)]
    pub confirm_overbooking: bool,
}

/// Update sale request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSale {
    pub show_id: Option<String>,
    pub person_id: Option<String>,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: Option<u32>,
    pub status: Option<SaleStatus>,
    pub payment_method: Option<PaymentMethod>,
    pub seats: Option<Vec<Seat>>,
    #[serde(default)]
    pub confirm_overbooking: bool,
}

/// Seat assignment request for an existing sale
#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignSeats {
    pub seats: Vec<Seat>,
}

/// Sortable columns of the sales list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum SaleSortKey {
    #[default]
    SaleDate,
    PersonName,
    ShowTitle,
    Quantity,
    Status,
    TotalAmount,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Query parameters for the sales list
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct SaleQuery {
    pub sort: Option<SaleSortKey>,
    pub direction: Option<SortDirection>,
}

/// Sale with its soft references resolved for display
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleDetails {
    #[serde(flatten)]
    pub sale: Sale,
    pub person_name: String,
    pub show_title: String,
    /// Empty when the show no longer exists
    pub show_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seat_label: Option<String>,
}
