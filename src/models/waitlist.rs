//! Waitlist model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::person::Person;

/// Waitlist entry status.
///
/// `Waiting -> Notified -> Converted`, or `Waiting|Notified -> Cancelled`.
/// Converted and Cancelled are terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum WaitlistStatus {
    #[default]
    Waiting,
    Notified,
    Converted,
    Cancelled,
}

impl WaitlistStatus {
    pub fn is_active(self) -> bool {
        matches!(self, WaitlistStatus::Waiting | WaitlistStatus::Notified)
    }

    pub fn can_transition_to(self, next: WaitlistStatus) -> bool {
        use WaitlistStatus::*;
        matches!(
            (self, next),
            (Waiting, Notified) | (Waiting, Converted) | (Notified, Converted) | (Waiting, Cancelled) | (Notified, Cancelled)
        )
    }
}

impl std::fmt::Display for WaitlistStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Customer waiting for tickets to a show
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistEntry {
    pub id: String,
    pub show_id: String,
    pub person_id: String,
    pub quantity: u32,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub status: WaitlistStatus,
    pub added_at: DateTime<Utc>,
    #[serde(default)]
    pub notified_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub converted_at: Option<DateTime<Utc>>,
}

/// Add-to-waitlist request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateWaitlistEntry {
    #[validate(required(message = "A customer must be selected"))]
    pub person_id: Option<String>,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: Option<u32>,
    pub notes: Option<String>,
}

/// Update waitlist entry request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateWaitlistEntry {
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: Option<u32>,
    pub notes: Option<String>,
}

/// Conversion request; `force` converts despite too few remaining tickets
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ConvertWaitlistEntry {
    #[serde(default)]
    pub force: bool,
}

/// Active waitlist entry with its person resolved (None when deleted)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WaitlistEntryDetails {
    #[serde(flatten)]
    pub entry: WaitlistEntry,
    pub person: Option<Person>,
}
