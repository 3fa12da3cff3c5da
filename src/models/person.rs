//! Person (customer) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// A customer of the box office
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Person {
    /// Case-insensitive name match, or raw phone substring match
    pub fn matches(&self, term: &str) -> bool {
        self.name.to_lowercase().contains(&term.to_lowercase())
            || (!self.phone.is_empty() && self.phone.contains(term))
    }
}

/// Create person request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePerson {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

/// Update person request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdatePerson {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

impl UpdatePerson {
    pub fn apply(self, person: &mut Person) {
        if let Some(name) = self.name {
            person.name = name;
        }
        if let Some(phone) = self.phone {
            person.phone = phone;
        }
        if let Some(email) = self.email {
            person.email = email;
        }
        if let Some(address) = self.address {
            person.address = address;
        }
        if let Some(notes) = self.notes {
            person.notes = notes;
        }
    }
}

/// Query parameters for people
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct PersonQuery {
    /// Filter by name (case-insensitive) or phone
    pub search: Option<String>,
}
