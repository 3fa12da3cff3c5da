//! Show (performance) model and related types

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

pub const DEFAULT_LOCATION: &str = "Main Theater";

/// A performance with fixed ticket capacity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Show {
    pub id: String,
    pub title: String,
    /// Performance date (YYYY-MM-DD)
    pub date: NaiveDate,
    /// Curtain time (HH:MM)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default)]
    pub price: f64,
    /// Seat capacity; sales beyond it need an explicit override
    #[serde(default)]
    pub max_tickets: i64,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub section: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Show {
    /// Curtain time, when one was recorded and parses as HH:MM
    pub fn curtain_time(&self) -> Option<NaiveTime> {
        self.time
            .as_deref()
            .and_then(|t| NaiveTime::parse_from_str(t, "%H:%M").ok())
    }
}

/// Create show request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateShow {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(required(message = "Date is required"))]
    pub date: Option<NaiveDate>,
    #[validate(custom(function = "validate_time"))]
    pub time: Option<String>,
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: Option<f64>,
    #[validate(range(min = 0, message = "Capacity cannot be negative"))]
    pub max_tickets: Option<i64>,
    pub location: Option<String>,
    pub section: Option<String>,
}

/// Update show request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShow {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: Option<String>,
    pub date: Option<NaiveDate>,
    #[validate(custom(function = "validate_time"))]
    pub time: Option<String>,
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: Option<f64>,
    #[validate(range(min = 0, message = "Capacity cannot be negative"))]
    pub max_tickets: Option<i64>,
    pub location: Option<String>,
    pub section: Option<String>,
}

impl UpdateShow {
    /// Merge the provided fields into an existing show
    pub fn apply(self, show: &mut Show) {
        if let Some(title) = self.title {
            show.title = title;
        }
        if let Some(date) = self.date {
            show.date = date;
        }
        if let Some(time) = self.time {
            show.time = if time.is_empty() { None } else { Some(time) };
        }
        if let Some(price) = self.price {
            show.price = price;
        }
        if let Some(max_tickets) = self.max_tickets {
            show.max_tickets = max_tickets;
        }
        if let Some(location) = self.location {
            show.location = location;
        }
        if let Some(section) = self.section {
            show.section = section;
        }
    }
}

fn validate_time(time: &str) -> Result<(), ValidationError> {
    if time.is_empty() || NaiveTime::parse_from_str(time, "%H:%M").is_ok() {
        Ok(())
    } else {
        let mut error = ValidationError::new("time");
        error.message = Some("Time must be HH:MM".into());
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_json_is_camel_case() {
        let json = r#"{
            "id": "s1", "title": "Hamlet", "date": "2026-11-20", "time": "19:30",
            "price": 20, "maxTickets": 30, "location": "Main Theater", "section": "South"
        }"#;
        let show: Show = serde_json::from_str(json).unwrap();
        assert_eq!(show.max_tickets, 30);
        assert_eq!(show.curtain_time(), NaiveTime::from_hms_opt(19, 30, 0));

        let value = serde_json::to_value(&show).unwrap();
        assert_eq!(value["maxTickets"], 30);
        assert!(value.get("createdAt").is_none());
    }

    #[test]
    fn test_create_show_requires_title_and_date() {
        let req = CreateShow {
            title: String::new(),
            date: None,
            time: Some("7pm".into()),
            price: Some(-1.0),
            max_tickets: None,
            location: None,
            section: None,
        };
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("date"));
        assert!(fields.contains_key("time"));
        assert!(fields.contains_key("price"));
    }

    #[test]
    fn test_update_show_merges_fields() {
        let mut show: Show = serde_json::from_str(
            r#"{"id":"s1","title":"Hamlet","date":"2026-11-20","price":20,"maxTickets":30}"#,
        )
        .unwrap();
        UpdateShow {
            price: Some(25.0),
            time: Some(String::new()),
            ..Default::default()
        }
        .apply(&mut show);
        assert_eq!(show.price, 25.0);
        assert_eq!(show.title, "Hamlet");
        assert!(show.time.is_none());
    }
}
