//! People service: customer records and their ticket history

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        person::{CreatePerson, UpdatePerson},
        Person,
    },
    repository::Repository,
};

use super::availability::{self, TicketHistory};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PersonHistory {
    pub person: Person,
    #[serde(flatten)]
    pub history: TicketHistory,
}

#[derive(Clone)]
pub struct PeopleService {
    repository: Repository,
}

impl PeopleService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All people, or those whose name or phone contains `search`
    pub async fn list(&self, search: Option<&str>) -> Vec<Person> {
        self.repository.people.list(search).await
    }

    pub async fn get(&self, id: &str) -> AppResult<Person> {
        self.repository.people.get_by_id(id).await
    }

    pub async fn create(&self, data: CreatePerson, now: DateTime<Utc>) -> AppResult<Person> {
        data.validate()?;
        let person = self.repository.people.create(data, now).await?;
        tracing::info!("Created person {}", person.id);
        Ok(person)
    }

    pub async fn update(&self, id: &str, data: UpdatePerson) -> AppResult<Person> {
        data.validate()?;
        self.repository.people.update(id, data).await
    }

    /// Remove a person; their sales remain and list as `Unknown`
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.repository.people.delete(id).await?;
        tracing::info!("Deleted person {}", id);
        Ok(())
    }

    pub async fn history(&self, id: &str, today: NaiveDate) -> AppResult<PersonHistory> {
        let snapshot = self.repository.snapshot().await;
        let person = snapshot
            .person(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Person with id {} not found", id)))?;

        Ok(PersonHistory {
            history: availability::person_history(&snapshot, id, today),
            person,
        })
    }
}
