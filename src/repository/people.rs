//! People repository

use chrono::{DateTime, Utc};

use super::collection::{Collection, Record};
use crate::{
    error::{AppError, AppResult},
    models::person::{CreatePerson, Person, UpdatePerson},
};

impl Record for Person {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Clone)]
pub struct PeopleRepository {
    people: Collection<Person>,
}

impl PeopleRepository {
    pub fn new(people: Collection<Person>) -> Self {
        Self { people }
    }

    /// List people, optionally filtered by name or phone
    pub async fn list(&self, search: Option<&str>) -> Vec<Person> {
        match search.map(str::trim).filter(|s| !s.is_empty()) {
            Some(term) => self.people.filter(|p| p.matches(term)).await,
            None => self.people.all().await,
        }
    }

    pub async fn find(&self, id: &str) -> Option<Person> {
        self.people.find(id).await
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<Person> {
        self.find(id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Person with id {} not found", id)))
    }

    pub async fn create(&self, data: CreatePerson, now: DateTime<Utc>) -> AppResult<Person> {
        let person = Person {
            id: super::new_id(),
            name: data.name,
            phone: data.phone.unwrap_or_default(),
            email: data.email.unwrap_or_default(),
            address: data.address.unwrap_or_default(),
            notes: data.notes.unwrap_or_default(),
            created_at: Some(now),
        };

        self.people.insert(person.clone()).await?;
        Ok(person)
    }

    pub async fn update(&self, id: &str, data: UpdatePerson) -> AppResult<Person> {
        self.people
            .update(id, |person| data.apply(person))
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Person with id {} not found", id)))
    }

    /// Delete a person; their sales keep the dangling reference. Returns the remaining people.
    pub async fn delete(&self, id: &str) -> AppResult<Vec<Person>> {
        self.people
            .remove(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Person with id {} not found", id)))
    }

    pub async fn replace_all(&self, people: Vec<Person>) -> AppResult<Vec<Person>> {
        self.people.replace_all(people).await
    }
}
