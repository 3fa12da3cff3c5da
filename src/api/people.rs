//! People API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::{
    error::AppResult,
    models::person::{CreatePerson, Person, PersonQuery, UpdatePerson},
    services::people::PersonHistory,
    AppState,
};

/// List people, optionally filtered by name or phone
#[utoipa::path(
    get,
    path = "/people",
    tag = "people",
    params(PersonQuery),
    responses(
        (status = 200, description = "People", body = Vec<Person>)
    )
)]
pub async fn list_people(
    State(state): State<AppState>,
    Query(query): Query<PersonQuery>,
) -> Json<Vec<Person>> {
    Json(state.services.people.list(query.search.as_deref()).await)
}

/// Get person by ID
#[utoipa::path(
    get,
    path = "/people/{id}",
    tag = "people",
    params(("id" = String, Path, description = "Person ID")),
    responses(
        (status = 200, description = "Person details", body = Person),
        (status = 404, description = "Person not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_person(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Person>> {
    let person = state.services.people.get(&id).await?;
    Ok(Json(person))
}

/// Create a person
#[utoipa::path(
    post,
    path = "/people",
    tag = "people",
    request_body = CreatePerson,
    responses(
        (status = 201, description = "Person created", body = Person),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_person(
    State(state): State<AppState>,
    Json(data): Json<CreatePerson>,
) -> AppResult<(StatusCode, Json<Person>)> {
    let person = state.services.people.create(data, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(person)))
}

/// Update a person
#[utoipa::path(
    put,
    path = "/people/{id}",
    tag = "people",
    params(("id" = String, Path, description = "Person ID")),
    request_body = UpdatePerson,
    responses(
        (status = 200, description = "Person updated", body = Person)
    )
)]
pub async fn update_person(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(data): Json<UpdatePerson>,
) -> AppResult<Json<Person>> {
    let person = state.services.people.update(&id, data).await?;
    Ok(Json(person))
}

/// Delete a person (their sales are kept)
#[utoipa::path(
    delete,
    path = "/people/{id}",
    tag = "people",
    params(("id" = String, Path, description = "Person ID")),
    responses(
        (status = 204, description = "Person deleted")
    )
)]
pub async fn delete_person(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.services.people.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Ticket history of a person, split into upcoming and past shows
#[utoipa::path(
    get,
    path = "/people/{id}/history",
    tag = "people",
    params(("id" = String, Path, description = "Person ID")),
    responses(
        (status = 200, description = "Ticket history", body = PersonHistory)
    )
)]
pub async fn get_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<PersonHistory>> {
    let history = state
        .services
        .people
        .history(&id, Utc::now().date_naive())
        .await?;
    Ok(Json(history))
}
