//! Shows API endpoints: catalogue, attendee page, seating chart and waitlist

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    error::AppResult,
    models::{
        show::{CreateShow, Show, UpdateShow},
        waitlist::{CreateWaitlistEntry, WaitlistEntry, WaitlistEntryDetails},
    },
    services::{
        seating::{SeatMap, ToggleOutcome, ToggleSeat},
        shows::{AttendeesPage, ShowSummary},
    },
    AppState,
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct SeatMapQuery {
    /// Sale being edited: its seats show as selected
    pub sale_id: Option<String>,
}

/// List shows with occupancy and return deadline
#[utoipa::path(
    get,
    path = "/shows",
    tag = "shows",
    responses(
        (status = 200, description = "All shows", body = Vec<ShowSummary>)
    )
)]
pub async fn list_shows(State(state): State<AppState>) -> Json<Vec<ShowSummary>> {
    Json(state.services.shows.list(Utc::now()).await)
}

/// Get show by ID
#[utoipa::path(
    get,
    path = "/shows/{id}",
    tag = "shows",
    params(("id" = String, Path, description = "Show ID")),
    responses(
        (status = 200, description = "Show details", body = ShowSummary),
        (status = 404, description = "Show not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ShowSummary>> {
    let show = state.services.shows.get(&id, Utc::now()).await?;
    Ok(Json(show))
}

/// Create a show
#[utoipa::path(
    post,
    path = "/shows",
    tag = "shows",
    request_body = CreateShow,
    responses(
        (status = 201, description = "Show created", body = Show),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_show(
    State(state): State<AppState>,
    Json(data): Json<CreateShow>,
) -> AppResult<(StatusCode, Json<Show>)> {
    let show = state.services.shows.create(data, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(show)))
}

/// Update a show
#[utoipa::path(
    put,
    path = "/shows/{id}",
    tag = "shows",
    params(("id" = String, Path, description = "Show ID")),
    request_body = UpdateShow,
    responses(
        (status = 200, description = "Show updated", body = Show)
    )
)]
pub async fn update_show(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(data): Json<UpdateShow>,
) -> AppResult<Json<Show>> {
    let show = state.services.shows.update(&id, data).await?;
    Ok(Json(show))
}

/// Delete a show (its sales are kept)
#[utoipa::path(
    delete,
    path = "/shows/{id}",
    tag = "shows",
    params(("id" = String, Path, description = "Show ID")),
    responses(
        (status = 204, description = "Show deleted")
    )
)]
pub async fn delete_show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.services.shows.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Attendees, totals, waitlist and seating chart of a show
#[utoipa::path(
    get,
    path = "/shows/{id}/attendees",
    tag = "shows",
    params(("id" = String, Path, description = "Show ID")),
    responses(
        (status = 200, description = "Attendee page", body = AttendeesPage)
    )
)]
pub async fn get_attendees(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<AttendeesPage>> {
    let page = state.services.shows.attendees(&id, Utc::now()).await?;
    Ok(Json(page))
}

/// Seating chart of a show
#[utoipa::path(
    get,
    path = "/shows/{id}/seats",
    tag = "seating",
    params(("id" = String, Path, description = "Show ID"), SeatMapQuery),
    responses(
        (status = 200, description = "Seat map", body = SeatMap)
    )
)]
pub async fn get_seat_map(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<SeatMapQuery>,
) -> AppResult<Json<SeatMap>> {
    let map = state
        .services
        .seating
        .seat_map(&id, query.sale_id.as_deref())
        .await?;
    Ok(Json(map))
}

/// Toggle one seat of a selection in progress
#[utoipa::path(
    post,
    path = "/shows/{id}/seats/toggle",
    tag = "seating",
    params(("id" = String, Path, description = "Show ID")),
    request_body = ToggleSeat,
    responses(
        (status = 200, description = "Updated selection", body = ToggleOutcome)
    )
)]
pub async fn toggle_seat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ToggleSeat>,
) -> AppResult<Json<ToggleOutcome>> {
    let outcome = state.services.seating.toggle(&id, request).await?;
    Ok(Json(outcome))
}

/// Active waitlist of a show, oldest first
#[utoipa::path(
    get,
    path = "/shows/{id}/waitlist",
    tag = "waitlist",
    params(("id" = String, Path, description = "Show ID")),
    responses(
        (status = 200, description = "Waiting and notified entries", body = Vec<WaitlistEntryDetails>)
    )
)]
pub async fn get_waitlist(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<WaitlistEntryDetails>>> {
    let entries = state.services.waitlist.for_show(&id).await?;
    Ok(Json(entries))
}

/// Put a customer on a show's waitlist
#[utoipa::path(
    post,
    path = "/shows/{id}/waitlist",
    tag = "waitlist",
    params(("id" = String, Path, description = "Show ID")),
    request_body = CreateWaitlistEntry,
    responses(
        (status = 201, description = "Entry added", body = WaitlistEntry)
    )
)]
pub async fn add_to_waitlist(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(data): Json<CreateWaitlistEntry>,
) -> AppResult<(StatusCode, Json<WaitlistEntry>)> {
    let entry = state.services.waitlist.add(&id, data, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}
