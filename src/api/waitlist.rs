//! Waitlist API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::{
    error::AppResult,
    models::{
        waitlist::{ConvertWaitlistEntry, UpdateWaitlistEntry, WaitlistEntry},
        Sale,
    },
    AppState,
};

/// Change quantity or notes of a waitlist entry
#[utoipa::path(
    put,
    path = "/waitlist/{id}",
    tag = "waitlist",
    params(("id" = String, Path, description = "Waitlist entry ID")),
    request_body = UpdateWaitlistEntry,
    responses(
        (status = 200, description = "Entry updated", body = WaitlistEntry),
        (status = 409, description = "Entry already converted or cancelled", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(data): Json<UpdateWaitlistEntry>,
) -> AppResult<Json<WaitlistEntry>> {
    let entry = state.services.waitlist.update(&id, data).await?;
    Ok(Json(entry))
}

/// Delete a waitlist entry
#[utoipa::path(
    delete,
    path = "/waitlist/{id}",
    tag = "waitlist",
    params(("id" = String, Path, description = "Waitlist entry ID")),
    responses(
        (status = 204, description = "Entry deleted")
    )
)]
pub async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.services.waitlist.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Mark the customer as told that tickets are available
#[utoipa::path(
    post,
    path = "/waitlist/{id}/notify",
    tag = "waitlist",
    params(("id" = String, Path, description = "Waitlist entry ID")),
    responses(
        (status = 200, description = "Entry notified", body = WaitlistEntry),
        (status = 409, description = "Entry already converted or cancelled", body = crate::error::ErrorResponse)
    )
)]
pub async fn notify_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<WaitlistEntry>> {
    let entry = state.services.waitlist.notify(&id, Utc::now()).await?;
    Ok(Json(entry))
}

/// Take an entry off the waitlist without selling
#[utoipa::path(
    post,
    path = "/waitlist/{id}/cancel",
    tag = "waitlist",
    params(("id" = String, Path, description = "Waitlist entry ID")),
    responses(
        (status = 200, description = "Entry cancelled", body = WaitlistEntry),
        (status = 409, description = "Entry already converted or cancelled", body = crate::error::ErrorResponse)
    )
)]
pub async fn cancel_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<WaitlistEntry>> {
    let entry = state.services.waitlist.cancel(&id).await?;
    Ok(Json(entry))
}

/// Convert an entry into a reserved sale
#[utoipa::path(
    post,
    path = "/waitlist/{id}/convert",
    tag = "waitlist",
    params(("id" = String, Path, description = "Waitlist entry ID"), ConvertWaitlistEntry),
    responses(
        (status = 201, description = "Sale created", body = Sale),
        (status = 409, description = "Not enough tickets left or entry closed", body = crate::error::ErrorResponse)
    )
)]
pub async fn convert_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(options): Query<ConvertWaitlistEntry>,
) -> AppResult<(StatusCode, Json<Sale>)> {
    let sale = state
        .services
        .waitlist
        .convert(&id, options.force, Utc::now())
        .await?;
    Ok((StatusCode::CREATED, Json(sale)))
}
