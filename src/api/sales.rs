//! Sales API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::{
    error::AppResult,
    models::sale::{AssignSeats, CreateSale, Sale, SaleDetails, SaleQuery, UpdateSale},
    AppState,
};

/// List sales with customer and show resolved
#[utoipa::path(
    get,
    path = "/sales",
    tag = "sales",
    params(SaleQuery),
    responses(
        (status = 200, description = "Sales", body = Vec<SaleDetails>)
    )
)]
pub async fn list_sales(
    State(state): State<AppState>,
    Query(query): Query<SaleQuery>,
) -> Json<Vec<SaleDetails>> {
    Json(state.services.sales.list(&query).await)
}

/// Get sale by ID
#[utoipa::path(
    get,
    path = "/sales/{id}",
    tag = "sales",
    params(("id" = String, Path, description = "Sale ID")),
    responses(
        (status = 200, description = "Sale details", body = SaleDetails),
        (status = 404, description = "Sale not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_sale(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<SaleDetails>> {
    let sale = state.services.sales.get(&id).await?;
    Ok(Json(sale))
}

/// Record a sale
#[utoipa::path(
    post,
    path = "/sales",
    tag = "sales",
    request_body = CreateSale,
    responses(
        (status = 201, description = "Sale created", body = Sale),
        (status = 409, description = "Not enough tickets left or seat taken", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_sale(
    State(state): State<AppState>,
    Json(data): Json<CreateSale>,
) -> AppResult<(StatusCode, Json<Sale>)> {
    let sale = state.services.sales.create(data, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

/// Update a sale
#[utoipa::path(
    put,
    path = "/sales/{id}",
    tag = "sales",
    params(("id" = String, Path, description = "Sale ID")),
    request_body = UpdateSale,
    responses(
        (status = 200, description = "Sale updated", body = Sale),
        (status = 409, description = "Not enough tickets left or seat taken", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_sale(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(data): Json<UpdateSale>,
) -> AppResult<Json<Sale>> {
    let sale = state.services.sales.update(&id, data).await?;
    Ok(Json(sale))
}

/// Delete a sale
#[utoipa::path(
    delete,
    path = "/sales/{id}",
    tag = "sales",
    params(("id" = String, Path, description = "Sale ID")),
    responses(
        (status = 204, description = "Sale deleted")
    )
)]
pub async fn delete_sale(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.services.sales.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Replace the seats of a sale
#[utoipa::path(
    put,
    path = "/sales/{id}/seats",
    tag = "seating",
    params(("id" = String, Path, description = "Sale ID")),
    request_body = AssignSeats,
    responses(
        (status = 200, description = "Seats assigned", body = Sale),
        (status = 409, description = "Seat already taken", body = crate::error::ErrorResponse)
    )
)]
pub async fn assign_seats(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(data): Json<AssignSeats>,
) -> AppResult<Json<Sale>> {
    let sale = state.services.sales.assign_seats(&id, data.seats).await?;
    Ok(Json(sale))
}
