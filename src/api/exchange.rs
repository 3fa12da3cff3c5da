//! Export/import API endpoints

use axum::{body::Bytes, extract::State, http::header, response::IntoResponse, Json};
use chrono::Utc;

use crate::{
    error::AppResult,
    models::{ExportDocument, ImportReport},
    services::exchange::backup_file_name,
    AppState,
};

/// Download shows, people and sales as one JSON document
#[utoipa::path(
    get,
    path = "/export",
    tag = "exchange",
    responses(
        (status = 200, description = "Backup document", body = ExportDocument)
    )
)]
pub async fn export_data(State(state): State<AppState>) -> impl IntoResponse {
    let now = Utc::now();
    let doc = state.services.exchange.export(now).await;
    (
        [(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", backup_file_name(now)),
        )],
        Json(doc),
    )
}

/// Restore from a backup document
#[utoipa::path(
    post,
    path = "/import",
    tag = "exchange",
    request_body(content = ExportDocument, content_type = "application/json"),
    responses(
        (status = 200, description = "Collections replaced", body = ImportReport),
        (status = 400, description = "Invalid JSON file", body = crate::error::ErrorResponse)
    )
)]
pub async fn import_data(State(state): State<AppState>, body: Bytes) -> AppResult<Json<ImportReport>> {
    let report = state.services.exchange.import(&body).await?;
    Ok(Json(report))
}
