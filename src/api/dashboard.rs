//! Dashboard API endpoint

use axum::{extract::State, Json};
use chrono::Utc;

use crate::{services::dashboard::Dashboard, AppState};

/// Headline figures: revenue, trends, deadlines, unpaid and recent sales
#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "dashboard",
    responses(
        (status = 200, description = "Dashboard", body = Dashboard)
    )
)]
pub async fn get_dashboard(State(state): State<AppState>) -> Json<Dashboard> {
    Json(state.services.dashboard.get(Utc::now()).await)
}
