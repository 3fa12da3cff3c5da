//! Reports API endpoints

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Datelike, Utc};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    error::AppResult,
    services::reports::{PeriodKind, Report, ReportPeriod},
    AppState,
};

/// Report period; missing values default to the current month or year
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ReportQuery {
    /// `month` (default) or `year`
    pub period: Option<PeriodKind>,
    pub year: Option<i32>,
    /// 1-12
    pub month: Option<u32>,
}

impl ReportQuery {
    pub fn resolve(&self, now: DateTime<Utc>) -> AppResult<ReportPeriod> {
        ReportPeriod::new(
            self.period.unwrap_or_default(),
            self.year.unwrap_or(now.year()),
            self.month.unwrap_or(now.month()),
        )
    }
}

/// Sales and totals for a month or a year
#[utoipa::path(
    get,
    path = "/reports",
    tag = "reports",
    params(ReportQuery),
    responses(
        (status = 200, description = "Report", body = Report),
        (status = 400, description = "Invalid period", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<Report>> {
    let period = query.resolve(Utc::now())?;
    Ok(Json(state.services.reports.report(period).await))
}

/// Download the report as CSV
#[utoipa::path(
    get,
    path = "/reports/export",
    tag = "reports",
    params(ReportQuery),
    responses(
        (status = 200, description = "CSV file", content_type = "text/csv", body = String)
    )
)]
pub async fn export_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<impl IntoResponse> {
    let now = Utc::now();
    let period = query.resolve(now)?;
    let (file_name, body) = state.services.reports.export_csv(period, now).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        body,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_query_defaults_to_current_month() {
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 10, 0, 0).unwrap();
        let period = ReportQuery::default().resolve(now).unwrap();
        assert_eq!(period.label(), "October 2026");

        let year = ReportQuery {
            period: Some(PeriodKind::Year),
            year: Some(2025),
            month: None,
        };
        assert_eq!(year.resolve(now).unwrap().label(), "2025");
    }
}
