//! Reports service: sales over a month or a year, with CSV export

use std::collections::HashSet;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::sale::Sale,
    repository::{Repository, Snapshot, UNKNOWN},
};

use super::availability::UNKNOWN_SHOW;

const TOP_SHOWS: usize = 5;

const CSV_HEADER: [&str; 9] = [
    "Date",
    "Customer",
    "Show",
    "Show Date",
    "Quantity",
    "Status",
    "Payment Method",
    "Total Amount",
    "Ticket ID",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    #[default]
    Month,
    Year,
}

/// Calendar month or year a report covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct ReportPeriod {
    pub kind: PeriodKind,
    pub year: i32,
    /// 1-12, ignored for yearly reports
    pub month: u32,
}

impl ReportPeriod {
    pub fn new(kind: PeriodKind, year: i32, month: u32) -> AppResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(AppError::Validation(format!("Invalid month {}", month)));
        }
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(AppError::Validation(format!("Invalid year {}", year)));
        }
        Ok(Self { kind, year, month })
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        match self.kind {
            PeriodKind::Month => at.year() == self.year && at.month() == self.month,
            PeriodKind::Year => at.year() == self.year,
        }
    }

    /// `October 2026` or `2026`
    pub fn label(&self) -> String {
        match self.kind {
            PeriodKind::Month => NaiveDate::from_ymd_opt(self.year, self.month, 1)
                .map(|d| d.format("%B %Y").to_string())
                .unwrap_or_else(|| self.year.to_string()),
            PeriodKind::Year => self.year.to_string(),
        }
    }

    /// Download name, e.g. `haletix-report-october-2026.csv`
    pub fn file_name(&self) -> String {
        let slug = self
            .label()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
            .to_lowercase();
        format!("haletix-report-{}.csv", slug)
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportSale {
    #[serde(flatten)]
    pub sale: Sale,
    pub show_title: String,
    /// Falls back to the sale date when the show is gone
    pub show_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShowTotal {
    pub show_id: String,
    pub title: String,
    pub date: NaiveDate,
    pub tickets: u32,
    pub revenue: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub period: ReportPeriod,
    pub label: String,
    /// Newest first
    pub sales: Vec<ReportSale>,
    pub total_tickets: u32,
    pub total_revenue: f64,
    pub unique_shows: usize,
    /// Revenue per ticket with two decimals
    pub avg_price: String,
    pub top_shows: Vec<ShowTotal>,
}

/// Non-cancelled sales made within `period`, with totals
pub fn build_report(snapshot: &Snapshot, period: ReportPeriod) -> Report {
    let mut sales: Vec<ReportSale> = snapshot
        .sales
        .iter()
        .filter(|s| s.status.counts() && period.contains(s.sale_date))
        .map(|sale| {
            let show = snapshot.show(&sale.show_id);
            ReportSale {
                sale: sale.clone(),
                show_title: show
                    .map(|s| s.title.clone())
                    .unwrap_or_else(|| UNKNOWN_SHOW.to_string()),
                show_date: show.map(|s| s.date).unwrap_or_else(|| sale.sale_date.date_naive()),
            }
        })
        .collect();
    sales.sort_by(|a, b| b.sale.sale_date.cmp(&a.sale.sale_date));

    let total_tickets: u32 = sales.iter().map(|s| s.sale.quantity).sum();
    let total_revenue: f64 = sales.iter().map(|s| s.sale.total_amount).sum();
    let unique_shows = sales
        .iter()
        .map(|s| s.sale.show_id.as_str())
        .collect::<HashSet<_>>()
        .len();
    let avg_price = if total_tickets > 0 {
        format!("{:.2}", total_revenue / f64::from(total_tickets))
    } else {
        "0.00".to_string()
    };

    let mut top_shows: Vec<ShowTotal> = Vec::new();
    for s in &sales {
        match top_shows.iter_mut().find(|t| t.show_id == s.sale.show_id) {
            Some(total) => {
                total.tickets += s.sale.quantity;
                total.revenue += s.sale.total_amount;
            }
            None => top_shows.push(ShowTotal {
                show_id: s.sale.show_id.clone(),
                title: s.show_title.clone(),
                date: s.show_date,
                tickets: s.sale.quantity,
                revenue: s.sale.total_amount,
            }),
        }
    }
    top_shows.sort_by(|a, b| b.tickets.cmp(&a.tickets));
    top_shows.truncate(TOP_SHOWS);

    Report {
        period,
        label: period.label(),
        sales,
        total_tickets,
        total_revenue,
        unique_shows,
        avg_price,
        top_shows,
    }
}

/// `M/D/YYYY`
fn us_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.month(), date.day(), date.year())
}

fn summary_row(label: &str, value: String) -> [String; 9] {
    let mut row: [String; 9] = Default::default();
    row[0] = label.to_string();
    row[1] = value;
    row
}

fn csv_writer() -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new())
}

fn finish(writer: csv::Writer<Vec<u8>>) -> AppResult<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV export failed: {}", e)))
}

fn csv_error(e: csv::Error) -> AppError {
    AppError::Internal(format!("CSV export failed: {}", e))
}

/// Spreadsheet export: one row per sale, a blank line, then a summary block
pub fn report_csv(snapshot: &Snapshot, report: &Report, generated: NaiveDate) -> AppResult<String> {
    let mut rows = csv_writer();
    rows.write_record(CSV_HEADER).map_err(csv_error)?;
    for entry in &report.sales {
        let sale = &entry.sale;
        let show = snapshot.show(&sale.show_id);
        rows.write_record([
            us_date(sale.sale_date.date_naive()),
            snapshot
                .person(&sale.person_id)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| UNKNOWN.to_string()),
            show.map(|s| s.title.clone()).unwrap_or_else(|| UNKNOWN.to_string()),
            show.map(|s| us_date(s.date)).unwrap_or_default(),
            sale.quantity.to_string(),
            sale.status.to_string(),
            sale.payment_method.to_string(),
            sale.total_amount.to_string(),
            sale.id.clone(),
        ])
        .map_err(csv_error)?;
    }
    let mut out = finish(rows)?;
    out.push(b'\n');

    let mut summary = csv_writer();
    for row in [
        summary_row("SUMMARY", String::new()),
        summary_row("Period:", report.label.clone()),
        summary_row("Total Tickets:", report.total_tickets.to_string()),
        summary_row("Total Revenue:", format!("${}", report.total_revenue)),
        summary_row("Shows Attended:", report.unique_shows.to_string()),
        summary_row("Avg. Price:", format!("${}", report.avg_price)),
        summary_row("Report Generated:", us_date(generated)),
    ] {
        summary.write_record(&row).map_err(csv_error)?;
    }
    out.extend(finish(summary)?);

    String::from_utf8(out).map_err(|e| AppError::Internal(format!("CSV export failed: {}", e)))
}

#[derive(Clone)]
pub struct ReportsService {
    repository: Repository,
}

impl ReportsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn report(&self, period: ReportPeriod) -> Report {
        let snapshot = self.repository.snapshot().await;
        build_report(&snapshot, period)
    }

    /// CSV body and download file name for `period`
    pub async fn export_csv(&self, period: ReportPeriod, now: DateTime<Utc>) -> AppResult<(String, String)> {
        let snapshot = self.repository.snapshot().await;
        let report = build_report(&snapshot, period);
        let body = report_csv(&snapshot, &report, now.date_naive())?;
        tracing::info!("Exported {} sales for {}", report.sales.len(), report.label);
        Ok((period.file_name(), body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        sale::{PaymentMethod, SaleStatus},
        Person, Show,
    };
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 15, 0, 0).unwrap()
    }

    fn sale(id: &str, show_id: &str, person_id: &str, qty: u32, total: f64, status: SaleStatus, when: DateTime<Utc>) -> Sale {
        Sale {
            id: id.into(),
            show_id: show_id.into(),
            person_id: person_id.into(),
            quantity: qty,
            status,
            payment_method: PaymentMethod::Cash,
            total_amount: total,
            sale_date: when,
            seats: Vec::new(),
        }
    }

    fn snapshot() -> Snapshot {
        let show: Show = serde_json::from_value(serde_json::json!({
            "id": "s1", "title": "Arsenic, Old Lace", "date": "2026-11-20", "price": 12.5, "maxTickets": 30
        }))
        .unwrap();
        let person: Person = serde_json::from_value(serde_json::json!({"id": "p1", "name": "Ruth Dunn"})).unwrap();
        Snapshot {
            shows: vec![show],
            people: vec![person],
            sales: vec![
                sale("a", "s1", "p1", 2, 25.0, SaleStatus::Paid, at(2026, 10, 3)),
                sale("b", "gone", "nobody", 1, 10.0, SaleStatus::Reserved, at(2026, 10, 9)),
                sale("c", "s1", "p1", 4, 50.0, SaleStatus::Cancelled, at(2026, 10, 10)),
                sale("d", "s1", "p1", 1, 12.5, SaleStatus::Paid, at(2026, 9, 30)),
            ],
            waitlist: Vec::new(),
        }
    }

    #[test]
    fn test_period_labels() {
        let month = ReportPeriod::new(PeriodKind::Month, 2026, 10).unwrap();
        assert_eq!(month.label(), "October 2026");
        assert_eq!(month.file_name(), "haletix-report-october-2026.csv");
        let year = ReportPeriod::new(PeriodKind::Year, 2026, 1).unwrap();
        assert_eq!(year.file_name(), "haletix-report-2026.csv");
        assert!(ReportPeriod::new(PeriodKind::Month, 2026, 13).is_err());
    }

    #[test]
    fn test_monthly_report() {
        let report = build_report(&snapshot(), ReportPeriod::new(PeriodKind::Month, 2026, 10).unwrap());
        let ids: Vec<&str> = report.sales.iter().map(|s| s.sale.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(report.sales[0].show_title, "Unknown Show");
        assert_eq!(report.total_tickets, 3);
        assert_eq!(report.total_revenue, 35.0);
        assert_eq!(report.unique_shows, 2);
        assert_eq!(report.avg_price, "11.67");
        assert_eq!(report.top_shows[0].show_id, "s1");
    }

    #[test]
    fn test_yearly_report_and_empty_period() {
        let year = build_report(&snapshot(), ReportPeriod::new(PeriodKind::Year, 2026, 1).unwrap());
        assert_eq!(year.total_tickets, 4);

        let empty = build_report(&snapshot(), ReportPeriod::new(PeriodKind::Year, 2025, 1).unwrap());
        assert!(empty.sales.is_empty());
        assert_eq!(empty.avg_price, "0.00");
    }

    #[test]
    fn test_csv_layout() {
        let snap = snapshot();
        let report = build_report(&snap, ReportPeriod::new(PeriodKind::Month, 2026, 10).unwrap());
        let csv = report_csv(&snap, &report, NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "Date,Customer,Show,Show Date,Quantity,Status,Payment Method,Total Amount,Ticket ID");
        assert_eq!(lines[1], "10/9/2026,Unknown,Unknown,,1,Reserved,Cash,10,b");
        assert_eq!(lines[2], "10/3/2026,Ruth Dunn,\"Arsenic, Old Lace\",11/20/2026,2,Paid,Cash,25,a");
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "SUMMARY,,,,,,,,");
        assert_eq!(lines[5], "Period:,October 2026,,,,,,,");
        assert_eq!(lines[7], "Total Revenue:,$35,,,,,,,");
        assert_eq!(lines[9], "Avg. Price:,$11.67,,,,,,,");
        assert_eq!(lines[10], "Report Generated:,10/18/2026,,,,,,,");
    }
}
