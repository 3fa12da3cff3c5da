//! Dashboard service: box-office headline figures

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    config::DeadlineConfig,
    models::{
        sale::{Sale, SaleDetails, SaleStatus},
        Person, Show,
    },
    repository::{Repository, Snapshot},
};

use super::{
    availability::{self, DeadlineInfo},
    sales::sale_details,
};

const TOP_DEADLINES: usize = 5;
const TOP_CUSTOMERS: usize = 5;
const RECENT_SALES: usize = 8;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BestShow {
    pub show: Show,
    pub tickets: u32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DeadlineAlert {
    pub show: Show,
    pub sold: u32,
    pub deadline: DeadlineInfo,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct UnpaidSummary {
    pub count: usize,
    pub tickets: u32,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CustomerTotal {
    pub person: Person,
    pub tickets: u32,
    pub spent: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub total_revenue: f64,
    pub total_tickets: u32,
    pub this_month_revenue: f64,
    pub this_month_tickets: u32,
    pub last_month_revenue: f64,
    pub last_month_tickets: u32,
    /// Percent change against last month
    pub revenue_trend: i64,
    pub ticket_trend: i64,
    pub best_show: Option<BestShow>,
    pub upcoming_shows: Vec<Show>,
    pub deadlines: Vec<DeadlineAlert>,
    pub unpaid: UnpaidSummary,
    pub top_customers: Vec<CustomerTotal>,
    pub recent_sales: Vec<SaleDetails>,
}

/// Month-over-month change in percent; 100 when starting from nothing
pub fn trend(this: f64, last: f64) -> i64 {
    if last > 0.0 {
        (((this - last) / last) * 100.0).round() as i64
    } else if this > 0.0 {
        100
    } else {
        0
    }
}

fn totals<'a>(sales: impl Iterator<Item = &'a Sale>) -> (f64, u32) {
    sales.fold((0.0, 0), |(revenue, tickets), s| (revenue + s.total_amount, tickets + s.quantity))
}

/// Sum `quantity`/`total_amount` per key, keeping first-seen order
fn group_by<F>(sales: &[&Sale], key: F) -> Vec<(String, u32, f64)>
where
    F: Fn(&Sale) -> &str,
{
    let mut groups: Vec<(String, u32, f64)> = Vec::new();
    for sale in sales {
        let k = key(sale);
        match groups.iter_mut().find(|(id, _, _)| id == k) {
            Some(group) => {
                group.1 += sale.quantity;
                group.2 += sale.total_amount;
            }
            None => groups.push((k.to_string(), sale.quantity, sale.total_amount)),
        }
    }
    groups
}

/// Build the dashboard from a snapshot as seen at `now`. Cancelled sales are
/// left out of every figure.
pub fn build_dashboard(snapshot: &Snapshot, now: DateTime<Utc>, policy: &DeadlineConfig) -> Dashboard {
    let today = now.date_naive();
    let (year, month) = (now.year(), now.month());
    let (last_year, last_month) = if month == 1 { (year - 1, 12) } else { (year, month - 1) };

    let live: Vec<&Sale> = snapshot.sales.iter().filter(|s| s.status.counts()).collect();
    let in_month = |s: &&&Sale, y: i32, m: u32| s.sale_date.year() == y && s.sale_date.month() == m;

    let (total_revenue, total_tickets) = totals(live.iter().copied());
    let (this_month_revenue, this_month_tickets) =
        totals(live.iter().filter(|s| in_month(s, year, month)).copied());
    let (last_month_revenue, last_month_tickets) =
        totals(live.iter().filter(|s| in_month(s, last_year, last_month)).copied());

    let this_year: Vec<&Sale> = live
        .iter()
        .copied()
        .filter(|s| s.sale_date.year() == year)
        .collect();
    let mut best: Option<(String, u32)> = None;
    for (show_id, tickets, _) in group_by(&this_year, |s| s.show_id.as_str()) {
        if tickets > best.as_ref().map_or(0, |(_, t)| *t) {
            best = Some((show_id, tickets));
        }
    }
    let best_show = best.and_then(|(id, tickets)| {
        snapshot.show(&id).map(|show| BestShow {
            show: show.clone(),
            tickets,
        })
    });

    let mut upcoming_shows: Vec<Show> = snapshot
        .shows
        .iter()
        .filter(|s| s.date >= today)
        .cloned()
        .collect();
    upcoming_shows.sort_by_key(|s| s.date);

    let mut deadlines: Vec<DeadlineAlert> = snapshot
        .shows
        .iter()
        .filter_map(|show| {
            let stats = availability::show_stats(&snapshot.sales, &show.id);
            let remaining = availability::remaining(show, &stats);
            availability::deadline_info(show.date, remaining, now, policy).map(|deadline| DeadlineAlert {
                show: show.clone(),
                sold: stats.sold_count,
                deadline,
            })
        })
        .collect();
    deadlines.sort_by_key(|d| d.deadline.days_until_deadline);
    deadlines.truncate(TOP_DEADLINES);

    let unpaid = snapshot
        .sales
        .iter()
        .filter(|s| s.status == SaleStatus::Reserved)
        .fold(UnpaidSummary::default(), |acc, s| UnpaidSummary {
            count: acc.count + 1,
            tickets: acc.tickets + s.quantity,
            amount: acc.amount + s.total_amount,
        });

    let mut top_customers: Vec<CustomerTotal> = group_by(&live, |s| s.person_id.as_str())
        .into_iter()
        .filter_map(|(person_id, tickets, spent)| {
            snapshot.person(&person_id).map(|person| CustomerTotal {
                person: person.clone(),
                tickets,
                spent,
            })
        })
        .collect();
    top_customers.sort_by(|a, b| b.tickets.cmp(&a.tickets));
    top_customers.truncate(TOP_CUSTOMERS);

    let mut recent: Vec<&Sale> = live.clone();
    recent.sort_by(|a, b| b.sale_date.cmp(&a.sale_date));
    let recent_sales = recent
        .into_iter()
        .take(RECENT_SALES)
        .map(|sale| sale_details(snapshot, sale))
        .collect();

    Dashboard {
        total_revenue,
        total_tickets,
        this_month_revenue,
        this_month_tickets,
        last_month_revenue,
        last_month_tickets,
        revenue_trend: trend(this_month_revenue, last_month_revenue),
        ticket_trend: trend(f64::from(this_month_tickets), f64::from(last_month_tickets)),
        best_show,
        upcoming_shows,
        deadlines,
        unpaid,
        top_customers,
        recent_sales,
    }
}

#[derive(Clone)]
pub struct DashboardService {
    repository: Repository,
    deadlines: DeadlineConfig,
}

impl DashboardService {
    pub fn new(repository: Repository, deadlines: DeadlineConfig) -> Self {
        Self { repository, deadlines }
    }

    pub async fn get(&self, now: DateTime<Utc>) -> Dashboard {
        let snapshot = self.repository.snapshot().await;
        build_dashboard(&snapshot, now, &self.deadlines)
    }
}
