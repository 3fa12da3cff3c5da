//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{dashboard, exchange, health, people, reports, sales, shows, waitlist};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Haletix API",
        version = "1.0.0",
        description = "Theater Box Office REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Shows
        shows::list_shows,
        shows::get_show,
        shows::create_show,
        shows::update_show,
        shows::delete_show,
        shows::get_attendees,
        // Seating
        shows::get_seat_map,
        shows::toggle_seat,
        sales::assign_seats,
        // People
        people::list_people,
        people::get_person,
        people::create_person,
        people::update_person,
        people::delete_person,
        people::get_history,
        // Sales
        sales::list_sales,
        sales::get_sale,
        sales::create_sale,
        sales::update_sale,
        sales::delete_sale,
        // Waitlist
        shows::get_waitlist,
        shows::add_to_waitlist,
        waitlist::update_entry,
        waitlist::delete_entry,
        waitlist::notify_entry,
        waitlist::cancel_entry,
        waitlist::convert_entry,
        // Dashboard & reports
        dashboard::get_dashboard,
        reports::get_report,
        reports::export_report,
        // Export/import
        exchange::export_data,
        exchange::import_data,
    ),
    components(
        schemas(
            // Shows
            crate::models::show::Show,
            crate::models::show::CreateShow,
            crate::models::show::UpdateShow,
            crate::services::shows::ShowSummary,
            crate::services::shows::Attendee,
            crate::services::shows::AttendeesPage,
            crate::services::availability::DeadlineInfo,
            crate::services::availability::DeadlineTier,
            crate::services::availability::WaitlistStats,
            // Seating
            crate::models::sale::Seat,
            crate::models::sale::AssignSeats,
            crate::services::seating::RowSpec,
            crate::services::seating::SeatMap,
            crate::services::seating::RowLayout,
            crate::services::seating::SeatCell,
            crate::services::seating::SeatStatus,
            crate::services::seating::ToggleSeat,
            crate::services::seating::ToggleOutcome,
            crate::services::seating::Toggle,
            // People
            crate::models::person::Person,
            crate::models::person::CreatePerson,
            crate::models::person::UpdatePerson,
            crate::services::people::PersonHistory,
            crate::services::availability::TicketHistory,
            crate::services::availability::TicketRecord,
            // Sales
            crate::models::sale::Sale,
            crate::models::sale::SaleStatus,
            crate::models::sale::PaymentMethod,
            crate::models::sale::CreateSale,
            crate::models::sale::UpdateSale,
            crate::models::sale::SaleDetails,
            crate::models::sale::SaleSortKey,
            crate::models::sale::SortDirection,
            // Waitlist
            crate::models::waitlist::WaitlistEntry,
            crate::models::waitlist::WaitlistStatus,
            crate::models::waitlist::CreateWaitlistEntry,
            crate::models::waitlist::UpdateWaitlistEntry,
            crate::models::waitlist::WaitlistEntryDetails,
            // Dashboard
            crate::services::dashboard::Dashboard,
            crate::services::dashboard::BestShow,
            crate::services::dashboard::DeadlineAlert,
            crate::services::dashboard::UnpaidSummary,
            crate::services::dashboard::CustomerTotal,
            // Reports
            crate::services::reports::Report,
            crate::services::reports::ReportPeriod,
            crate::services::reports::PeriodKind,
            crate::services::reports::ReportSale,
            crate::services::reports::ShowTotal,
            // Export/import
            crate::models::exchange::ExportDocument,
            crate::models::exchange::ImportReport,
            crate::models::exchange::CollectionImport,
            crate::models::exchange::ImportAction,
            // Health
            health::HealthResponse,
            health::ReadinessResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "shows", description = "Show catalogue and attendees"),
        (name = "seating", description = "Seat maps and seat assignment"),
        (name = "people", description = "Customer management"),
        (name = "sales", description = "Ticket sales"),
        (name = "waitlist", description = "Waitlist management"),
        (name = "dashboard", description = "Box office dashboard"),
        (name = "reports", description = "Sales reports"),
        (name = "exchange", description = "Data export and import")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
