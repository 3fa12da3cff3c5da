//! API handlers for Haletix REST endpoints

pub mod dashboard;
pub mod exchange;
pub mod health;
pub mod openapi;
pub mod people;
pub mod reports;
pub mod sales;
pub mod shows;
pub mod waitlist;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Shows
        .route("/shows", get(shows::list_shows).post(shows::create_show))
        .route(
            "/shows/:id",
            get(shows::get_show)
                .put(shows::update_show)
                .delete(shows::delete_show),
        )
        .route("/shows/:id/attendees", get(shows::get_attendees))
        // Seating
        .route("/shows/:id/seats", get(shows::get_seat_map))
        .route("/shows/:id/seats/toggle", post(shows::toggle_seat))
        // Waitlist
        .route(
            "/shows/:id/waitlist",
            get(shows::get_waitlist).post(shows::add_to_waitlist),
        )
        .route(
            "/waitlist/:id",
            put(waitlist::update_entry).delete(waitlist::delete_entry),
        )
        .route("/waitlist/:id/notify", post(waitlist::notify_entry))
        .route("/waitlist/:id/cancel", post(waitlist::cancel_entry))
        .route("/waitlist/:id/convert", post(waitlist::convert_entry))
        // People
        .route("/people", get(people::list_people).post(people::create_person))
        .route(
            "/people/:id",
            get(people::get_person)
                .put(people::update_person)
                .delete(people::delete_person),
        )
        .route("/people/:id/history", get(people::get_history))
        // Sales
        .route("/sales", get(sales::list_sales).post(sales::create_sale))
        .route(
            "/sales/:id",
            get(sales::get_sale)
                .put(sales::update_sale)
                .delete(sales::delete_sale),
        )
        .route("/sales/:id/seats", put(sales::assign_seats))
        // Dashboard & reports
        .route("/dashboard", get(dashboard::get_dashboard))
        .route("/reports", get(reports::get_report))
        .route("/reports/export", get(reports::export_report))
        // Export/import
        .route("/export", get(exchange::export_data))
        .route("/import", post(exchange::import_data))
        .with_state(state);

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}
