//! API integration tests
//!
//! Drive the full router in-process over an in-memory store.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use haletix_server::{
    api,
    config::AppConfig,
    repository::{
        store::{FileStore, MemoryStore},
        Repository,
    },
    AppState,
};

fn app() -> Router {
    let repository = Repository::open(Arc::new(MemoryStore::new()), "haletix").unwrap();
    api::create_router(AppState::new(AppConfig::default(), repository))
}

async fn send_raw(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>, Option<String>) {
    let mut request = Request::builder().method(method).uri(format!("/api/v1{}", uri));
    let body = match body {
        Some(value) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .expect("Failed to send request");

    let status = response.status();
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec(), disposition)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes, _) = send_raw(app, method, uri, body).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Failed to parse response")
    };
    (status, value)
}

fn days_from_now(days: i64) -> String {
    (Utc::now().date_naive() + Duration::days(days)).to_string()
}

async fn create_show(app: &Router, max_tickets: i64) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/shows",
        Some(json!({
            "title": "Our Town",
            "date": days_from_now(40),
            "time": "19:30",
            "price": 20,
            "maxTickets": max_tickets
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

async fn create_person(app: &Router, name: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/people",
        Some(json!({ "name": name, "phone": "555-0142" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_check() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_show_crud() {
    let app = app();
    let id = create_show(&app, 30).await;

    let (status, body) = send(&app, Method::GET, &format!("/shows/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["location"], "Main Theater");
    assert_eq!(body["section"], "South");
    assert_eq!(body["remaining"], 30);
    assert_eq!(body["deadline"]["status"], "safe");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/shows/{}", id),
        Some(json!({ "price": 25 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["price"], 25.0);

    let (status, _) = send(&app, Method::DELETE, &format!("/shows/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::GET, &format!("/shows/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NoSuchRecord");
}

#[tokio::test]
async fn test_create_show_requires_title() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/shows",
        Some(json!({ "title": "", "date": days_from_now(5) })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");
}

#[tokio::test]
async fn test_sale_capacity_and_confirmation() {
    let app = app();
    let show = create_show(&app, 3).await;
    let person = create_person(&app, "Ruth Dunn").await;

    let order = |quantity: u32, confirm: bool| {
        json!({
            "showId": show,
            "personId": person,
            "quantity": quantity,
            "paymentMethod": "Credit Card",
            "confirmOverbooking": confirm
        })
    };

    let (status, body) = send(&app, Method::POST, "/sales", Some(order(2, false))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["totalAmount"], 40.0);
    assert_eq!(body["status"], "Reserved");

    let (status, body) = send(&app, Method::POST, "/sales", Some(order(2, false))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Only 1 tickets available");

    let (status, _) = send(&app, Method::POST, "/sales", Some(order(2, true))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(&app, Method::GET, &format!("/shows/{}", show), None).await;
    assert_eq!(body["remaining"], -1);
    assert!(body["deadline"].is_null());
}

#[tokio::test]
async fn test_sales_list_is_sorted_and_enriched() {
    let app = app();
    let show = create_show(&app, 30).await;
    let ann = create_person(&app, "Ann").await;
    let zoe = create_person(&app, "Zoe").await;

    for (person, quantity) in [(&zoe, 1), (&ann, 4)] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/sales",
            Some(json!({ "showId": show, "personId": person, "quantity": quantity })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, Method::GET, "/sales?sort=personName&direction=asc", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["personName"], "Ann");
    assert_eq!(body[0]["showTitle"], "Our Town");
    assert_eq!(body[1]["personName"], "Zoe");

    let (_, body) = send(&app, Method::GET, "/sales?sort=quantity", None).await;
    assert_eq!(body[0]["quantity"], 4);
}

#[tokio::test]
async fn test_seat_assignment() {
    let app = app();
    let show = create_show(&app, 30).await;
    let person = create_person(&app, "Ruth Dunn").await;

    let (status, sale) = send(
        &app,
        Method::POST,
        "/sales",
        Some(json!({
            "showId": show,
            "personId": person,
            "seats": [{ "row": "B", "seatNumber": 9 }, { "row": "B", "seat": 8 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(sale["quantity"], 2);
    assert_eq!(sale["seats"][1]["seatNumber"], 8);

    let (status, map) = send(&app, Method::GET, &format!("/shows/{}/seats", show), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(map["totalSeats"], 30);
    assert_eq!(map["sold"], 2);
    assert_eq!(map["rows"][0]["leftBlock"][0]["status"], "disabled");
    assert_eq!(map["rows"][0]["leftBlock"][0]["customerName"], "Ruth Dunn");

    let (status, other) = send(
        &app,
        Method::POST,
        "/sales",
        Some(json!({ "showId": show, "personId": person, "quantity": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let other_id = other["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/sales/{}/seats", other_id),
        Some(json!({ "seats": [{ "row": "B", "seatNumber": 9 }] })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "SeatTaken");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/sales/{}/seats", other_id),
        Some(json!({ "seats": [{ "row": "D", "seatNumber": 1 }] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["seats"][0]["section"], "South");

    // Edit mode: own seats selected, everyone else's disabled
    let uri = format!("/shows/{}/seats?saleId={}", show, other_id);
    let (_, map) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(map["maxSelection"], 1);
    assert_eq!(map["rows"][2]["rightBlock"][6]["status"], "selected");
}

#[tokio::test]
async fn test_toggle_seat() {
    let app = app();
    let show = create_show(&app, 30).await;
    let uri = format!("/shows/{}/seats/toggle", show);

    let (status, body) = send(&app, Method::POST, &uri, Some(json!({ "row": "C", "seatNumber": 6 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], "added");
    assert_eq!(body["seats"][0]["section"], "South");

    let selected = body["seats"].clone();
    let (_, body) = send(
        &app,
        Method::POST,
        &uri,
        Some(json!({ "row": "C", "seatNumber": 6, "selected": selected })),
    )
    .await;
    assert_eq!(body["result"], "removed");
    assert_eq!(body["seats"], json!([]));

    let (status, _) = send(&app, Method::POST, &uri, Some(json!({ "row": "Q", "seatNumber": 1 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_waitlist_flow() {
    let app = app();
    let show = create_show(&app, 2).await;
    let person = create_person(&app, "Ann").await;

    let (status, entry) = send(
        &app,
        Method::POST,
        &format!("/shows/{}/waitlist", show),
        Some(json!({ "personId": person, "quantity": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(entry["status"], "Waiting");
    let id = entry["id"].as_str().unwrap();

    let (status, body) = send(&app, Method::POST, &format!("/waitlist/{}/notify", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["notifiedAt"].is_string());

    let (status, body) = send(&app, Method::POST, &format!("/waitlist/{}/convert", id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "CapacityExceeded");

    let (status, sale) = send(&app, Method::POST, &format!("/waitlist/{}/convert?force=true", id), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(sale["totalAmount"], 60.0);
    assert_eq!(sale["paymentMethod"], "Cash");

    let (_, list) = send(&app, Method::GET, &format!("/shows/{}/waitlist", show), None).await;
    assert_eq!(list, json!([]));

    let (status, body) = send(&app, Method::POST, &format!("/waitlist/{}/cancel", id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "InvalidTransition");
}

#[tokio::test]
async fn test_people_search_and_history() {
    let app = app();
    let show = create_show(&app, 30).await;
    let ruth = create_person(&app, "Ruth Dunn").await;
    create_person(&app, "John Park").await;

    let (_, found) = send(&app, Method::GET, "/people?search=ruth", None).await;
    assert_eq!(found.as_array().unwrap().len(), 1);

    send(
        &app,
        Method::POST,
        "/sales",
        Some(json!({ "showId": show, "personId": ruth, "quantity": 2, "status": "Paid" })),
    )
    .await;

    let (status, history) = send(&app, Method::GET, &format!("/people/{}/history", ruth), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history["person"]["name"], "Ruth Dunn");
    assert_eq!(history["totalTickets"], 2);
    assert_eq!(history["upcoming"][0]["showTitle"], "Our Town");
    assert_eq!(history["past"], json!([]));
}

#[tokio::test]
async fn test_attendees_and_dashboard() {
    let app = app();
    let show = create_show(&app, 10).await;
    let person = create_person(&app, "Ruth Dunn").await;
    send(
        &app,
        Method::POST,
        "/sales",
        Some(json!({ "showId": show, "personId": person, "quantity": 3 })),
    )
    .await;

    let (status, page) = send(&app, Method::GET, &format!("/shows/{}/attendees", show), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["totalTickets"], 3);
    assert_eq!(page["attendees"][0]["personPhone"], "555-0142");
    assert_eq!(page["show"]["remaining"], 7);

    let (status, dash) = send(&app, Method::GET, "/dashboard", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dash["totalTickets"], 3);
    assert_eq!(dash["thisMonthRevenue"], 60.0);
    assert_eq!(dash["unpaid"]["count"], 1);
    assert_eq!(dash["topCustomers"][0]["tickets"], 3);
    assert_eq!(dash["recentSales"][0]["personName"], "Ruth Dunn");
}

#[tokio::test]
async fn test_report_csv_export() {
    let app = app();
    let show = create_show(&app, 10).await;
    let person = create_person(&app, "Ruth Dunn").await;
    send(
        &app,
        Method::POST,
        "/sales",
        Some(json!({ "showId": show, "personId": person, "quantity": 2, "status": "Paid" })),
    )
    .await;

    let (status, report) = send(&app, Method::GET, "/reports", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["totalTickets"], 2);
    assert_eq!(report["avgPrice"], "20.00");

    let (status, bytes, disposition) = send_raw(&app, Method::GET, "/reports/export?period=year", None).await;
    assert_eq!(status, StatusCode::OK);
    let expected_name = format!("haletix-report-{}.csv", Utc::now().format("%Y"));
    assert!(disposition.unwrap().contains(&expected_name));

    let csv = String::from_utf8(bytes).unwrap();
    assert!(csv.starts_with("Date,Customer,Show,Show Date,Quantity,Status,Payment Method,Total Amount,Ticket ID\n"));
    assert!(csv.contains(",Ruth Dunn,Our Town,"));
    assert!(csv.contains("\n\nSUMMARY,,,,,,,,\n"));
    assert!(csv.contains("Total Revenue:,$40,"));

    let (status, _) = send(&app, Method::GET, "/reports?month=13", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_export_import_round_trip() {
    let source = app();
    let show = create_show(&source, 10).await;
    let person = create_person(&source, "Ruth Dunn").await;
    send(
        &source,
        Method::POST,
        "/sales",
        Some(json!({ "showId": show, "personId": person, "quantity": 1 })),
    )
    .await;

    let (status, bytes, disposition) = send_raw(&source, Method::GET, "/export", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(disposition.unwrap().contains("haletix_backup_"));
    let doc: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(doc["version"], "1.0");

    let target = app();
    let (status, report) = send(&target, Method::POST, "/import", Some(doc.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["collections"].as_array().unwrap().len(), 3);

    let (_, bytes, _) = send_raw(&target, Method::GET, "/export", None).await;
    let restored: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(restored["shows"], doc["shows"]);
    assert_eq!(restored["people"], doc["people"]);
    assert_eq!(restored["sales"], doc["sales"]);
}

#[tokio::test]
async fn test_import_rejects_invalid_json() {
    let app = app();
    create_show(&app, 10).await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/import")
        .body(Body::from("{ not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (_, shows) = send(&app, Method::GET, "/shows", None).await;
    assert_eq!(shows.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_file_store_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let open = || {
        let store = FileStore::open(dir.path()).unwrap();
        let repository = Repository::open(Arc::new(store), "haletix").unwrap();
        api::create_router(AppState::new(AppConfig::default(), repository))
    };

    let first = open();
    create_person(&first, "Ruth Dunn").await;
    assert!(dir.path().join("haletix_people.json").exists());

    let second = open();
    let (_, people) = send(&second, Method::GET, "/people", None).await;
    assert_eq!(people[0]["name"], "Ruth Dunn");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let doc: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(doc["info"]["title"], "Haletix API");
}
