use std::sync::Arc;

use attendance_api::memory::InMemorySource;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use itinerary::format::DisplayZone;
use model::wire::RawVisitRecord;
use serde_json::{json, Value};
use tower::ServiceExt;
use web::{router, WebState};

const TOKEN: &str = "field-token";

/// Two days of one engineer: check in, a visit with a garbage distance and
/// check out on the 1st, a single check in on the 2nd.
fn raw_records() -> Vec<RawVisitRecord> {
    serde_json::from_value(json!([
        {
            "_id": "r1",
            "timestamp": "2024-03-01T03:30:00Z",
            "location": { "lat": 28.6139, "lng": 77.2090 },
            "locationName": "Regional Office",
            "purpose": "Check In",
            "totalDistance": 4.2
        },
        {
            "_id": "r2",
            "timestamp": "2024-03-01T04:35:00Z",
            "location": { "lat": 28.6280, "lng": 77.2189 },
            "locationName": "",
            "purpose": "Site Visit",
            "distanceFromPrevious": "bad-data"
        },
        {
            "_id": "r3",
            "timestamp": "2024-03-01T06:10:00Z",
            "location": { "latitude": 28.6300, "longitude": 77.2200 },
            "locationName": "Exchange",
            "purpose": "Check Out",
            "distanceFromPrevious": "500 m"
        },
        {
            "_id": "r4",
            "timestamp": "2024-03-02T03:00:00Z",
            "location": { "lat": 28.4595, "lng": 77.0266 },
            "purpose": "Check In",
            "distanceFromPrevious": 40000
        }
    ]))
    .unwrap()
}

fn source() -> Arc<InMemorySource> {
    Arc::new(
        InMemorySource::new(*DisplayZone::default().offset())
            .require_token(TOKEN)
            .with_records(raw_records()),
    )
}

fn app(source: Arc<InMemorySource>) -> Router {
    router(WebState::new(source, DisplayZone::default()))
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let builder = Request::builder().method("GET").uri(uri);
    let builder = match token {
        Some(token) => builder.header("authorization", format!("Bearer {}", token)),
        None => builder,
    };
    builder.body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn day_one_payload() -> Value {
    let records = raw_records().into_iter().take(3).collect::<Vec<_>>();
    serde_json::to_value(records).unwrap()
}

#[tokio::test]
async fn ping() {
    let (status, body) = send(app(source()), get("/api/ping", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "pong!");
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let (status, body) = send(app(source()), get("/api/v1/nowhere", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["httpMethod"], "GET");
}

#[tokio::test]
async fn summary_of_posted_records() {
    let (status, body) = send(
        app(source()),
        post_json("/api/v1/itineraries/summary", day_one_payload()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["date"], "2024-03-01");
    assert_eq!(body["totalDistanceText"], "0.50 km");
    assert_eq!(body["totalDurationText"], "2 hr 40 min");

    let segments = body["segments"].as_array().unwrap();
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0]["distanceKm"], 0.0);
    assert_eq!(segments[0]["durationText"], "1 hr 5 min");
    assert_eq!(segments[0]["toLocation"], "Unknown");
    assert_eq!(segments[1]["distanceText"], "0.50 km");
    assert_eq!(segments[1]["durationText"], "1 hr 35 min");

    let labels = body["waypoints"]
        .as_array()
        .unwrap()
        .iter()
        .map(|waypoint| waypoint["label"].as_str().unwrap().to_owned())
        .collect::<Vec<_>>();
    assert_eq!(labels, vec!["A", "B", "C"]);
    assert_eq!(body["waypoints"][0]["timeOfDay"], "09:00 AM");

    assert_eq!(body["debugInfo"]["backendTotalKm"], 4.2);
    assert_eq!(
        body["links"][0]["href"],
        "http://localhost/api/v1/itineraries/2024-03-01"
    );
}

#[tokio::test]
async fn empty_post_gives_empty_summary() {
    let (status, body) = send(
        app(source()),
        post_json("/api/v1/itineraries/summary", json!([])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalDistanceText"], "0.00 km");
    assert_eq!(body["segments"], json!([]));
    assert!(body.get("date").is_none());
}

#[tokio::test]
async fn malformed_records_are_unprocessable() {
    let payload = json!([
        {
            "_id": "r1",
            "timestamp": "2024-03-01T03:30:00Z",
            "location": { "lat": 28.6, "lng": 77.2 }
        },
        {
            "_id": "r2",
            "location": { "lat": 28.6, "lng": 77.2 },
            "distanceFromPrevious": "1 km"
        }
    ]);
    let (status, body) = send(
        app(source()),
        post_json("/api/v1/itineraries/summary", payload),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detailedInformation"]
        .as_str()
        .unwrap()
        .contains("no timestamp"));
}

#[tokio::test]
async fn itinerary_for_date_requires_bearer() {
    let (status, _) = send(app(source()), get("/api/v1/itineraries/2024-03-01", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        app(source()),
        get("/api/v1/itineraries/2024-03-01", Some("someone-else")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn itinerary_for_date_persists_totals() {
    let source = source();
    let (status, body) = send(
        app(source.clone()),
        get("/api/v1/itineraries/2024-03-01?persist=true", Some(TOKEN)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalDistanceText"], "0.50 km");
    assert_eq!(body["waypoints"].as_array().unwrap().len(), 3);
    assert_eq!(body["debugInfo"]["persisted"], true);

    let saved = source.saved_totals().await;
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].date.to_string(), "2024-03-01");
    assert_eq!(saved[0].total_distance_km, 0.5);
    assert_eq!(saved[0].segments.len(), 2);
}

#[tokio::test]
async fn itinerary_without_persist_saves_nothing() {
    let source = source();
    let (status, body) = send(
        app(source.clone()),
        get("/api/v1/itineraries/2024-03-02", Some(TOKEN)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalDistanceText"], "0.00 km");
    assert_eq!(body["debugInfo"]["persisted"], false);
    assert!(source.saved_totals().await.is_empty());
}

#[tokio::test]
async fn movements_are_grouped_by_day() {
    let (status, body) = send(
        app(source()),
        get(
            "/api/v1/movements?startDate=2024-03-01&endDate=2024-03-02",
            Some(TOKEN),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let days = body["data"].as_array().unwrap();
    assert_eq!(days.len(), 2);

    assert_eq!(days[0]["date"], "2024-03-01");
    assert_eq!(days[0]["checkInText"], "09:00 AM");
    assert_eq!(days[0]["checkOutText"], "11:40 AM");
    assert_eq!(days[0]["siteVisits"], 1);
    assert_eq!(days[0]["movementCount"], 3);

    // the 40 km of the first visit of the 2nd never crosses the day boundary
    assert_eq!(days[1]["date"], "2024-03-02");
    assert_eq!(days[1]["itinerary"]["totalDistanceText"], "0.00 km");
    assert!(days[1].get("checkOutText").is_none());
}

#[tokio::test]
async fn movements_reject_reversed_range() {
    let (status, _) = send(
        app(source()),
        get(
            "/api/v1/movements?startDate=2024-03-02&endDate=2024-03-01",
            Some(TOKEN),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn empty_day_does_not_persist_zero_totals() {
    let source = source();
    let (status, body) = send(
        app(source.clone()),
        get("/api/v1/itineraries/2024-03-05?persist=true", Some(TOKEN)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["waypoints"].as_array().unwrap().is_empty());
    assert_eq!(body["debugInfo"]["persisted"], false);
    assert!(source.saved_totals().await.is_empty());
}

#[tokio::test]
async fn non_text_location_name_falls_back_to_unknown() {
    let payload = json!([
        {
            "_id": "n1",
            "timestamp": "2024-03-01T03:30:00Z",
            "location": { "lat": 28.6139, "lng": 77.2090 },
            "locationName": 42,
            "purpose": "Check In"
        }
    ]);
    let (status, body) = send(
        app(source()),
        post_json("/api/v1/itineraries/summary", payload),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["waypoints"][0]["locationName"], "Unknown");
}

#[tokio::test]
async fn document_with_both_id_fields_is_accepted() {
    let payload = json!([
        {
            "_id": "65f1",
            "id": "65f1",
            "timestamp": "2024-03-01T03:30:00Z",
            "location": { "lat": 28.6139, "lng": 77.2090 },
            "purpose": "Check In"
        }
    ]);
    let (status, body) = send(
        app(source()),
        post_json("/api/v1/itineraries/summary", payload),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["waypoints"][0]["id"], "65f1");
}
