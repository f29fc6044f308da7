mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use chrono::{Duration, Utc};
use common::{AuthHeaders, TestApp};
use serde_json::{json, Value};
use sqlx::Row;
use tower::ServiceExt;

async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn create_approved_event(app: &TestApp, organizer: &AuthHeaders) -> String {
    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/events")
            .header(header::COOKIE, format!("access_token={}", organizer.access_token))
            .header("X-CSRF-Token", &organizer.csrf_token)
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "title": "Hackathon",
                "description": "24h campus hackathon",
                "category": "TECH",
                "venue": "CS Building",
                "starts_at": (Utc::now() + Duration::days(10)).to_rfc3339(),
                "ends_at": (Utc::now() + Duration::days(11)).to_rfc3339(),
                "capacity": 500,
                "price_cents": 0
            }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let event_id = parse_body(res).await["id"].as_str().unwrap().to_string();

    let admin = app.login_admin().await;
    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/v1/admin/events/{}/approve", event_id))
            .header(header::COOKIE, format!("access_token={}", admin.access_token))
            .header("X-CSRF-Token", &admin.csrf_token)
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    event_id
}

async fn book(app: &TestApp, auth: &AuthHeaders, event_id: &str) -> String {
    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/v1/events/{}/book", event_id))
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("X-CSRF-Token", &auth.csrf_token)
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    parse_body(res).await["ticket"]["code"].as_str().unwrap().to_string()
}

fn scan_request(auth: &AuthHeaders, code: &str) -> Request<Body> {
    Request::builder().method("POST").uri("/api/v1/tickets/scan")
        .header(header::COOKIE, format!("access_token={}", auth.access_token))
        .header("X-CSRF-Token", &auth.csrf_token)
        .header("Content-Type", "application/json")
        .body(Body::from(json!({"code": code}).to_string())).unwrap()
}

async fn attendance_count(app: &TestApp, event_id: &str) -> i64 {
    sqlx::query("SELECT COUNT(*) as count FROM attendance WHERE event_id = ?")
        .bind(event_id)
        .fetch_one(&app.pool)
        .await
        .unwrap()
        .get::<i64, _>("count")
}

#[tokio::test]
async fn test_scan_records_attendance_exactly_once() {
    let app = TestApp::new().await;
    app.register("scan-org", "super-secret-pw", "ORGANIZER").await;
    let org = app.login("scan-org", "super-secret-pw").await;
    let event_id = create_approved_event(&app, &org).await;

    app.register("attendee", "super-secret-pw", "STUDENT").await;
    let student = app.login("attendee", "super-secret-pw").await;
    let code = book(&app, &student, &event_id).await;

    // First scan succeeds and records attendance.
    let res = app.router.clone().oneshot(scan_request(&org, &code)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["student_name"], "attendee");
    assert_eq!(body["event_title"], "Hackathon");
    assert_eq!(body["ticket"]["scanned"], true);
    assert!(!body["ticket"]["scanned_at"].is_null());

    assert_eq!(attendance_count(&app, &event_id).await, 1);

    // Second scan is rejected and does not create a duplicate record.
    let res = app.router.clone().oneshot(scan_request(&org, &code)).await.unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(parse_body(res).await["error"], "Ticket already scanned");

    assert_eq!(attendance_count(&app, &event_id).await, 1);
}

#[tokio::test]
async fn test_scan_by_student_forbidden() {
    let app = TestApp::new().await;
    app.register("scan-org2", "super-secret-pw", "ORGANIZER").await;
    let org = app.login("scan-org2", "super-secret-pw").await;
    let event_id = create_approved_event(&app, &org).await;

    app.register("sneaky", "super-secret-pw", "STUDENT").await;
    let student = app.login("sneaky", "super-secret-pw").await;
    let code = book(&app, &student, &event_id).await;

    let res = app.router.clone().oneshot(scan_request(&student, &code)).await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(attendance_count(&app, &event_id).await, 0);
}

#[tokio::test]
async fn test_scan_unknown_code() {
    let app = TestApp::new().await;
    app.register("scan-org3", "super-secret-pw", "ORGANIZER").await;
    let org = app.login("scan-org3", "super-secret-pw").await;
    create_approved_event(&app, &org).await;

    let res = app.router.clone().oneshot(scan_request(&org, "definitely-not-a-code")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_scan_other_organizers_event_forbidden() {
    let app = TestApp::new().await;
    app.register("owner-org", "super-secret-pw", "ORGANIZER").await;
    let owner = app.login("owner-org", "super-secret-pw").await;
    let event_id = create_approved_event(&app, &owner).await;

    app.register("guest", "super-secret-pw", "STUDENT").await;
    let student = app.login("guest", "super-secret-pw").await;
    let code = book(&app, &student, &event_id).await;

    app.register("rival-org", "super-secret-pw", "ORGANIZER").await;
    let rival = app.login("rival-org", "super-secret-pw").await;

    let res = app.router.clone().oneshot(scan_request(&rival, &code)).await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(attendance_count(&app, &event_id).await, 0);
}

#[tokio::test]
async fn test_concurrent_scans_single_success() {
    let app = TestApp::new().await;
    app.register("race-org", "super-secret-pw", "ORGANIZER").await;
    let org = app.login("race-org", "super-secret-pw").await;
    let event_id = create_approved_event(&app, &org).await;

    app.register("raced", "super-secret-pw", "STUDENT").await;
    let student = app.login("raced", "super-secret-pw").await;
    let code = book(&app, &student, &event_id).await;

    let first = app.router.clone().oneshot(scan_request(&org, &code));
    let second = app.router.clone().oneshot(scan_request(&org, &code));
    let (res_a, res_b) = tokio::join!(first, second);

    let statuses = [res_a.unwrap().status(), res_b.unwrap().status()];
    let successes = statuses.iter().filter(|s| **s == StatusCode::OK).count();
    let conflicts = statuses.iter().filter(|s| **s == StatusCode::CONFLICT).count();

    assert_eq!(successes, 1, "Exactly one concurrent scan may succeed, got {:?}", statuses);
    assert_eq!(conflicts, 1, "The losing scan must see a conflict, got {:?}", statuses);
    assert_eq!(attendance_count(&app, &event_id).await, 1);
}

#[tokio::test]
async fn test_get_ticket_details() {
    let app = TestApp::new().await;
    app.register("detail-org", "super-secret-pw", "ORGANIZER").await;
    let org = app.login("detail-org", "super-secret-pw").await;
    let event_id = create_approved_event(&app, &org).await;

    app.register("holder", "super-secret-pw", "STUDENT").await;
    let holder = app.login("holder", "super-secret-pw").await;
    let code = book(&app, &holder, &event_id).await;

    // The ticket holder sees the full render payload.
    let res = app.router.clone().oneshot(
        Request::builder().method("GET").uri(format!("/api/v1/tickets/{}", code))
            .header(header::COOKIE, format!("access_token={}", holder.access_token))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["event_title"], "Hackathon");
    assert_eq!(body["venue"], "CS Building");
    assert_eq!(body["student_name"], "holder");

    // The owning organizer may look tickets up too.
    let res = app.router.clone().oneshot(
        Request::builder().method("GET").uri(format!("/api/v1/tickets/{}", code))
            .header(header::COOKIE, format!("access_token={}", org.access_token))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Another student may not.
    app.register("nosy", "super-secret-pw", "STUDENT").await;
    let nosy = app.login("nosy", "super-secret-pw").await;
    let res = app.router.clone().oneshot(
        Request::builder().method("GET").uri(format!("/api/v1/tickets/{}", code))
            .header(header::COOKIE, format!("access_token={}", nosy.access_token))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_attendees_listing() {
    let app = TestApp::new().await;
    app.register("roster-org", "super-secret-pw", "ORGANIZER").await;
    let org = app.login("roster-org", "super-secret-pw").await;
    let event_id = create_approved_event(&app, &org).await;

    app.register("present", "super-secret-pw", "STUDENT").await;
    let present = app.login("present", "super-secret-pw").await;
    let code = book(&app, &present, &event_id).await;

    app.register("absent", "super-secret-pw", "STUDENT").await;
    let absent = app.login("absent", "super-secret-pw").await;
    book(&app, &absent, &event_id).await;

    let res = app.router.clone().oneshot(scan_request(&org, &code)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.router.clone().oneshot(
        Request::builder().method("GET").uri(format!("/api/v1/events/{}/attendees", event_id))
            .header(header::COOKIE, format!("access_token={}", org.access_token))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let list = parse_body(res).await;
    let attendees = list.as_array().unwrap();
    assert_eq!(attendees.len(), 1);
    assert_eq!(attendees[0]["student_name"], "present");
}
